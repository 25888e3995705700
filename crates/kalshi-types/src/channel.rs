//! Streaming channel names

use std::fmt;
use std::str::FromStr;

/// A streaming channel, optionally scoped to one market ticker
///
/// The wire name encodes the stream kind and the ticker, e.g. `ticker`,
/// `ticker:KXHIGHNY-25JAN01-B40`, `orderbook_delta:KXHIGHNY-25JAN01-B40`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// Ticker updates for every market, or for one ticker
    Ticker(Option<String>),
    /// Orderbook snapshots and deltas for one market
    OrderbookDelta(String),
    /// Public trades for every market, or for one ticker
    Trade(Option<String>),
    /// Private fills for the authenticated member
    Fill,
    /// Any other channel name, sent verbatim
    Custom(String),
}

impl Channel {
    /// Ticker channel for all markets
    pub fn ticker() -> Self {
        Self::Ticker(None)
    }

    /// Ticker channel for one market
    pub fn ticker_for(ticker: impl Into<String>) -> Self {
        Self::Ticker(Some(ticker.into()))
    }

    /// Orderbook delta channel for one market
    pub fn orderbook(ticker: impl Into<String>) -> Self {
        Self::OrderbookDelta(ticker.into())
    }

    /// Trade channel, for all markets when `ticker` is `None`
    pub fn trades(ticker: Option<&str>) -> Self {
        Self::Trade(ticker.map(str::to_string))
    }

    /// Name as sent in the `channels` list of a control message
    pub fn wire_name(&self) -> String {
        self.to_string()
    }

    /// Market ticker this channel is scoped to, if any
    pub fn market_ticker(&self) -> Option<&str> {
        match self {
            Self::Ticker(t) | Self::Trade(t) => t.as_deref(),
            Self::OrderbookDelta(t) => Some(t),
            Self::Fill | Self::Custom(_) => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ticker(None) => f.write_str("ticker"),
            Self::Ticker(Some(t)) => write!(f, "ticker:{t}"),
            Self::OrderbookDelta(t) => write!(f, "orderbook_delta:{t}"),
            Self::Trade(None) => f.write_str("trade"),
            Self::Trade(Some(t)) => write!(f, "trade:{t}"),
            Self::Fill => f.write_str("fill"),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

impl FromStr for Channel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, ticker) = match s.split_once(':') {
            Some((kind, ticker)) if !ticker.is_empty() => (kind, Some(ticker.to_string())),
            _ => (s, None),
        };

        Ok(match (kind, ticker) {
            ("ticker", t) => Self::Ticker(t),
            ("trade", t) => Self::Trade(t),
            ("orderbook_delta", Some(t)) => Self::OrderbookDelta(t),
            ("fill", None) => Self::Fill,
            _ => Self::Custom(s.to_string()),
        })
    }
}

impl From<&str> for Channel {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(channel) => channel,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(Channel::ticker().wire_name(), "ticker");
        assert_eq!(Channel::ticker_for("ABC").wire_name(), "ticker:ABC");
        assert_eq!(Channel::orderbook("ABC").wire_name(), "orderbook_delta:ABC");
        assert_eq!(Channel::trades(None).wire_name(), "trade");
        assert_eq!(Channel::trades(Some("ABC")).wire_name(), "trade:ABC");
        assert_eq!(Channel::Fill.wire_name(), "fill");
    }

    #[test]
    fn test_parse_round_trips_known_names() {
        for name in ["ticker", "ticker:X-1", "orderbook_delta:X-1", "trade", "trade:X-1", "fill"] {
            assert_eq!(Channel::from(name).wire_name(), name);
        }
        assert_eq!(
            Channel::from("market_lifecycle_v2"),
            Channel::Custom("market_lifecycle_v2".into())
        );
        assert_eq!(Channel::from("orderbook_delta:X-1").market_ticker(), Some("X-1"));
    }
}
