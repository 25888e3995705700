//! Response models
//!
//! Models keep the fields callers commonly need as typed options and collect
//! everything else in `extra`, so new server fields never break decoding.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::enums::{Action, Side};
use crate::page::Page;

// ============================================================================
// Exchange
// ============================================================================

/// Exchange and trading availability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeStatus {
    pub exchange_active: bool,
    pub trading_active: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Exchange-wide announcement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: Option<String>,
    pub delivery_time: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Markets, events, series
// ============================================================================

/// A tradable binary market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub ticker: String,
    pub event_ticker: Option<String>,
    pub market_type: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub yes_sub_title: Option<String>,
    pub no_sub_title: Option<String>,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub expiration_time: Option<String>,
    pub status: Option<String>,
    pub yes_bid: Option<i64>,
    pub yes_ask: Option<i64>,
    pub no_bid: Option<i64>,
    pub no_ask: Option<i64>,
    pub last_price: Option<i64>,
    pub previous_price: Option<i64>,
    pub volume: Option<i64>,
    pub volume_24h: Option<i64>,
    pub open_interest: Option<i64>,
    pub liquidity: Option<i64>,
    pub result: Option<String>,
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Market {
    /// Look up a field by its wire name, typed fields included
    pub fn field(&self, name: &str) -> Option<Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => map.remove(name).filter(|v| !v.is_null()),
            _ => None,
        }
    }
}

/// A group of related markets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_ticker: String,
    pub series_ticker: Option<String>,
    pub title: Option<String>,
    pub sub_title: Option<String>,
    pub category: Option<String>,
    pub mutually_exclusive: Option<bool>,
    pub strike_date: Option<String>,
    /// Present when requested with `with_nested_markets`
    pub markets: Option<Vec<Market>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A recurring family of events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub ticker: String,
    pub frequency: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Public trade print
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: Option<String>,
    pub ticker: String,
    pub count: Option<i64>,
    pub yes_price: Option<i64>,
    pub no_price: Option<i64>,
    pub taker_side: Option<Side>,
    pub created_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Resting liquidity as `[price, quantity]` levels per side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Orderbook {
    pub yes: Option<Vec<[i64; 2]>>,
    pub no: Option<Vec<[i64; 2]>>,
}

impl Orderbook {
    /// Highest yes bid (price, quantity)
    pub fn best_yes_bid(&self) -> Option<[i64; 2]> {
        self.yes.as_ref()?.iter().copied().max_by_key(|level| level[0])
    }

    /// Highest no bid (price, quantity)
    pub fn best_no_bid(&self) -> Option<[i64; 2]> {
        self.no.as_ref()?.iter().copied().max_by_key(|level| level[0])
    }
}

// ============================================================================
// Portfolio
// ============================================================================

/// Account balance in cents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub balance: i64,
    pub portfolio_value: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Position held in one market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPosition {
    pub ticker: String,
    #[serde(default)]
    pub position: i64,
    /// Cost of the position in cents; non-zero means the market is exposed
    #[serde(default)]
    pub market_exposure: i64,
    pub realized_pnl: Option<i64>,
    pub total_traded: Option<i64>,
    pub resting_orders_count: Option<i64>,
    pub fees_paid: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MarketPosition {
    pub fn is_exposed(&self) -> bool {
        self.market_exposure != 0
    }
}

/// Position aggregated per event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPosition {
    pub event_ticker: String,
    pub event_exposure: Option<i64>,
    pub realized_pnl: Option<i64>,
    pub total_cost: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Own fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub trade_id: Option<String>,
    pub order_id: Option<String>,
    pub ticker: String,
    pub side: Option<Side>,
    pub action: Option<Action>,
    pub count: Option<i64>,
    pub yes_price: Option<i64>,
    pub no_price: Option<i64>,
    pub is_taker: Option<bool>,
    pub created_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Settlement of a market the account held
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub ticker: String,
    pub market_result: Option<String>,
    pub yes_count: Option<i64>,
    pub no_count: Option<i64>,
    pub revenue: Option<i64>,
    pub settled_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Total value of resting orders, in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestingOrderValue {
    pub total_resting_order_value: i64,
}

// ============================================================================
// Orders
// ============================================================================

/// An order as reported by the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub client_order_id: Option<String>,
    pub ticker: Option<String>,
    pub status: Option<String>,
    pub action: Option<Action>,
    pub side: Option<Side>,
    #[serde(rename = "type")]
    pub order_type: Option<String>,
    pub yes_price: Option<i64>,
    pub no_price: Option<i64>,
    pub remaining_count: Option<i64>,
    pub fill_count: Option<i64>,
    pub created_time: Option<String>,
    pub expiration_time: Option<String>,
    pub order_group_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    pub order: Order,
}

/// Result of cancelling a single order
#[derive(Debug, Clone, Deserialize)]
pub struct CancelOrderResponse {
    pub order: Order,
    pub reduced_by: Option<i64>,
}

/// Result of amending an order
#[derive(Debug, Clone, Deserialize)]
pub struct AmendOrderResponse {
    pub old_order: Option<Order>,
    pub order: Order,
}

/// Per-order outcome of a batch call
#[derive(Debug, Clone, Deserialize)]
pub struct BatchOrderResult {
    pub order: Option<Order>,
    pub reduced_by: Option<i64>,
    pub error: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchOrdersResponse {
    #[serde(default)]
    pub orders: Vec<BatchOrderResult>,
}

/// Position of a resting order in the price-level queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuePosition {
    pub order_id: String,
    pub market_ticker: Option<String>,
    pub queue_position: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueuePositionsResponse {
    #[serde(default)]
    pub queue_positions: Vec<QueuePosition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueuePositionResponse {
    pub queue_position: i64,
}

/// Server-side cap on contracts filled across a set of orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderGroup {
    #[serde(alias = "order_group_id")]
    pub id: Option<String>,
    pub contracts_limit: Option<i64>,
    pub is_auto_cancel_enabled: Option<bool>,
    #[serde(default)]
    pub orders: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderGroupsResponse {
    #[serde(default)]
    pub order_groups: Vec<OrderGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderGroupResponse {
    pub order_group_id: String,
}

// ============================================================================
// Communications
// ============================================================================

/// RFQ quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: Option<String>,
    pub market_ticker: Option<String>,
    pub status: Option<String>,
    pub yes_bid: Option<i64>,
    pub no_bid: Option<i64>,
    pub created_ts: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Envelopes
// ============================================================================

macro_rules! list_response {
    ($name:ident, $field:ident, $item:ty) => {
        #[derive(Debug, Clone, Deserialize)]
        pub struct $name {
            #[serde(default)]
            pub $field: Vec<$item>,
            #[serde(default)]
            pub cursor: Option<String>,
        }

        impl From<$name> for Page<$item> {
            fn from(resp: $name) -> Self {
                Page::new(resp.$field, resp.cursor)
            }
        }
    };
}

list_response!(MarketsResponse, markets, Market);
list_response!(EventsResponse, events, Event);
list_response!(SeriesListResponse, series, Series);
list_response!(TradesResponse, trades, Trade);
list_response!(FillsResponse, fills, Fill);
list_response!(OrdersResponse, orders, Order);
list_response!(SettlementsResponse, settlements, Settlement);
list_response!(AnnouncementsResponse, announcements, Announcement);
list_response!(QuotesResponse, quotes, Quote);

/// Portfolio positions, per market and per event
#[derive(Debug, Clone, Deserialize)]
pub struct PositionsResponse {
    #[serde(default)]
    pub market_positions: Vec<MarketPosition>,
    #[serde(default)]
    pub event_positions: Vec<EventPosition>,
    #[serde(default)]
    pub cursor: Option<String>,
}

impl From<PositionsResponse> for Page<MarketPosition> {
    fn from(resp: PositionsResponse) -> Self {
        Page::new(resp.market_positions, resp.cursor)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketResponse {
    pub market: Market,
}

/// Event detail with its markets
#[derive(Debug, Clone, Deserialize)]
pub struct EventResponse {
    pub event: Event,
    #[serde(default)]
    pub markets: Vec<Market>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeriesResponse {
    pub series: Series,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderbookResponse {
    pub orderbook: Orderbook,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_keeps_unknown_fields() {
        let json = r#"{
            "ticker": "KXHIGHNY-25JAN01-B40",
            "event_ticker": "KXHIGHNY-25JAN01",
            "status": "settled",
            "result": "yes",
            "last_price": 97,
            "rules_primary": "If the high temperature..."
        }"#;
        let market: Market = serde_json::from_str(json).unwrap();
        assert_eq!(market.result.as_deref(), Some("yes"));
        assert_eq!(market.last_price, Some(97));
        assert!(market.extra.contains_key("rules_primary"));
        assert_eq!(market.field("status"), Some(Value::from("settled")));
        assert_eq!(market.field("rules_primary").and_then(|v| v.as_str().map(str::len)), Some(26));
        assert_eq!(market.field("volume"), None);
    }

    #[test]
    fn test_list_envelope_to_page() {
        let json = r#"{"markets":[{"ticker":"A"},{"ticker":"B"}],"cursor":""}"#;
        let resp: MarketsResponse = serde_json::from_str(json).unwrap();
        let page: Page<Market> = resp.into();
        assert_eq!(page.len(), 2);
        assert!(!page.has_more());
    }

    #[test]
    fn test_position_exposure() {
        let json = r#"{"market_positions":[
            {"ticker":"A","position":3,"market_exposure":120},
            {"ticker":"B","position":0,"market_exposure":0}
        ],"event_positions":[],"cursor":"x"}"#;
        let resp: PositionsResponse = serde_json::from_str(json).unwrap();
        let exposed: Vec<_> = resp.market_positions.iter().filter(|p| p.is_exposed()).collect();
        assert_eq!(exposed.len(), 1);
        assert_eq!(exposed[0].ticker, "A");
    }

    #[test]
    fn test_orderbook_best_levels() {
        let book: Orderbook = serde_json::from_str(r#"{"yes":[[40,10],[42,5]],"no":null}"#).unwrap();
        assert_eq!(book.best_yes_bid(), Some([42, 5]));
        assert_eq!(book.best_no_bid(), None);
    }
}
