//! Streaming wire messages

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::channel::Channel;
use crate::error::{KalshiError, KalshiResult};

// ============================================================================
// Outbound
// ============================================================================

/// Command verbs of outbound control messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Subscribe,
    Unsubscribe,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
            Self::Unsubscribe => "unsubscribe",
        }
    }
}

/// Parameters of a control message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlParams {
    pub channels: Vec<String>,
}

/// `{"id": N, "cmd": "...", "params": {"channels": [...]}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMessage {
    pub id: u64,
    pub cmd: Command,
    pub params: ControlParams,
}

impl ControlMessage {
    pub fn new(id: u64, cmd: Command, channels: &[Channel]) -> Self {
        Self {
            id,
            cmd,
            params: ControlParams {
                channels: channels.iter().map(Channel::wire_name).collect(),
            },
        }
    }

    pub fn subscribe(id: u64, channels: &[Channel]) -> Self {
        Self::new(id, Command::Subscribe, channels)
    }

    pub fn unsubscribe(id: u64, channels: &[Channel]) -> Self {
        Self::new(id, Command::Unsubscribe, channels)
    }

    pub fn to_json(&self) -> KalshiResult<String> {
        serde_json::to_string(self).map_err(|e| KalshiError::InvalidJson {
            message: e.to_string(),
            raw: None,
        })
    }
}

// ============================================================================
// Inbound
// ============================================================================

/// Classified kind of an inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum StreamMessageKind {
    /// Subscription acknowledged
    Subscribed,
    /// Unsubscription acknowledged
    Unsubscribed,
    /// Generic success reply to a control message
    Ok,
    /// Error reply; `id` correlates it to the request
    Error { code: Option<i64>, msg: String },
    Ticker,
    OrderbookSnapshot,
    OrderbookDelta,
    Trade,
    Fill,
    /// Any other `type` value
    Other(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    id: Option<u64>,
    sid: Option<u64>,
    seq: Option<u64>,
    #[serde(default)]
    msg: Value,
}

/// One decoded inbound frame
#[derive(Debug, Clone, PartialEq)]
pub struct StreamMessage {
    pub kind: StreamMessageKind,
    /// Id of the control message this replies to
    pub id: Option<u64>,
    /// Server subscription id
    pub sid: Option<u64>,
    /// Per-subscription sequence number
    pub seq: Option<u64>,
    /// Payload (`null` when absent)
    pub msg: Value,
}

impl StreamMessage {
    /// Decode a text frame
    pub fn parse(text: &str) -> KalshiResult<Self> {
        let envelope: Envelope =
            serde_json::from_str(text).map_err(|e| KalshiError::invalid_json(&e, text))?;

        let kind = match envelope.kind.as_str() {
            "subscribed" => StreamMessageKind::Subscribed,
            "unsubscribed" => StreamMessageKind::Unsubscribed,
            "ok" => StreamMessageKind::Ok,
            "error" => StreamMessageKind::Error {
                code: envelope.msg.get("code").and_then(Value::as_i64),
                msg: envelope
                    .msg
                    .get("msg")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
            "ticker" | "ticker_v2" => StreamMessageKind::Ticker,
            "orderbook_snapshot" => StreamMessageKind::OrderbookSnapshot,
            "orderbook_delta" => StreamMessageKind::OrderbookDelta,
            "trade" => StreamMessageKind::Trade,
            "fill" => StreamMessageKind::Fill,
            other => StreamMessageKind::Other(other.to_string()),
        };

        Ok(Self {
            kind,
            id: envelope.id,
            sid: envelope.sid,
            seq: envelope.seq,
            msg: envelope.msg,
        })
    }

    /// Market ticker carried by the payload, if any
    pub fn market_ticker(&self) -> Option<&str> {
        self.msg.get("market_ticker").and_then(Value::as_str)
    }

    /// Server subscription id, from the envelope or an acknowledgment payload
    pub fn subscription_id(&self) -> Option<u64> {
        self.sid.or_else(|| self.msg.get("sid").and_then(Value::as_u64))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, StreamMessageKind::Error { .. })
    }
}
