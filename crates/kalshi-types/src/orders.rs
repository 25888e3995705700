//! Order request payloads with client-side validation

use serde::{Deserialize, Serialize};

use crate::enums::{Action, OrderType, Side};
use crate::error::{KalshiError, KalshiResult};

// ============================================================================
// Create
// ============================================================================

/// Order submission payload
///
/// Prices are in cents. Exactly one of `yes_price` / `no_price` must be set;
/// [`CreateOrderRequest::validate`] enforces this before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub action: Action,
    pub client_order_id: String,
    pub count: u32,
    pub side: Side,
    pub ticker: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_max_cost: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_ts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_position_floor: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yes_price: Option<u32>,
}

impl CreateOrderRequest {
    /// Start an order with the required fields; add a price before submitting
    pub fn new(
        ticker: impl Into<String>,
        action: Action,
        side: Side,
        order_type: OrderType,
        count: u32,
        client_order_id: impl Into<String>,
    ) -> Self {
        Self {
            action,
            client_order_id: client_order_id.into(),
            count,
            side,
            ticker: ticker.into(),
            order_type,
            buy_max_cost: None,
            expiration_ts: None,
            no_price: None,
            post_only: None,
            sell_position_floor: None,
            yes_price: None,
        }
    }

    /// Limit order priced on the yes side
    pub fn limit_yes(
        ticker: impl Into<String>,
        action: Action,
        side: Side,
        count: u32,
        yes_price: u32,
        client_order_id: impl Into<String>,
    ) -> Self {
        Self::new(ticker, action, side, OrderType::Limit, count, client_order_id)
            .with_yes_price(yes_price)
    }

    /// Limit order priced on the no side
    pub fn limit_no(
        ticker: impl Into<String>,
        action: Action,
        side: Side,
        count: u32,
        no_price: u32,
        client_order_id: impl Into<String>,
    ) -> Self {
        Self::new(ticker, action, side, OrderType::Limit, count, client_order_id)
            .with_no_price(no_price)
    }

    pub fn with_yes_price(mut self, cents: u32) -> Self {
        self.yes_price = Some(cents);
        self
    }

    pub fn with_no_price(mut self, cents: u32) -> Self {
        self.no_price = Some(cents);
        self
    }

    /// Cap the total cost of a market buy, in cents
    pub fn with_buy_max_cost(mut self, cents: u64) -> Self {
        self.buy_max_cost = Some(cents);
        self
    }

    /// Expire the order at the given unix timestamp (seconds)
    pub fn with_expiration_ts(mut self, ts: i64) -> Self {
        self.expiration_ts = Some(ts);
        self
    }

    /// Reject instead of taking liquidity
    pub fn post_only(mut self) -> Self {
        self.post_only = Some(true);
        self
    }

    pub fn with_sell_position_floor(mut self, floor: u32) -> Self {
        self.sell_position_floor = Some(floor);
        self
    }

    /// Check required fields and the price exclusivity rule
    pub fn validate(&self) -> KalshiResult<()> {
        if self.ticker.is_empty() {
            return Err(KalshiError::validation("ticker is required"));
        }
        if self.client_order_id.is_empty() {
            return Err(KalshiError::validation("client_order_id is required"));
        }
        if self.count == 0 {
            return Err(KalshiError::validation("count must be positive"));
        }
        exactly_one_price(self.yes_price, self.no_price)
    }
}

// ============================================================================
// Amend
// ============================================================================

/// Payload for amending the price or size of a resting order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmendOrderRequest {
    pub action: Action,
    pub client_order_id: String,
    pub count: u32,
    pub side: Side,
    pub ticker: String,
    pub updated_client_order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_price: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yes_price: Option<u32>,
}

impl AmendOrderRequest {
    pub fn new(
        ticker: impl Into<String>,
        action: Action,
        side: Side,
        count: u32,
        client_order_id: impl Into<String>,
        updated_client_order_id: impl Into<String>,
    ) -> Self {
        Self {
            action,
            client_order_id: client_order_id.into(),
            count,
            side,
            ticker: ticker.into(),
            updated_client_order_id: updated_client_order_id.into(),
            no_price: None,
            yes_price: None,
        }
    }

    pub fn with_yes_price(mut self, cents: u32) -> Self {
        self.yes_price = Some(cents);
        self
    }

    pub fn with_no_price(mut self, cents: u32) -> Self {
        self.no_price = Some(cents);
        self
    }

    pub fn validate(&self) -> KalshiResult<()> {
        if self.ticker.is_empty() {
            return Err(KalshiError::validation("ticker is required"));
        }
        if self.updated_client_order_id.is_empty() {
            return Err(KalshiError::validation("updated_client_order_id is required"));
        }
        exactly_one_price(self.yes_price, self.no_price)
    }
}

// ============================================================================
// Decrease
// ============================================================================

/// Payload for shrinking a resting order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecreaseOrderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_by: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_to: Option<u32>,
}

impl DecreaseOrderRequest {
    /// Reduce the remaining count by `n` contracts
    pub fn by(n: u32) -> Self {
        Self {
            reduce_by: Some(n),
            reduce_to: None,
        }
    }

    /// Reduce the remaining count down to `n` contracts
    pub fn to(n: u32) -> Self {
        Self {
            reduce_by: None,
            reduce_to: Some(n),
        }
    }

    /// Build from raw options, failing unless exactly one is set
    pub fn new(reduce_by: Option<u32>, reduce_to: Option<u32>) -> KalshiResult<Self> {
        let request = Self {
            reduce_by,
            reduce_to,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> KalshiResult<()> {
        match (self.reduce_by, self.reduce_to) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            _ => Err(KalshiError::validation(
                "exactly one of reduce_by or reduce_to must be provided",
            )),
        }
    }
}

// ============================================================================
// Batches
// ============================================================================

/// Body of a batch order submission
#[derive(Debug, Clone, Serialize)]
pub struct BatchCreateOrdersRequest {
    pub orders: Vec<CreateOrderRequest>,
}

impl BatchCreateOrdersRequest {
    /// Validate every order; an empty batch is rejected
    pub fn new(orders: Vec<CreateOrderRequest>) -> KalshiResult<Self> {
        if orders.is_empty() {
            return Err(KalshiError::validation("batch must contain at least one order"));
        }
        for (i, order) in orders.iter().enumerate() {
            order
                .validate()
                .map_err(|e| KalshiError::validation(format!("order {i}: {e}")))?;
        }
        Ok(Self { orders })
    }
}

/// Body of a batch cancel (sent on a DELETE)
#[derive(Debug, Clone, Serialize)]
pub struct BatchCancelOrdersRequest {
    pub ids: Vec<String>,
}

impl BatchCancelOrdersRequest {
    pub fn new<I, S>(ids: I) -> KalshiResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            return Err(KalshiError::validation("batch cancel needs at least one order id"));
        }
        Ok(Self { ids })
    }
}

/// Body for creating an order group
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderGroupRequest {
    pub contracts_limit: u32,
}

fn exactly_one_price(yes_price: Option<u32>, no_price: Option<u32>) -> KalshiResult<()> {
    match (yes_price, no_price) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        _ => Err(KalshiError::validation(
            "exactly one of yes_price or no_price must be provided",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> CreateOrderRequest {
        CreateOrderRequest::new("KXHIGHNY-25JAN01-B40", Action::Buy, Side::Yes, OrderType::Limit, 10, "c-1")
    }

    #[test]
    fn test_price_exclusivity() {
        assert!(base().with_yes_price(40).validate().is_ok());
        assert!(base().with_no_price(60).validate().is_ok());

        let neither = base().validate().unwrap_err();
        assert!(matches!(neither, KalshiError::Validation(_)));

        let both = base().with_yes_price(40).with_no_price(60).validate().unwrap_err();
        assert!(matches!(both, KalshiError::Validation(_)));
    }

    #[test]
    fn test_absent_fields_not_serialized() {
        let order = CreateOrderRequest::limit_yes("T", Action::Sell, Side::No, 3, 55, "c-2");
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["type"], "limit");
        assert_eq!(json["yes_price"], 55);
        assert!(json.get("no_price").is_none());
        assert!(json.get("post_only").is_none());
        assert!(json.get("expiration_ts").is_none());
    }

    #[test]
    fn test_required_fields() {
        let mut order = base().with_yes_price(1);
        order.count = 0;
        assert!(order.validate().is_err());

        let order = CreateOrderRequest::limit_yes("", Action::Buy, Side::Yes, 1, 1, "c");
        assert!(order.validate().is_err());
    }

    #[test]
    fn test_amend_requires_one_price() {
        let amend = AmendOrderRequest::new("T", Action::Buy, Side::Yes, 5, "c-1", "c-2");
        assert!(amend.validate().is_err());
        assert!(amend.clone().with_no_price(30).validate().is_ok());
        assert!(amend.with_no_price(30).with_yes_price(70).validate().is_err());
    }

    #[test]
    fn test_decrease_exclusivity() {
        assert!(DecreaseOrderRequest::new(Some(1), None).is_ok());
        assert!(DecreaseOrderRequest::new(None, Some(2)).is_ok());
        assert!(DecreaseOrderRequest::new(None, None).is_err());
        assert!(DecreaseOrderRequest::new(Some(1), Some(2)).is_err());

        let json = serde_json::to_string(&DecreaseOrderRequest::to(4)).unwrap();
        assert_eq!(json, r#"{"reduce_to":4}"#);
    }

    #[test]
    fn test_batch_validation() {
        assert!(BatchCreateOrdersRequest::new(vec![]).is_err());

        let err = BatchCreateOrdersRequest::new(vec![base().with_yes_price(5), base()]).unwrap_err();
        assert!(err.to_string().contains("order 1"));

        assert!(BatchCancelOrdersRequest::new(Vec::<String>::new()).is_err());
        let cancel = BatchCancelOrdersRequest::new(["a", "b"]).unwrap();
        assert_eq!(serde_json::to_string(&cancel).unwrap(), r#"{"ids":["a","b"]}"#);
    }
}
