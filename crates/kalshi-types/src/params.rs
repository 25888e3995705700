//! Query parameter sets
//!
//! Every filter is optional. Unset fields are skipped during serialization,
//! so only the filters a caller supplied ever reach the query string.

use serde::{Serialize, Serializer};
use typed_builder::TypedBuilder;

use crate::enums::{MarketStatus, OrderStatus, SettlementStatus};

/// Parameter sets that carry a pagination cursor
pub trait Paginated: Clone {
    /// Replace the cursor, `None` meaning "first page"
    fn set_cursor(&mut self, cursor: Option<String>);
    /// Cursor the walk starts from
    fn cursor(&self) -> Option<&str>;
    /// Current page size limit, if any
    fn page_limit(&self) -> Option<u32>;
}

macro_rules! paginated {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Paginated for $ty {
                fn set_cursor(&mut self, cursor: Option<String>) {
                    self.cursor = cursor;
                }

                fn cursor(&self) -> Option<&str> {
                    self.cursor.as_deref()
                }

                fn page_limit(&self) -> Option<u32> {
                    self.limit
                }
            }
        )*
    };
}

/// Filters for the market listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct GetMarketsParams {
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_ticker: Option<String>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_ticker: Option<String>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_close_ts: Option<i64>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_close_ts: Option<i64>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MarketStatus>,
}

/// Filters for portfolio positions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct GetPositionsParams {
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Comma-separated list of non-zero fields to filter on (e.g. `position,total_traded`)
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_filter: Option<String>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement_status: Option<SettlementStatus>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_ticker: Option<String>,
}

/// Filters for fills
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct GetFillsParams {
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ts: Option<i64>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ts: Option<i64>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Filters for the order listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct GetOrdersParams {
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_ticker: Option<String>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ts: Option<i64>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ts: Option<i64>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Filters for settlements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct GetSettlementsParams {
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_ticker: Option<String>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ts: Option<i64>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ts: Option<i64>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Filters for public trades
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct GetTradesParams {
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ts: Option<i64>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ts: Option<i64>,
}

/// Filters for the event listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct GetEventsParams {
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MarketStatus>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_ticker: Option<String>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_nested_markets: Option<bool>,
}

/// Filters for multivariate events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct GetMultivariateEventsParams {
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MarketStatus>,
}

/// Paging for the series listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct GetSeriesParams {
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Paging for exchange announcements
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct GetAnnouncementsParams {
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Filters for RFQ quotes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct GetQuotesParams {
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_ticker: Option<String>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_ticker: Option<String>,
    #[builder(setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

paginated!(
    GetMarketsParams,
    GetPositionsParams,
    GetFillsParams,
    GetOrdersParams,
    GetSettlementsParams,
    GetTradesParams,
    GetEventsParams,
    GetMultivariateEventsParams,
    GetSeriesParams,
    GetAnnouncementsParams,
    GetQuotesParams,
);

/// Candlestick window for a single market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarketCandlesticksParams {
    pub start_ts: i64,
    pub end_ts: i64,
    /// Bucket length in minutes (1, 60 or 1440)
    pub period_interval: u32,
}

/// Candlestick window for an event, every bound optional
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TypedBuilder)]
#[builder(field_defaults(default, setter(strip_option)))]
pub struct EventCandlesticksParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_ts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_ts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_interval: Option<u32>,
}

/// Time range for forecast percentile history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TypedBuilder)]
#[builder(field_defaults(default, setter(strip_option)))]
pub struct ForecastHistoryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ts: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_ts: Option<i64>,
}

/// Orderbook depth
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrderbookParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

/// Batch lookup of live data; list values are sent comma-joined
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LiveDataBatchParams {
    #[serde(serialize_with = "comma_joined", skip_serializing_if = "Vec::is_empty")]
    pub milestone_ids: Vec<String>,
    #[serde(serialize_with = "comma_joined", skip_serializing_if = "Vec::is_empty")]
    pub data_types: Vec<String>,
}

impl LiveDataBatchParams {
    pub fn new<I, S>(milestone_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            milestone_ids: milestone_ids.into_iter().map(Into::into).collect(),
            data_types: Vec::new(),
        }
    }

    pub fn with_data_types<I, S>(mut self, data_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data_types = data_types.into_iter().map(Into::into).collect();
        self
    }
}

fn comma_joined<S: Serializer>(values: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&values.join(","))
}
