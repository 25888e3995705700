//! Re-exports for convenience
//!
//! Import everything you need with:
//! ```
//! use kalshi_sdk::prelude::*;
//! ```

// Client
pub use crate::builder::{ConfigError, KalshiClientBuilder};
pub use crate::client::KalshiClient;

// Types from kalshi-types
pub use kalshi_types::{
    Action, Channel, Environment, KalshiError, KalshiResult, MarketStatus, OrderStatus,
    OrderType, Page, PageCap, Side,
    // Requests
    AmendOrderRequest, CreateOrderRequest, DecreaseOrderRequest,
    // Parameters
    GetEventsParams, GetFillsParams, GetMarketsParams, GetOrdersParams, GetPositionsParams,
    GetSettlementsParams, GetTradesParams,
    // Models
    Balance, Event, Fill, Market, MarketPosition, Order, Orderbook, Settlement, Trade,
    // Stream wire types
    StreamMessage, StreamMessageKind,
};

// Auth
pub use kalshi_auth::{AuthContext, Credentials, Signer};

// REST
pub use kalshi_rest::{ClientConfig, KalshiRestClient, PaginatedResource};

// Streaming
pub use kalshi_ws::{
    ChannelHandler, SessionState, StreamConfig, StreamEvent, StreamHandle, StreamHandler,
    StreamSession, SubscriptionState,
};
