//! Authenticated REST client for the Kalshi trading API
//!
//! # Features
//!
//! - **Signing**: every request carries RSA-PSS auth headers
//! - **Rate limiting**: one minimum-interval gate per client (100 ms by default)
//! - **Pagination**: cursor walking with item and page caps
//! - **Endpoints**: exchange, portfolio, orders, order groups, markets,
//!   events and series, communications, live data
//!
//! Non-2xx responses surface as [`KalshiError::Api`](kalshi_types::KalshiError::Api)
//! with the raw body. The client never retries.
//!
//! # Example
//!
//! ```no_run
//! use kalshi_auth::Credentials;
//! use kalshi_rest::{ClientConfig, KalshiRestClient};
//! use kalshi_types::{GetMarketsParams, PageCap};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = Credentials::from_env()?;
//!     let client = KalshiRestClient::new(&creds, ClientConfig::default())?;
//!
//!     let balance = client.get_balance().await?;
//!     println!("Balance: {} cents", balance.balance);
//!
//!     let params = GetMarketsParams::builder().series_ticker("KXHIGHNY").build();
//!     let markets = client.get_all_markets(params, PageCap::items(1000)).await?;
//!     println!("{} markets", markets.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod endpoints;
pub mod error;
pub mod pagination;
pub mod rate_limiter;
pub mod request;
pub mod transport;

// Re-export main types
pub use client::{ClientConfig, KalshiRestClient};
pub use endpoints::markets::{filter_by_field, group_by_field, ticker_map};
pub use endpoints::portfolio::total_exposure;
pub use error::RestResult;
pub use pagination::PaginatedResource;
pub use rate_limiter::{RateLimiter, DEFAULT_MIN_INTERVAL};
pub use request::RestRequest;
pub use transport::RestTransport;
