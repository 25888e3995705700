//! High-level SDK for the Kalshi trading API
//!
//! This crate ties the signed REST client and the streaming session together
//! behind one [`KalshiClient`], built once at startup and shared from there.
//!
//! # Quick Start
//!
//! ```no_run
//! use kalshi_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = KalshiClient::builder()
//!         .with_environment(Environment::Production)
//!         .with_credentials_from_env()?
//!         .build()?;
//!
//!     // Settled markets of one series, every page
//!     let params = GetMarketsParams::builder()
//!         .series_ticker("KXHIGHNY")
//!         .status(MarketStatus::Settled)
//!         .limit(500)
//!         .build();
//!     let markets = client.rest().get_all_markets(params, PageCap::unbounded()).await?;
//!     println!("{} settled markets", markets.len());
//!
//!     // Live orderbook deltas
//!     let (_session, handle, mut events) = client.stream_events(vec![]).await?;
//!     handle.subscribe_orderbook(&["KXHIGHNY-25JAN01-B40"])?;
//!     while let Some(event) = events.recv().await {
//!         if let StreamEvent::Message(msg) = event {
//!             println!("{:?}: {}", msg.kind, msg.msg);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - **One auth context**: REST calls and stream handshakes sign the same way
//! - **Rate limiting**: REST calls are spaced by a shared minimum interval
//! - **Pagination**: cursor walking with item and page caps
//! - **Streaming**: ordered message ids and acknowledgment tracking

pub mod builder;
pub mod client;
pub mod prelude;

// Re-export main types
pub use builder::{ConfigError, KalshiClientBuilder};
pub use client::KalshiClient;

// Re-export commonly used types from dependencies
pub use kalshi_auth::{AuthContext, Credentials};
pub use kalshi_rest::{ClientConfig, KalshiRestClient};
pub use kalshi_types::{Channel, Environment, KalshiError, KalshiResult};
pub use kalshi_ws::{StreamConfig, StreamEvent, StreamHandle, StreamHandler, StreamSession};
