//! Authenticated WebSocket streaming client for the Kalshi trading API
//!
//! A [`StreamSession`] performs the signed upgrade, then hands out cloneable
//! [`StreamHandle`]s for subscribing and unsubscribing. Inbound frames are
//! parsed into [`StreamMessage`](kalshi_types::StreamMessage)s and delivered
//! to a [`StreamHandler`].
//!
//! # Features
//!
//! - Message ids start at 1, strictly increase and are never reused
//! - Subscription bookkeeping driven by server acknowledgments
//! - Single writer task; close requests interrupt a pending read
//! - Pluggable [`Transport`] with a mock for tests (`test-utils` feature)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use kalshi_auth::{AuthContext, Credentials};
//! use kalshi_types::Environment;
//! use kalshi_ws::{ChannelHandler, StreamConfig, StreamEvent, StreamSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = Credentials::from_env()?;
//!     let auth = AuthContext::new(&creds, Environment::Sandbox);
//!
//!     let (handler, mut events) = ChannelHandler::new();
//!     let mut session = StreamSession::new(auth, StreamConfig::new());
//!     let handle = session.open(Arc::new(handler)).await?;
//!     handle.subscribe_orderbook(&["KXHIGHNY-25JAN01-B40"])?;
//!
//!     while let Some(event) = events.recv().await {
//!         if let StreamEvent::Message(msg) = event {
//!             println!("{:?} {:?}", msg.kind, msg.msg);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod handler;
pub mod registry;
pub mod session;
pub mod transport;

// Re-export main types
pub use error::TransportError;
pub use handler::{ChannelHandler, StreamEvent, StreamHandler};
pub use registry::{
    ControlKind, ControlRecord, Subscription, SubscriptionRegistry, SubscriptionState,
    CONTROL_LOG_CAPACITY,
};
pub use session::{
    SessionState, StreamConfig, StreamHandle, StreamSession, DEFAULT_CONNECT_TIMEOUT, NORMAL_CLOSE,
};
pub use transport::{Inbound, Transport, WsTransport};

#[cfg(any(test, feature = "test-utils"))]
pub use transport::{MockHandshake, MockServer, MockTransport};
