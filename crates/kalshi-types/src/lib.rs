//! Shared types for the Kalshi trading API
//!
//! This crate provides the core type definitions used across the workspace.
//! It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`Environment`] - Sandbox/production endpoint pairs
//! - [`KalshiError`] - Error taxonomy shared by the REST and streaming clients
//! - [`CreateOrderRequest`], [`AmendOrderRequest`], [`DecreaseOrderRequest`] - Validated order payloads
//! - [`GetMarketsParams`] and friends - Optional query filters
//! - [`Page`] - One page of a cursor-paginated collection
//! - [`Channel`], [`StreamMessage`], [`ControlMessage`] - Streaming wire types

pub mod channel;
pub mod enums;
pub mod environment;
pub mod error;
pub mod models;
pub mod orders;
pub mod page;
pub mod params;
pub mod stream;

// Re-export commonly used types
pub use channel::*;
pub use enums::*;
pub use environment::*;
pub use error::*;
pub use models::*;
pub use orders::*;
pub use page::*;
pub use params::*;
pub use stream::*;
