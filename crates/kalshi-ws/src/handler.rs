//! Callbacks invoked by a running stream session

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{error, warn};

use kalshi_types::{Channel, KalshiError, StreamMessage};

use crate::session::StreamHandle;

/// Receives the lifecycle and messages of one session
///
/// Calls for one session never overlap. `on_open` runs exactly once, before
/// any message is read, and may issue subscriptions through the handle.
/// Exactly one of `on_close` and `on_error` ends the session.
#[async_trait]
pub trait StreamHandler: Send + Sync {
    async fn on_open(&self, _handle: StreamHandle) {}

    async fn on_message(&self, message: StreamMessage);

    async fn on_error(&self, error: &KalshiError) {
        error!(%error, "Stream session failed");
    }

    async fn on_close(&self, _code: u16, _reason: &str) {}
}

/// Session events as published by [`ChannelHandler`]
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// The session is open
    Opened,
    /// An inbound message, acknowledgments included
    Message(StreamMessage),
    /// The session failed, or a default subscription could not be sent
    Error(KalshiError),
    /// The session closed
    Closed { code: u16, reason: String },
}

/// Handler that forwards everything onto an unbounded channel
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use kalshi_types::Channel;
/// use kalshi_ws::{ChannelHandler, StreamEvent};
///
/// let (handler, mut events) = ChannelHandler::new();
/// let handler = Arc::new(handler.with_subscriptions(vec![Channel::ticker()]));
/// # let _ = (handler, &mut events);
/// ```
#[derive(Debug)]
pub struct ChannelHandler {
    tx: mpsc::UnboundedSender<StreamEvent>,
    subscriptions: Vec<Channel>,
}

impl ChannelHandler {
    /// Create a handler and the receiver of its events
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StreamEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                subscriptions: Vec::new(),
            },
            rx,
        )
    }

    /// Channels to subscribe to as soon as the session opens
    pub fn with_subscriptions(mut self, channels: Vec<Channel>) -> Self {
        self.subscriptions = channels;
        self
    }

    fn emit(&self, event: StreamEvent) {
        if self.tx.send(event).is_err() {
            warn!("Stream event receiver dropped");
        }
    }
}

#[async_trait]
impl StreamHandler for ChannelHandler {
    async fn on_open(&self, handle: StreamHandle) {
        self.emit(StreamEvent::Opened);
        if !self.subscriptions.is_empty() {
            if let Err(e) = handle.subscribe(self.subscriptions.clone()) {
                self.emit(StreamEvent::Error(e));
            }
        }
    }

    async fn on_message(&self, message: StreamMessage) {
        self.emit(StreamEvent::Message(message));
    }

    async fn on_error(&self, error: &KalshiError) {
        error!(%error, "Stream session failed");
        self.emit(StreamEvent::Error(error.clone()));
    }

    async fn on_close(&self, code: u16, reason: &str) {
        self.emit(StreamEvent::Closed {
            code,
            reason: reason.to_string(),
        });
    }
}
