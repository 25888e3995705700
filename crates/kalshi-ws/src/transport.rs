//! WebSocket transport abstraction
//!
//! The session drives a [`Transport`] instead of a socket directly, so the
//! state machine can be exercised without a network.
//!
//! # Example
//!
//! ```no_run
//! use kalshi_ws::transport::{Inbound, Transport, TransportError, WsTransport};
//!
//! async fn example() -> Result<(), TransportError> {
//!     let mut transport = WsTransport::new();
//!     transport.connect("wss://demo-api.kalshi.co/trade-api/ws/v2", &[]).await?;
//!     transport
//!         .send(r#"{"id":1,"cmd":"subscribe","params":{"channels":["ticker"]}}"#)
//!         .await?;
//!     if let Inbound::Text(text) = transport.recv().await? {
//!         println!("Received: {}", text);
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, instrument};

pub use crate::error::TransportError;

/// Close code reported when the stream ends without a close frame
pub const ABNORMAL_CLOSE: u16 = 1006;

/// One inbound event from the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A text frame
    Text(String),
    /// The peer closed the connection, or the stream ended
    Closed { code: u16, reason: String },
}

/// Trait for WebSocket transport abstraction
///
/// `recv` must be cancel-safe: the session races it against outbound
/// commands and drops it when a command wins.
#[async_trait]
pub trait Transport: Send {
    /// Open the connection, sending `headers` with the upgrade request
    async fn connect(
        &mut self,
        url: &str,
        headers: &[(&'static str, String)],
    ) -> Result<(), TransportError>;

    /// Send a text message
    async fn send(&mut self, message: &str) -> Result<(), TransportError>;

    /// Receive the next text frame or close notification
    async fn recv(&mut self) -> Result<Inbound, TransportError>;

    /// Close the connection gracefully
    async fn close(&mut self) -> Result<(), TransportError>;

    /// Check if currently connected
    fn is_connected(&self) -> bool;
}

/// Real WebSocket transport using tokio-tungstenite
#[derive(Default)]
pub struct WsTransport {
    stream: Option<WebSocketStream<MaybeTlsStream<TcpStream>>>,
}

impl WsTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for WsTransport {
    #[instrument(skip(self, headers))]
    async fn connect(
        &mut self,
        url: &str,
        headers: &[(&'static str, String)],
    ) -> Result<(), TransportError> {
        debug!("Connecting to WebSocket");

        let mut request = url
            .into_client_request()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        for (name, value) in headers {
            let invalid =
                |e: &dyn std::fmt::Display| TransportError::Protocol(format!("header {name}: {e}"));
            let header = HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(&e))?;
            let value = HeaderValue::from_str(value).map_err(|e| invalid(&e))?;
            request.headers_mut().insert(header, value);
        }

        let (ws_stream, response) = connect_async(request)
            .await
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        self.stream = Some(ws_stream);
        debug!(status = response.status().as_u16(), "WebSocket connected");
        Ok(())
    }

    #[instrument(skip(self, message), fields(len = message.len()))]
    async fn send(&mut self, message: &str) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;

        stream
            .send(Message::Text(message.to_string()))
            .await
            .map_err(send_error)
    }

    async fn recv(&mut self) -> Result<Inbound, TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;

        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Inbound::Text(text)),
                Some(Ok(Message::Binary(data))) => {
                    return String::from_utf8(data)
                        .map(Inbound::Text)
                        .map_err(|e| TransportError::Protocol(e.to_string()));
                }
                Some(Ok(Message::Close(frame))) => {
                    self.stream = None;
                    let (code, reason) = frame
                        .map(|f| (u16::from(f.code), f.reason.into_owned()))
                        .unwrap_or((ABNORMAL_CLOSE, String::new()));
                    return Ok(Inbound::Closed { code, reason });
                }
                // Pongs are queued by tungstenite itself
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
                Some(Err(e)) => return Err(TransportError::ReceiveFailed(e.to_string())),
                None => {
                    self.stream = None;
                    return Ok(Inbound::Closed {
                        code: ABNORMAL_CLOSE,
                        reason: "stream ended".to_string(),
                    });
                }
            }
        }
    }

    #[instrument(skip(self))]
    async fn close(&mut self) -> Result<(), TransportError> {
        if let Some(mut stream) = self.stream.take() {
            match stream.close(None).await {
                Ok(()) | Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => {}
                Err(e) => return Err(send_error(e)),
            }
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

fn send_error(err: WsError) -> TransportError {
    match err {
        WsError::ConnectionClosed | WsError::AlreadyClosed => TransportError::ConnectionClosed,
        other => TransportError::SendFailed(other.to_string()),
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{Handshake as MockHandshake, MockServer, MockTransport};

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio::sync::mpsc;

    use super::{Inbound, Transport, TransportError};

    /// What the mock saw during `connect`
    #[derive(Debug, Clone, Default)]
    pub struct Handshake {
        pub url: String,
        pub headers: Vec<(String, String)>,
    }

    /// Mock transport for testing
    ///
    /// Inbound frames are fed through the paired [`MockServer`]; `recv`
    /// blocks until the server pushes something, like a quiet socket.
    pub struct MockTransport {
        connected: bool,
        inbound: mpsc::UnboundedReceiver<Result<Inbound, TransportError>>,
        sent: mpsc::UnboundedSender<String>,
        handshake: Arc<Mutex<Option<Handshake>>>,
        /// Simulate connection failure
        pub fail_connect: bool,
        /// Simulate send failure
        pub fail_send: bool,
    }

    /// Test-side end of a [`MockTransport`]
    pub struct MockServer {
        inbound: mpsc::UnboundedSender<Result<Inbound, TransportError>>,
        sent: mpsc::UnboundedReceiver<String>,
        handshake: Arc<Mutex<Option<Handshake>>>,
    }

    impl MockTransport {
        /// Create a transport and the server handle that drives it
        pub fn pair() -> (Self, MockServer) {
            let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
            let (sent_tx, sent_rx) = mpsc::unbounded_channel();
            let handshake = Arc::new(Mutex::new(None));

            let transport = Self {
                connected: false,
                inbound: inbound_rx,
                sent: sent_tx,
                handshake: Arc::clone(&handshake),
                fail_connect: false,
                fail_send: false,
            };
            let server = MockServer {
                inbound: inbound_tx,
                sent: sent_rx,
                handshake,
            };
            (transport, server)
        }
    }

    impl MockServer {
        /// Deliver a text frame
        pub fn push_text(&self, text: impl Into<String>) {
            let _ = self.inbound.send(Ok(Inbound::Text(text.into())));
        }

        /// Deliver a close frame
        pub fn push_close(&self, code: u16, reason: impl Into<String>) {
            let _ = self.inbound.send(Ok(Inbound::Closed {
                code,
                reason: reason.into(),
            }));
        }

        /// Fail the next receive
        pub fn push_error(&self, error: TransportError) {
            let _ = self.inbound.send(Err(error));
        }

        /// Next message the client sent, waiting for it if necessary
        pub async fn next_sent(&mut self) -> Option<String> {
            self.sent.recv().await
        }

        /// Every message sent so far that has not been taken yet
        pub fn take_sent(&mut self) -> Vec<String> {
            let mut out = Vec::new();
            while let Ok(msg) = self.sent.try_recv() {
                out.push(msg);
            }
            out
        }

        /// URL and headers of the last successful connect
        pub fn handshake(&self) -> Option<Handshake> {
            self.handshake.lock().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn connect(
            &mut self,
            url: &str,
            headers: &[(&'static str, String)],
        ) -> Result<(), TransportError> {
            if self.fail_connect {
                return Err(TransportError::ConnectionFailed("mock connection failure".into()));
            }
            *self.handshake.lock() = Some(Handshake {
                url: url.to_string(),
                headers: headers
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.clone()))
                    .collect(),
            });
            self.connected = true;
            Ok(())
        }

        async fn send(&mut self, message: &str) -> Result<(), TransportError> {
            if !self.connected {
                return Err(TransportError::NotConnected);
            }
            if self.fail_send {
                return Err(TransportError::SendFailed("mock send failure".into()));
            }
            let _ = self.sent.send(message.to_string());
            Ok(())
        }

        async fn recv(&mut self) -> Result<Inbound, TransportError> {
            if !self.connected {
                return Err(TransportError::NotConnected);
            }
            match self.inbound.recv().await {
                Some(Ok(Inbound::Closed { code, reason })) => {
                    self.connected = false;
                    Ok(Inbound::Closed { code, reason })
                }
                Some(other) => other,
                None => {
                    self.connected = false;
                    Ok(Inbound::Closed {
                        code: super::ABNORMAL_CLOSE,
                        reason: "stream ended".to_string(),
                    })
                }
            }
        }

        async fn close(&mut self) -> Result<(), TransportError> {
            self.connected = false;
            Ok(())
        }

        fn is_connected(&self) -> bool {
            self.connected
        }
    }

}
