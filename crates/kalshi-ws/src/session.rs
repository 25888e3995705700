//! Streaming session state machine
//!
//! `Disconnected → Handshaking → Open → Closing → Closed`, with `Errored`
//! reachable from `Handshaking` and `Open`. Neither terminal state restarts.
//!
//! One I/O task owns the transport. Handles never touch the socket: they
//! allocate an id and queue the frame while holding the session lock, so
//! ids reach the wire in increasing order.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, trace, warn};

use kalshi_auth::AuthContext;
use kalshi_types::{
    Channel, ControlMessage, Environment, HttpMethod, KalshiError, KalshiResult, StreamMessage,
    StreamMessageKind, WS_PATH,
};

use crate::handler::StreamHandler;
use crate::registry::{ControlRecord, Subscription, SubscriptionRegistry, SubscriptionState};
use crate::transport::{Inbound, Transport, TransportError, WsTransport, ABNORMAL_CLOSE};

/// Default time allowed for the signed upgrade
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Close code reported for a client-initiated close
pub const NORMAL_CLOSE: u16 = 1000;

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not connected yet
    Disconnected,
    /// Signed upgrade in progress
    Handshaking,
    /// Connected; control messages allowed
    Open,
    /// Client close requested
    Closing,
    /// Closed by either side
    Closed,
    /// Transport failure
    Errored,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Handshaking => "handshaking",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
            Self::Errored => "errored",
        }
    }

    /// True once the session can no longer be used
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a stream session
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Environment to connect to; the auth context's environment when unset
    pub environment: Option<Environment>,
    /// Full URL override (e.g. a local test server)
    pub url: Option<String>,
    /// Time allowed for the upgrade
    pub connect_timeout: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            environment: None,
            url: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl StreamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Connect to `url` instead of the environment's endpoint
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

enum Outbound {
    Frame(String),
    Close,
}

struct Inner {
    state: SessionState,
    registry: SubscriptionRegistry,
    outbound: Option<mpsc::UnboundedSender<Outbound>>,
}

impl Inner {
    fn expect_state(&self, expected: SessionState) -> KalshiResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(KalshiError::InvalidState {
                expected: expected.to_string(),
                actual: self.state.to_string(),
            })
        }
    }
}

fn writer_stopped() -> KalshiError {
    KalshiError::StreamClosed {
        code: ABNORMAL_CLOSE,
        reason: "stream writer has stopped".to_string(),
    }
}

/// One persistent, authenticated streaming connection
///
/// Dropping an open session closes the connection, even while
/// [`StreamHandle`]s are still around.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use kalshi_auth::{AuthContext, Credentials};
/// use kalshi_types::{Channel, Environment};
/// use kalshi_ws::{ChannelHandler, StreamConfig, StreamSession};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let creds = Credentials::from_env()?;
///     let auth = AuthContext::new(&creds, Environment::Sandbox);
///
///     let (handler, mut events) = ChannelHandler::new();
///     let mut session = StreamSession::new(auth, StreamConfig::new());
///     let handle = session.open(Arc::new(handler)).await?;
///     handle.subscribe([Channel::ticker()])?;
///
///     while let Some(event) = events.recv().await {
///         println!("{:?}", event);
///     }
///     Ok(())
/// }
/// ```
pub struct StreamSession {
    auth: AuthContext,
    config: StreamConfig,
    inner: Arc<Mutex<Inner>>,
    task: Option<JoinHandle<()>>,
}

impl StreamSession {
    pub fn new(auth: AuthContext, config: StreamConfig) -> Self {
        Self {
            auth,
            config,
            inner: Arc::new(Mutex::new(Inner {
                state: SessionState::Disconnected,
                registry: SubscriptionRegistry::new(),
                outbound: None,
            })),
            task: None,
        }
    }

    /// URL the session connects to
    pub fn url(&self) -> String {
        match &self.config.url {
            Some(url) => url.clone(),
            None => self
                .config
                .environment
                .unwrap_or_else(|| self.auth.environment())
                .ws_url(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// A handle onto this session
    ///
    /// Handles can be taken before connecting; control calls fail with
    /// [`KalshiError::InvalidState`] until the session is open.
    pub fn handle(&self) -> StreamHandle {
        StreamHandle {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Connect over a real WebSocket
    pub async fn open(&mut self, handler: Arc<dyn StreamHandler>) -> KalshiResult<StreamHandle> {
        self.connect(WsTransport::new(), handler).await
    }

    /// Perform the signed handshake over `transport` and start the I/O task
    ///
    /// `handler.on_open` runs once the upgrade succeeded and before any
    /// frame is read. A failed handshake reports to `handler.on_error`,
    /// leaves the session `Errored` and returns the error.
    #[instrument(skip_all, fields(url = %self.url()))]
    pub async fn connect<T>(
        &mut self,
        mut transport: T,
        handler: Arc<dyn StreamHandler>,
    ) -> KalshiResult<StreamHandle>
    where
        T: Transport + 'static,
    {
        {
            let mut inner = self.inner.lock();
            inner.expect_state(SessionState::Disconnected)?;
            inner.state = SessionState::Handshaking;
        }

        let url = self.url();
        info!("Opening stream session");

        if let Err(e) = self.handshake(&mut transport, &url).await {
            error!(error = %e, "Stream handshake failed");
            self.inner.lock().state = SessionState::Errored;
            handler.on_error(&e).await;
            return Err(e);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        {
            let mut inner = self.inner.lock();
            inner.state = SessionState::Open;
            inner.outbound = Some(tx);
        }
        info!("Stream session open");

        let handle = self.handle();
        handler.on_open(handle.clone()).await;

        self.task = Some(tokio::spawn(run_io(
            transport,
            rx,
            Arc::clone(&self.inner),
            handler,
        )));
        Ok(handle)
    }

    async fn handshake<T: Transport>(&self, transport: &mut T, url: &str) -> KalshiResult<()> {
        let signed = self.auth.sign_request(HttpMethod::Get, WS_PATH)?;
        let headers = signed.headers();

        tokio::time::timeout(self.config.connect_timeout, transport.connect(url, &headers))
            .await
            .map_err(|_| TransportError::Timeout(self.config.connect_timeout))??;
        Ok(())
    }

    /// Close the session and wait for the I/O task to finish
    pub async fn close(&mut self) -> KalshiResult<()> {
        self.handle().close()?;
        self.join().await
    }

    /// Wait until the session has closed or failed
    pub async fn join(&mut self) -> KalshiResult<()> {
        if let Some(task) = self.task.take() {
            task.await
                .map_err(|e| KalshiError::Transport(format!("stream task failed: {e}")))?;
        }
        Ok(())
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        if self.state() == SessionState::Open {
            debug!("Stream session dropped while open");
            let _ = self.handle().close();
        }
    }
}

impl fmt::Debug for StreamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSession")
            .field("url", &self.url())
            .field("state", &self.state())
            .field("connect_timeout", &self.config.connect_timeout)
            .finish_non_exhaustive()
    }
}

/// Cloneable front of a [`StreamSession`]
///
/// Subscribe and unsubscribe are fire-and-forget: they return the message
/// id as soon as the frame is queued. Acknowledgments arrive through the
/// handler and update [`StreamHandle::subscriptions`].
#[derive(Clone)]
pub struct StreamHandle {
    inner: Arc<Mutex<Inner>>,
}

impl StreamHandle {
    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// Subscribe to `channels` in one message
    pub fn subscribe(&self, channels: impl IntoIterator<Item = Channel>) -> KalshiResult<u64> {
        let channels: Vec<Channel> = channels.into_iter().collect();
        if channels.is_empty() {
            return Err(KalshiError::validation("subscribe needs at least one channel"));
        }

        self.issue(move |registry| {
            let id = registry.add(channels.clone());
            Ok((id, ControlMessage::subscribe(id, &channels).to_json()?))
        })
    }

    /// Ticker updates for `tickers`, or for every market when empty
    pub fn subscribe_tickers(&self, tickers: &[&str]) -> KalshiResult<u64> {
        if tickers.is_empty() {
            self.subscribe([Channel::ticker()])
        } else {
            self.subscribe(tickers.iter().map(|t| Channel::ticker_for(*t)))
        }
    }

    /// Orderbook snapshots and deltas for `tickers`
    pub fn subscribe_orderbook(&self, tickers: &[&str]) -> KalshiResult<u64> {
        self.subscribe(tickers.iter().map(|t| Channel::orderbook(*t)))
    }

    /// Public trades for `tickers`, or for every market when empty
    pub fn subscribe_trades(&self, tickers: &[&str]) -> KalshiResult<u64> {
        if tickers.is_empty() {
            self.subscribe([Channel::trades(None)])
        } else {
            self.subscribe(tickers.iter().map(|t| Channel::trades(Some(*t))))
        }
    }

    pub fn subscribe_fills(&self) -> KalshiResult<u64> {
        self.subscribe([Channel::Fill])
    }

    /// Unsubscribe from `channels` in one message
    pub fn unsubscribe(&self, channels: impl IntoIterator<Item = Channel>) -> KalshiResult<u64> {
        let channels: Vec<Channel> = channels.into_iter().collect();
        if channels.is_empty() {
            return Err(KalshiError::validation("unsubscribe needs at least one channel"));
        }

        self.issue(move |registry| {
            let id = registry.remove(&channels);
            Ok((id, ControlMessage::unsubscribe(id, &channels).to_json()?))
        })
    }

    /// Send an arbitrary JSON object, stamped with the next message id
    ///
    /// Any `id` already present in `message` is overwritten.
    pub fn send_custom(&self, message: Value) -> KalshiResult<u64> {
        let Value::Object(mut body) = message else {
            return Err(KalshiError::validation(
                "custom stream message must be a JSON object",
            ));
        };

        self.issue(move |registry| {
            let id = registry.allocate_id();
            body.insert("id".to_string(), Value::from(id));
            Ok((id, Value::Object(body).to_string()))
        })
    }

    /// Request a graceful close
    ///
    /// Closing an already closing or closed session is a no-op.
    pub fn close(&self) -> KalshiResult<()> {
        let mut inner = self.inner.lock();
        match inner.state {
            SessionState::Open => {
                inner.state = SessionState::Closing;
                if let Some(outbound) = inner.outbound.take() {
                    let _ = outbound.send(Outbound::Close);
                }
                info!("Stream close requested");
                Ok(())
            }
            SessionState::Closing | SessionState::Closed => Ok(()),
            _ => inner.expect_state(SessionState::Open),
        }
    }

    /// Snapshot of the current subscriptions
    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.inner.lock().registry.subscriptions().cloned().collect()
    }

    /// Wire names of every requested or acknowledged channel
    pub fn channels(&self) -> BTreeSet<String> {
        self.inner.lock().registry.list()
    }

    /// Wire names of acknowledged channels
    pub fn active_channels(&self) -> BTreeSet<String> {
        self.inner.lock().registry.active()
    }

    pub fn channel_state(&self, channel: &Channel) -> SubscriptionState {
        self.inner.lock().registry.channel_state(channel)
    }

    /// The most recent control messages issued by this session, oldest first
    pub fn control_log(&self) -> Vec<ControlRecord> {
        self.inner.lock().registry.log().iter().cloned().collect()
    }

    /// Allocate an id and queue the resulting frame under one lock
    fn issue<F>(&self, build: F) -> KalshiResult<u64>
    where
        F: FnOnce(&mut SubscriptionRegistry) -> KalshiResult<(u64, String)>,
    {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        inner.expect_state(SessionState::Open)?;
        let Some(outbound) = inner.outbound.as_ref() else {
            return Err(writer_stopped());
        };

        let (id, frame) = build(&mut inner.registry)?;
        outbound
            .send(Outbound::Frame(frame))
            .map_err(|_| writer_stopped())?;
        debug!(id, "Queued control message");
        Ok(id)
    }
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("StreamHandle")
            .field("state", &inner.state)
            .field("subscriptions", &inner.registry.len())
            .finish()
    }
}

enum Exit {
    Closed { code: u16, reason: String },
    Failed(TransportError),
}

async fn run_io<T: Transport>(
    mut transport: T,
    mut commands: mpsc::UnboundedReceiver<Outbound>,
    inner: Arc<Mutex<Inner>>,
    handler: Arc<dyn StreamHandler>,
) {
    let exit = loop {
        tokio::select! {
            biased;

            command = commands.recv() => match command {
                Some(Outbound::Frame(frame)) => {
                    trace!(%frame, "Sending frame");
                    if let Err(e) = transport.send(&frame).await {
                        break Exit::Failed(e);
                    }
                }
                Some(Outbound::Close) | None => {
                    if let Err(e) = transport.close().await {
                        warn!(error = %e, "Close handshake failed");
                    }
                    break Exit::Closed {
                        code: NORMAL_CLOSE,
                        reason: "client closed".to_string(),
                    };
                }
            },

            inbound = transport.recv() => match inbound {
                Ok(Inbound::Text(text)) => dispatch(&inner, handler.as_ref(), &text).await,
                Ok(Inbound::Closed { code, reason }) => break Exit::Closed { code, reason },
                Err(e) => break Exit::Failed(e),
            },
        }
    };

    match exit {
        Exit::Closed { code, reason } => {
            {
                let mut inner = inner.lock();
                inner.state = SessionState::Closed;
                inner.outbound = None;
                inner.registry.clear();
            }
            info!(code, %reason, "Stream session closed");
            handler.on_close(code, &reason).await;
        }
        Exit::Failed(e) => {
            error!(error = %e, "Stream transport failed");
            {
                let mut inner = inner.lock();
                inner.state = SessionState::Errored;
                inner.outbound = None;
                inner.registry.clear();
            }
            handler.on_error(&KalshiError::from(e)).await;
        }
    }
}

async fn dispatch(inner: &Mutex<Inner>, handler: &dyn StreamHandler, text: &str) {
    let message = match StreamMessage::parse(text) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "Dropping unparseable frame");
            return;
        }
    };

    if let Some(id) = message.id {
        let mut inner = inner.lock();
        match &message.kind {
            StreamMessageKind::Subscribed => {
                if !inner.registry.acknowledge(id, message.subscription_id()) {
                    debug!(id, "Acknowledgment for unknown subscription");
                }
            }
            StreamMessageKind::Error { code, msg } => match inner.registry.reject(id) {
                Some(rejected) => {
                    warn!(id, ?code, %msg, channels = ?rejected.channels, "Subscription rejected")
                }
                None => warn!(id, ?code, %msg, "Control message failed"),
            },
            _ => {}
        }
    }

    handler.on_message(message).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{ChannelHandler, StreamEvent};
    use crate::transport::{MockServer, MockTransport};
    use async_trait::async_trait;
    use kalshi_auth::{AuthError, AuthResult, Signer};
    use tokio::sync::mpsc::UnboundedReceiver;

    /// Echoes the message back as its own "signature"
    struct EchoSigner;

    impl Signer for EchoSigner {
        fn sign(&self, message: &[u8]) -> AuthResult<Vec<u8>> {
            Ok(message.to_vec())
        }
    }

    struct BrokenSigner;

    impl Signer for BrokenSigner {
        fn sign(&self, _message: &[u8]) -> AuthResult<Vec<u8>> {
            Err(AuthError::Signing("key store offline".into()))
        }
    }

    /// Never finishes the upgrade
    struct StalledTransport;

    #[async_trait]
    impl Transport for StalledTransport {
        async fn connect(
            &mut self,
            _url: &str,
            _headers: &[(&'static str, String)],
        ) -> Result<(), TransportError> {
            std::future::pending().await
        }

        async fn send(&mut self, _message: &str) -> Result<(), TransportError> {
            Err(TransportError::NotConnected)
        }

        async fn recv(&mut self) -> Result<Inbound, TransportError> {
            Err(TransportError::NotConnected)
        }

        async fn close(&mut self) -> Result<(), TransportError> {
            Ok(())
        }

        fn is_connected(&self) -> bool {
            false
        }
    }

    fn session() -> StreamSession {
        let auth = AuthContext::with_signer("key-1", Environment::Sandbox, Arc::new(EchoSigner));
        StreamSession::new(auth, StreamConfig::new())
    }

    async fn open() -> (StreamSession, StreamHandle, MockServer, UnboundedReceiver<StreamEvent>) {
        let (transport, server) = MockTransport::pair();
        let (handler, events) = ChannelHandler::new();
        let mut session = session();
        let handle = session.connect(transport, Arc::new(handler)).await.unwrap();
        (session, handle, server, events)
    }

    async fn next_event(events: &mut UnboundedReceiver<StreamEvent>) -> StreamEvent {
        tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed")
    }

    async fn next_frame(server: &mut MockServer) -> Value {
        let text = tokio::time::timeout(Duration::from_secs(5), server.next_sent())
            .await
            .expect("timed out waiting for frame")
            .expect("transport dropped");
        serde_json::from_str(&text).unwrap()
    }

    #[tokio::test]
    async fn test_three_subscribes_get_ids_one_two_three() {
        let (_session, handle, mut server, mut events) = open().await;
        assert!(matches!(next_event(&mut events).await, StreamEvent::Opened));

        assert_eq!(handle.subscribe_tickers(&[]).unwrap(), 1);
        assert_eq!(handle.subscribe_orderbook(&["A"]).unwrap(), 2);
        assert_eq!(handle.subscribe_trades(&["A"]).unwrap(), 3);

        let frames = [
            next_frame(&mut server).await,
            next_frame(&mut server).await,
            next_frame(&mut server).await,
        ];
        assert_eq!(
            frames[0],
            serde_json::json!({"id": 1, "cmd": "subscribe", "params": {"channels": ["ticker"]}})
        );
        assert_eq!(frames[1]["id"], 2);
        assert_eq!(frames[1]["params"]["channels"][0], "orderbook_delta:A");
        assert_eq!(frames[2]["id"], 3);
        assert_eq!(frames[2]["params"]["channels"][0], "trade:A");
    }

    #[tokio::test]
    async fn test_unsubscribe_and_resubscribe_never_reuse_ids() {
        let (_session, handle, mut server, _events) = open().await;

        let sub = handle.subscribe([Channel::orderbook("A")]).unwrap();
        let unsub = handle.unsubscribe([Channel::orderbook("A")]).unwrap();
        let resub = handle.subscribe([Channel::orderbook("A")]).unwrap();
        assert_eq!((sub, unsub, resub), (1, 2, 3));

        next_frame(&mut server).await;
        let unsub_frame = next_frame(&mut server).await;
        assert_eq!(unsub_frame["cmd"], "unsubscribe");
        assert_eq!(unsub_frame["id"], 2);
        assert_eq!(handle.control_log().len(), 3);
    }

    #[tokio::test]
    async fn test_handshake_is_signed() {
        let (_session, _handle, server, _events) = open().await;
        let handshake = server.handshake().unwrap();

        assert_eq!(handshake.url, "wss://demo-api.kalshi.co/trade-api/ws/v2");
        let header = |name: &str| {
            handshake
                .headers
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(header("KALSHI-ACCESS-KEY"), "key-1");

        let timestamp = header("KALSHI-ACCESS-TIMESTAMP");
        let expected = kalshi_auth::canonical_message(
            timestamp.parse().unwrap(),
            HttpMethod::Get,
            WS_PATH,
        );
        let signature = header("KALSHI-ACCESS-SIGNATURE");
        assert_eq!(
            signature,
            EchoSigner.sign_base64(expected.as_bytes()).unwrap()
        );
    }

    #[tokio::test]
    async fn test_ack_activates_and_error_rejects() {
        let (_session, handle, server, mut events) = open().await;
        next_event(&mut events).await;

        handle.subscribe([Channel::ticker()]).unwrap();
        handle.subscribe([Channel::Custom("bogus".into())]).unwrap();
        assert_eq!(handle.channel_state(&Channel::ticker()), SubscriptionState::Requested);

        server.push_text(r#"{"id":1,"type":"subscribed","msg":{"channel":"ticker","sid":11}}"#);
        server.push_text(r#"{"id":2,"type":"error","msg":{"code":8,"msg":"Unknown channel name"}}"#);
        next_event(&mut events).await;
        next_event(&mut events).await;

        let subs = handle.subscriptions();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].state, SubscriptionState::Active);
        assert_eq!(subs[0].sid, Some(11));
        assert_eq!(handle.active_channels(), BTreeSet::from(["ticker".to_string()]));
    }

    #[tokio::test]
    async fn test_close_unblocks_pending_read() {
        let (mut session, handle, _server, mut events) = open().await;
        next_event(&mut events).await;
        handle.subscribe([Channel::ticker()]).unwrap();

        // Nothing is ever pushed, so the I/O task is parked in recv()
        tokio::time::timeout(Duration::from_secs(5), session.close())
            .await
            .expect("close did not complete")
            .unwrap();

        match next_event(&mut events).await {
            StreamEvent::Closed { code, .. } => assert_eq!(code, NORMAL_CLOSE),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(handle.state(), SessionState::Closed);
        assert!(handle.channels().is_empty());
        assert!(matches!(
            handle.subscribe([Channel::ticker()]),
            Err(KalshiError::InvalidState { .. })
        ));
        assert!(handle.close().is_ok());
    }

    #[tokio::test]
    async fn test_server_close_reports_its_code() {
        let (mut session, handle, server, mut events) = open().await;
        next_event(&mut events).await;

        server.push_close(4001, "session expired");
        session.join().await.unwrap();

        match next_event(&mut events).await {
            StreamEvent::Closed { code, reason } => {
                assert_eq!(code, 4001);
                assert_eq!(reason, "session expired");
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(handle.state(), SessionState::Closed);
    }

    #[tokio::test]
    async fn test_transport_error_goes_to_on_error() {
        let (mut session, handle, server, mut events) = open().await;
        next_event(&mut events).await;

        server.push_error(TransportError::ReceiveFailed("connection reset".into()));
        session.join().await.unwrap();

        match next_event(&mut events).await {
            StreamEvent::Error(KalshiError::Transport(msg)) => {
                assert!(msg.contains("connection reset"))
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(handle.state(), SessionState::Errored);
    }

    #[tokio::test]
    async fn test_dropping_session_releases_transport() {
        let (session, handle, mut server, mut events) = open().await;
        assert!(matches!(next_event(&mut events).await, StreamEvent::Opened));
        handle.subscribe([Channel::ticker()]).unwrap();
        let observer = handle.clone();

        drop(handle);
        drop(session);

        // The subscribe frame, then the I/O task ends and drops the transport
        assert_eq!(next_frame(&mut server).await["id"], 1);
        let rest = tokio::time::timeout(Duration::from_secs(5), server.next_sent())
            .await
            .expect("transport was not released");
        assert!(rest.is_none());

        match next_event(&mut events).await {
            StreamEvent::Closed { code, .. } => assert_eq!(code, NORMAL_CLOSE),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(observer.state(), SessionState::Closed);
    }

    #[tokio::test]
    async fn test_send_failure_is_errored() {
        let (mut transport, mut server) = MockTransport::pair();
        transport.fail_send = true;
        let (handler, mut events) = ChannelHandler::new();
        let mut session = session();
        let handle = session.connect(transport, Arc::new(handler)).await.unwrap();
        assert!(matches!(next_event(&mut events).await, StreamEvent::Opened));

        assert_eq!(handle.subscribe([Channel::ticker()]).unwrap(), 1);
        session.join().await.unwrap();

        match next_event(&mut events).await {
            StreamEvent::Error(KalshiError::Transport(msg)) => {
                assert!(msg.contains("mock send failure"))
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(handle.state(), SessionState::Errored);
        assert!(handle.channels().is_empty());
        assert!(server.take_sent().is_empty());
        assert!(matches!(
            handle.subscribe([Channel::ticker()]),
            Err(KalshiError::InvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn test_control_calls_before_connect_are_rejected() {
        let session = session();
        let handle = session.handle();

        let err = handle.subscribe([Channel::ticker()]).unwrap_err();
        assert_eq!(
            err,
            KalshiError::InvalidState {
                expected: "open".into(),
                actual: "disconnected".into()
            }
        );
        assert!(handle.close().is_err());
        assert!(handle.control_log().is_empty());
    }

    #[tokio::test]
    async fn test_failed_handshake_is_errored() {
        let (mut transport, _server) = MockTransport::pair();
        transport.fail_connect = true;
        let (handler, mut events) = ChannelHandler::new();
        let mut session = session();

        let err = session.connect(transport, Arc::new(handler)).await.unwrap_err();
        assert!(matches!(err, KalshiError::Transport(_)));
        assert_eq!(session.state(), SessionState::Errored);
        assert!(matches!(next_event(&mut events).await, StreamEvent::Error(_)));

        let (transport, _server) = MockTransport::pair();
        let (handler, _events) = ChannelHandler::new();
        assert!(matches!(
            session.connect(transport, Arc::new(handler)).await,
            Err(KalshiError::InvalidState { .. })
        ));
    }

    #[tokio::test]
    async fn test_signing_failure_aborts_handshake() {
        let auth = AuthContext::with_signer("key-1", Environment::Sandbox, Arc::new(BrokenSigner));
        let mut session = StreamSession::new(auth, StreamConfig::new());
        let (transport, server) = MockTransport::pair();
        let (handler, _events) = ChannelHandler::new();

        let err = session.connect(transport, Arc::new(handler)).await.unwrap_err();
        assert!(matches!(err, KalshiError::Signing(_)));
        assert!(server.handshake().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_timeout() {
        let auth = AuthContext::with_signer("key-1", Environment::Sandbox, Arc::new(EchoSigner));
        let config = StreamConfig::new().with_connect_timeout(Duration::from_secs(3));
        let mut session = StreamSession::new(auth, config);
        let (handler, _events) = ChannelHandler::new();

        let err = session
            .connect(StalledTransport, Arc::new(handler))
            .await
            .unwrap_err();
        assert_eq!(err, KalshiError::Transport("connection timeout after 3s".into()));
        assert_eq!(session.state(), SessionState::Errored);
    }

    #[tokio::test]
    async fn test_default_subscriptions_go_out_first() {
        let (transport, mut server) = MockTransport::pair();
        let (handler, _events) = ChannelHandler::new();
        let handler = handler.with_subscriptions(vec![Channel::Fill]);
        let mut session = session();

        let handle = session.connect(transport, Arc::new(handler)).await.unwrap();
        assert_eq!(handle.subscribe([Channel::ticker()]).unwrap(), 2);

        let first = next_frame(&mut server).await;
        assert_eq!(first["id"], 1);
        assert_eq!(first["params"]["channels"][0], "fill");
    }

    #[tokio::test]
    async fn test_custom_message_takes_next_id() {
        let (_session, handle, mut server, _events) = open().await;
        handle.subscribe([Channel::ticker()]).unwrap();

        let id = handle
            .send_custom(serde_json::json!({"cmd": "list_subscriptions", "id": 99}))
            .unwrap();
        assert_eq!(id, 2);

        next_frame(&mut server).await;
        let custom = next_frame(&mut server).await;
        assert_eq!(custom, serde_json::json!({"cmd": "list_subscriptions", "id": 2}));

        assert!(matches!(
            handle.send_custom(serde_json::json!([1, 2])),
            Err(KalshiError::Validation(_))
        ));
        assert_eq!(handle.control_log().len(), 2);
    }

    #[tokio::test]
    async fn test_garbage_frame_does_not_end_session() {
        let (_session, handle, server, mut events) = open().await;
        next_event(&mut events).await;

        server.push_text("not json");
        server.push_text(r#"{"type":"ticker","sid":1,"msg":{"market_ticker":"A","price":41}}"#);

        match next_event(&mut events).await {
            StreamEvent::Message(msg) => {
                assert_eq!(msg.kind, StreamMessageKind::Ticker);
                assert_eq!(msg.market_ticker(), Some("A"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(handle.state(), SessionState::Open);
    }
}
