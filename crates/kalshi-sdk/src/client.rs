//! High-level Kalshi client

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, instrument};

use kalshi_auth::AuthContext;
use kalshi_rest::KalshiRestClient;
use kalshi_types::{Channel, Environment, KalshiResult};
use kalshi_ws::{
    ChannelHandler, StreamConfig, StreamEvent, StreamHandle, StreamHandler, StreamSession,
    Transport,
};

use crate::builder::KalshiClientBuilder;

/// High-level client for the Kalshi API
///
/// Owns one REST client and opens stream sessions on demand. Both sign with
/// the same auth context, so one instance built at startup can be handed to
/// every component that needs exchange access.
///
/// # Example
///
/// ```no_run
/// use kalshi_sdk::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = KalshiClient::builder()
///         .with_credentials_from_env()?
///         .build()?;
///
///     let balance = client.rest().get_balance().await?;
///     println!("balance: {} cents", balance.balance);
///
///     let (_session, _handle, mut events) = client
///         .stream_events(vec![Channel::ticker()])
///         .await?;
///     while let Some(event) = events.recv().await {
///         println!("{:?}", event);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct KalshiClient {
    rest: KalshiRestClient,
    auth: AuthContext,
    stream_config: StreamConfig,
}

impl KalshiClient {
    /// Create a new client builder
    pub fn builder() -> KalshiClientBuilder {
        KalshiClientBuilder::new()
    }

    pub(crate) fn from_parts(
        rest: KalshiRestClient,
        auth: AuthContext,
        stream_config: StreamConfig,
    ) -> Self {
        info!(
            environment = %auth.environment(),
            base_url = %rest.transport().base_url(),
            "Kalshi client created"
        );
        Self {
            rest,
            auth,
            stream_config,
        }
    }

    /// REST endpoints
    pub fn rest(&self) -> &KalshiRestClient {
        &self.rest
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn environment(&self) -> Environment {
        self.auth.environment()
    }

    /// A new, not yet connected stream session
    pub fn stream_session(&self) -> StreamSession {
        StreamSession::new(self.auth.clone(), self.stream_config.clone())
    }

    /// Open a stream session over a real WebSocket
    #[instrument(skip_all)]
    pub async fn connect_stream(
        &self,
        handler: Arc<dyn StreamHandler>,
    ) -> KalshiResult<(StreamSession, StreamHandle)> {
        let mut session = self.stream_session();
        let handle = session.open(handler).await?;
        Ok((session, handle))
    }

    /// Open a stream session over a caller-supplied transport
    pub async fn connect_stream_with<T>(
        &self,
        transport: T,
        handler: Arc<dyn StreamHandler>,
    ) -> KalshiResult<(StreamSession, StreamHandle)>
    where
        T: Transport + 'static,
    {
        let mut session = self.stream_session();
        let handle = session.connect(transport, handler).await?;
        Ok((session, handle))
    }

    /// Open a stream session subscribed to `channels`, publishing events on
    /// a channel
    pub async fn stream_events(
        &self,
        channels: Vec<Channel>,
    ) -> KalshiResult<(
        StreamSession,
        StreamHandle,
        mpsc::UnboundedReceiver<StreamEvent>,
    )> {
        let (handler, events) = ChannelHandler::new();
        let handler = Arc::new(handler.with_subscriptions(channels));
        let (session, handle) = self.connect_stream(handler).await?;
        Ok((session, handle, events))
    }
}
