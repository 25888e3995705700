//! Main REST client implementation

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use kalshi_auth::{AuthContext, Credentials};
use kalshi_types::{
    Balance, CreateOrderRequest, Environment, Event, Fill, GetEventsParams, GetFillsParams,
    GetMarketsParams, GetOrdersParams, GetSettlementsParams, GetTradesParams, Market, Order, Page,
    PageCap, Settlement, Trade,
};

use crate::endpoints::{
    CommunicationsEndpoints, EventEndpoints, ExchangeEndpoints, LiveDataEndpoints,
    MarketEndpoints, OrderEndpoints, OrderGroupEndpoints, PortfolioEndpoints,
};
use crate::error::RestResult;
use crate::rate_limiter::{RateLimiter, DEFAULT_MIN_INTERVAL};
use crate::transport::RestTransport;

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Kalshi REST API client
///
/// All calls share one [`RateLimiter`], so clones of a client are throttled
/// together.
///
/// # Example
///
/// ```no_run
/// use kalshi_auth::Credentials;
/// use kalshi_rest::{ClientConfig, KalshiRestClient};
/// use kalshi_types::{Environment, GetMarketsParams, MarketStatus};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let creds = Credentials::from_env()?;
///     let config = ClientConfig::new().with_environment(Environment::Production);
///     let client = KalshiRestClient::new(&creds, config)?;
///
///     let params = GetMarketsParams::builder()
///         .series_ticker("KXHIGHNY")
///         .status(MarketStatus::Settled)
///         .limit(500)
///         .build();
///     let page = client.get_markets(&params).await?;
///     println!("{} settled markets", page.items.len());
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct KalshiRestClient {
    transport: RestTransport,
}

impl KalshiRestClient {
    /// Create a client signing with `credentials` against `config.environment`
    pub fn new(credentials: &Credentials, config: ClientConfig) -> RestResult<Self> {
        let auth = AuthContext::new(credentials, config.environment);
        Self::with_auth(auth, config)
    }

    /// Create a client around an existing auth context
    ///
    /// The base URL comes from `config.base_url` when set, otherwise from the
    /// auth context's environment.
    pub fn with_auth(auth: AuthContext, config: ClientConfig) -> RestResult<Self> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| auth.environment().rest_base_url().to_string());
        let limiter = Arc::new(RateLimiter::new(config.min_interval));
        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);

        let transport = RestTransport::new(
            base_url,
            auth,
            limiter,
            Duration::from_secs(config.timeout_secs),
            user_agent,
        )?;

        info!(base_url = %transport.base_url(), "Created Kalshi REST client");
        Ok(Self { transport })
    }

    pub fn transport(&self) -> &RestTransport {
        &self.transport
    }

    pub fn environment(&self) -> Environment {
        self.transport.auth().environment()
    }

    // ========================================================================
    // Endpoint groups
    // ========================================================================

    pub fn exchange(&self) -> ExchangeEndpoints<'_> {
        ExchangeEndpoints::new(&self.transport)
    }

    pub fn portfolio(&self) -> PortfolioEndpoints<'_> {
        PortfolioEndpoints::new(&self.transport)
    }

    pub fn orders(&self) -> OrderEndpoints<'_> {
        OrderEndpoints::new(&self.transport)
    }

    pub fn order_groups(&self) -> OrderGroupEndpoints<'_> {
        OrderGroupEndpoints::new(&self.transport)
    }

    pub fn markets(&self) -> MarketEndpoints<'_> {
        MarketEndpoints::new(&self.transport)
    }

    pub fn events(&self) -> EventEndpoints<'_> {
        EventEndpoints::new(&self.transport)
    }

    pub fn communications(&self) -> CommunicationsEndpoints<'_> {
        CommunicationsEndpoints::new(&self.transport)
    }

    pub fn live_data(&self) -> LiveDataEndpoints<'_> {
        LiveDataEndpoints::new(&self.transport)
    }

    // ========================================================================
    // Shortcuts
    // ========================================================================

    /// One page of markets
    pub async fn get_markets(&self, params: &GetMarketsParams) -> RestResult<Page<Market>> {
        self.markets().get_markets(params).await
    }

    pub async fn get_market(&self, ticker: &str) -> RestResult<Market> {
        self.markets().get_market(ticker).await
    }

    pub async fn get_balance(&self) -> RestResult<Balance> {
        self.portfolio().get_balance().await
    }

    /// Submit an order (validated before sending)
    pub async fn create_order(&self, order: &CreateOrderRequest) -> RestResult<Order> {
        self.orders().create_order(order).await
    }

    pub async fn cancel_order(&self, order_id: &str) -> RestResult<Order> {
        Ok(self.orders().cancel_order(order_id).await?.order)
    }

    // ========================================================================
    // Collect-all helpers
    // ========================================================================

    /// Every market matching `params`, across all pages
    pub async fn get_all_markets(&self, params: GetMarketsParams, cap: PageCap) -> RestResult<Vec<Market>> {
        self.markets().paginate_markets(params, cap).collect().await
    }

    pub async fn get_all_events(&self, params: GetEventsParams, cap: PageCap) -> RestResult<Vec<Event>> {
        self.events().paginate_events(params, cap).collect().await
    }

    pub async fn get_all_fills(&self, params: GetFillsParams, cap: PageCap) -> RestResult<Vec<Fill>> {
        self.portfolio().paginate_fills(params, cap).collect().await
    }

    pub async fn get_all_orders(&self, params: GetOrdersParams, cap: PageCap) -> RestResult<Vec<Order>> {
        self.orders().paginate_orders(params, cap).collect().await
    }

    pub async fn get_all_settlements(
        &self,
        params: GetSettlementsParams,
        cap: PageCap,
    ) -> RestResult<Vec<Settlement>> {
        self.portfolio().paginate_settlements(params, cap).collect().await
    }

    pub async fn get_all_trades(&self, params: GetTradesParams, cap: PageCap) -> RestResult<Vec<Trade>> {
        self.markets().paginate_trades(params, cap).collect().await
    }
}

impl std::fmt::Debug for KalshiRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KalshiRestClient")
            .field("transport", &self.transport)
            .finish()
    }
}

const DEFAULT_USER_AGENT: &str = concat!("kalshi-rest/", env!("CARGO_PKG_VERSION"));

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Environment used to sign and pick the base URL
    pub environment: Environment,
    /// Base URL override (e.g. a local mock server)
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// Minimum spacing between consecutive requests
    pub min_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            min_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Send requests to `base_url` instead of the environment's host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PKCS8: &str = include_str!("../../kalshi-auth/tests/fixtures/test_key_pkcs8.pem");

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(60)
            .with_user_agent("test-agent")
            .with_min_interval(Duration::from_millis(250));

        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.user_agent, Some("test-agent".to_string()));
        assert_eq!(config.min_interval, Duration::from_millis(250));
        assert_eq!(config.environment, Environment::Sandbox);
    }

    #[test]
    fn test_base_url_follows_environment() {
        let creds = Credentials::from_pem_str("key-1", PKCS8).unwrap();

        let client = KalshiRestClient::new(
            &creds,
            ClientConfig::new().with_environment(Environment::Production),
        )
        .unwrap();
        assert_eq!(client.transport().base_url(), "https://api.elections.kalshi.com");
        assert_eq!(client.environment(), Environment::Production);

        let client =
            KalshiRestClient::new(&creds, ClientConfig::new().with_base_url("http://127.0.0.1:9/"))
                .unwrap();
        assert_eq!(client.transport().base_url(), "http://127.0.0.1:9");
    }

    #[test]
    fn test_clones_share_the_limiter() {
        let creds = Credentials::from_pem_str("key-1", PKCS8).unwrap();
        let client = KalshiRestClient::new(&creds, ClientConfig::default()).unwrap();
        let clone = client.clone();
        assert!(Arc::ptr_eq(
            client.transport().rate_limiter(),
            clone.transport().rate_limiter()
        ));
    }
}
