//! Client Builder Pattern
//!
//! Collects environment, credentials and both transport configurations,
//! validates them, and produces one [`KalshiClient`] whose REST client and
//! stream sessions share a single auth context.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use kalshi_sdk::builder::KalshiClientBuilder;
//! use kalshi_sdk::Environment;
//!
//! let client = KalshiClientBuilder::new()
//!     .with_environment(Environment::Production)
//!     .with_credentials_from_env()?
//!     .with_timeout(20)
//!     .with_min_interval(Duration::from_millis(150))
//!     .build()?;
//! # Ok::<(), kalshi_sdk::builder::ConfigError>(())
//! ```

use std::time::Duration;

use kalshi_auth::{AuthContext, AuthError, Credentials};
use kalshi_rest::{ClientConfig, KalshiRestClient};
use kalshi_types::{Environment, KalshiError};
use kalshi_ws::StreamConfig;

use crate::client::KalshiClient;

/// Configuration validation error
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Neither credentials nor an auth context were supplied
    #[error("credentials are required (set them explicitly or load them from the environment)")]
    MissingCredentials,

    /// Credentials could not be loaded
    #[error("failed to load credentials: {0}")]
    Credentials(#[from] AuthError),

    /// Request timeout of zero
    #[error("request timeout must be at least 1 second")]
    TimeoutTooShort,

    /// Connect timeout of zero
    #[error("stream connect timeout must be non-zero")]
    ConnectTimeoutTooShort,

    /// The REST client could not be created
    #[error("failed to create REST client: {0}")]
    Client(String),
}

impl From<ConfigError> for KalshiError {
    fn from(err: ConfigError) -> Self {
        KalshiError::Configuration(err.to_string())
    }
}

/// Builder for configuring a Kalshi client
#[derive(Debug, Clone, Default)]
pub struct KalshiClientBuilder {
    /// Target environment (sandbox unless set)
    pub environment: Environment,

    /// API key id and private key
    pub credentials: Option<Credentials>,

    /// Pre-built auth context; takes precedence over `credentials`
    pub auth: Option<AuthContext>,

    /// REST settings
    pub rest: ClientConfig,

    /// Streaming settings
    pub stream: StreamConfig,
}

impl KalshiClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the environment used for signing, REST and streaming
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Load credentials from `KALSHI_API_KEY_ID` and `KALSHI_PRIVATE_KEY_PATH`
    pub fn with_credentials_from_env(self) -> Result<Self, ConfigError> {
        Ok(self.with_credentials(Credentials::from_env()?))
    }

    /// Use an existing auth context (e.g. one with an injected signer)
    ///
    /// The context's own environment wins over [`Self::with_environment`].
    pub fn with_auth_context(mut self, auth: AuthContext) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Send REST calls to `base_url` instead of the environment's host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.rest = self.rest.with_base_url(base_url);
        self
    }

    /// Open streams on `url` instead of the environment's endpoint
    pub fn with_stream_url(mut self, url: impl Into<String>) -> Self {
        self.stream = self.stream.with_url(url);
        self
    }

    /// Set the REST request timeout in seconds
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.rest = self.rest.with_timeout(secs);
        self
    }

    /// Set the stream connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.stream = self.stream.with_connect_timeout(timeout);
        self
    }

    /// Minimum spacing between REST calls
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.rest = self.rest.with_min_interval(min_interval);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.rest = self.rest.with_user_agent(user_agent);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.is_none() && self.credentials.is_none() {
            return Err(ConfigError::MissingCredentials);
        }
        if self.rest.timeout_secs == 0 {
            return Err(ConfigError::TimeoutTooShort);
        }
        if self.stream.connect_timeout.is_zero() {
            return Err(ConfigError::ConnectTimeoutTooShort);
        }
        Ok(())
    }

    /// Validate and build the client
    pub fn build(self) -> Result<KalshiClient, ConfigError> {
        self.validate()?;

        let auth = match (self.auth, &self.credentials) {
            (Some(auth), _) => auth,
            (None, Some(credentials)) => AuthContext::new(credentials, self.environment),
            (None, None) => return Err(ConfigError::MissingCredentials),
        };

        let environment = auth.environment();
        let rest_config = self.rest.with_environment(environment);
        let stream_config = StreamConfig {
            environment: Some(environment),
            ..self.stream
        };

        let rest = KalshiRestClient::with_auth(auth.clone(), rest_config)
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(KalshiClient::from_parts(rest, auth, stream_config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PKCS8: &str = include_str!("../../kalshi-auth/tests/fixtures/test_key_pkcs8.pem");

    fn credentials() -> Credentials {
        Credentials::from_pem_str("key-1", PKCS8).unwrap()
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let err = KalshiClientBuilder::new().build().unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials));
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let builder = KalshiClientBuilder::new().with_credentials(credentials());

        let err = builder.clone().with_timeout(0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::TimeoutTooShort));

        let err = builder
            .with_connect_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ConnectTimeoutTooShort));
    }

    #[test]
    fn test_environment_flows_everywhere() {
        let client = KalshiClientBuilder::new()
            .with_environment(Environment::Production)
            .with_credentials(credentials())
            .build()
            .unwrap();

        assert_eq!(client.environment(), Environment::Production);
        assert_eq!(client.rest().transport().base_url(), "https://api.elections.kalshi.com");
        assert_eq!(
            client.stream_session().url(),
            "wss://api.elections.kalshi.com/trade-api/ws/v2"
        );
    }

    #[test]
    fn test_config_error_folds_into_kalshi_error() {
        let err: KalshiError = ConfigError::MissingCredentials.into();
        assert!(matches!(err, KalshiError::Configuration(_)));
    }
}
