//! Authenticated HTTP transport
//!
//! Every call goes through the same sequence: wait on the rate limiter,
//! sign, send, classify. Nothing is retried here.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use kalshi_auth::AuthContext;
use kalshi_types::{HttpMethod, KalshiError};

use crate::error::{transport_error, RestResult};
use crate::rate_limiter::RateLimiter;
use crate::request::RestRequest;

/// Sends signed, rate-limited requests to one base URL
#[derive(Clone)]
pub struct RestTransport {
    http: Client,
    base_url: String,
    auth: AuthContext,
    limiter: Arc<RateLimiter>,
}

impl RestTransport {
    /// Build a transport with its own HTTP client
    pub fn new(
        base_url: impl Into<String>,
        auth: AuthContext,
        limiter: Arc<RateLimiter>,
        timeout: Duration,
        user_agent: &str,
    ) -> RestResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| KalshiError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self::with_http_client(http, base_url, auth, limiter))
    }

    /// Build a transport around an existing HTTP client
    pub fn with_http_client(
        http: Client,
        base_url: impl Into<String>,
        auth: AuthContext,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
            limiter,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Execute a request and decode a 2xx body as `T`
    ///
    /// An empty 2xx body decodes as JSON `null`. Any other status fails with
    /// [`KalshiError::Api`] carrying the raw body.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute<T: DeserializeOwned>(&self, request: RestRequest) -> RestResult<T> {
        self.limiter.acquire().await;

        // Signed after the limiter released so the timestamp is fresh
        let signed = self.auth.sign_request(request.method, &request.signed_path())?;
        let url = format!("{}{}", self.base_url, request.path_and_query());
        debug!(%url, "Sending request");

        let mut builder = self
            .http
            .request(to_reqwest_method(request.method), &url)
            .header(CONTENT_TYPE, "application/json");
        for (name, value) in signed.headers() {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            warn!(status = status.as_u16(), %body, "Request failed");
            return Err(KalshiError::api(status.as_u16(), body));
        }

        debug!(status = status.as_u16(), len = bytes.len(), "Response received");
        decode_body(&bytes)
    }
}

impl std::fmt::Debug for RestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestTransport")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .field("min_interval", &self.limiter.min_interval())
            .finish()
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> RestResult<T> {
    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        bytes
    };
    serde_json::from_slice(bytes)
        .map_err(|e| KalshiError::invalid_json(&e, String::from_utf8_lossy(bytes)))
}
