//! Shared fixtures for REST integration tests

#![allow(dead_code)]

use std::time::Duration;

use kalshi_auth::Credentials;
use kalshi_rest::{ClientConfig, KalshiRestClient};
use kalshi_types::Environment;

pub const KEY_ID: &str = "test-key-id";

pub const TEST_KEY_PEM: &str = include_str!("../../../kalshi-auth/tests/fixtures/test_key_pkcs8.pem");

pub fn credentials() -> Credentials {
    Credentials::from_pem_str(KEY_ID, TEST_KEY_PEM).unwrap()
}

/// Client pointed at a mock server
pub fn client_for(server: &mockito::ServerGuard, environment: Environment) -> KalshiRestClient {
    let config = ClientConfig::new()
        .with_environment(environment)
        .with_base_url(server.url())
        .with_timeout(5);
    KalshiRestClient::new(&credentials(), config).unwrap()
}

/// Client pointed at a mock server with a custom request interval
pub fn client_with_interval(server: &mockito::ServerGuard, interval: Duration) -> KalshiRestClient {
    let config = ClientConfig::new()
        .with_base_url(server.url())
        .with_min_interval(interval);
    KalshiRestClient::new(&credentials(), config).unwrap()
}

pub fn markets_body(tickers: &[&str], cursor: Option<&str>) -> String {
    let markets: Vec<_> = tickers
        .iter()
        .map(|t| serde_json::json!({"ticker": t, "status": "settled", "result": "yes"}))
        .collect();
    serde_json::json!({"markets": markets, "cursor": cursor.unwrap_or("")}).to_string()
}
