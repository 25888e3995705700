//! Shared setup for the demo binaries

use kalshi_sdk::{Environment, KalshiClient};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by `RUST_LOG` (default `info`)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the one client a demo uses, from `KALSHI_ENV`, `KALSHI_API_KEY_ID`
/// and `KALSHI_PRIVATE_KEY_PATH`
pub fn client_from_env() -> Result<KalshiClient, Box<dyn std::error::Error>> {
    let environment = Environment::from_env()?;
    let client = KalshiClient::builder()
        .with_environment(environment)
        .with_credentials_from_env()?
        .build()?;
    info!(%environment, key_id = client.auth().key_id(), "Demo client ready");
    Ok(client)
}

/// Format cents as dollars
pub fn dollars(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    format!("{sign}${}.{:02}", cents.abs() / 100, cents.abs() % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dollars() {
        assert_eq!(dollars(12345), "$123.45");
        assert_eq!(dollars(5), "$0.05");
        assert_eq!(dollars(-250), "-$2.50");
    }
}
