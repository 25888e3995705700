//! API environment definitions

use std::fmt;
use std::str::FromStr;

use crate::error::KalshiError;

/// Path prefix shared by every REST endpoint
pub const API_PREFIX: &str = "/trade-api/v2";

/// Path of the streaming endpoint (also the path signed during the handshake)
pub const WS_PATH: &str = "/trade-api/ws/v2";

/// Kalshi API environments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    /// Demo exchange with play money (default)
    #[default]
    Sandbox,
    /// Live exchange
    Production,
}

impl Environment {
    /// Base URL for REST requests
    pub fn rest_base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://demo-api.kalshi.co",
            Self::Production => "https://api.elections.kalshi.com",
        }
    }

    /// Base URL for the streaming connection
    pub fn ws_base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "wss://demo-api.kalshi.co",
            Self::Production => "wss://api.elections.kalshi.com",
        }
    }

    /// Full streaming URL, including [`WS_PATH`]
    pub fn ws_url(&self) -> String {
        format!("{}{}", self.ws_base_url(), WS_PATH)
    }

    /// Read the environment from `KALSHI_ENV`, falling back to the sandbox
    pub fn from_env() -> Result<Self, KalshiError> {
        match std::env::var("KALSHI_ENV") {
            Ok(value) => value.parse(),
            Err(_) => Ok(Self::default()),
        }
    }
}

impl FromStr for Environment {
    type Err = KalshiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" | "sandbox" => Ok(Self::Sandbox),
            "prod" | "production" => Ok(Self::Production),
            other => Err(KalshiError::Configuration(format!(
                "unknown environment '{other}' (expected demo, sandbox, prod or production)"
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sandbox => write!(f, "sandbox"),
            Self::Production => write!(f, "production"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_urls() {
        assert_eq!(Environment::Sandbox.rest_base_url(), "https://demo-api.kalshi.co");
        assert_eq!(
            Environment::Production.ws_url(),
            "wss://api.elections.kalshi.com/trade-api/ws/v2"
        );
    }

    #[test]
    fn test_parse_environment() {
        assert_eq!("demo".parse::<Environment>().unwrap(), Environment::Sandbox);
        assert_eq!(" PROD ".parse::<Environment>().unwrap(), Environment::Production);
        assert!(matches!(
            "staging".parse::<Environment>(),
            Err(KalshiError::Configuration(_))
        ));
    }
}
