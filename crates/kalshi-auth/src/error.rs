//! Error types for authentication operations

use kalshi_types::KalshiError;

/// Errors that can occur while loading keys or signing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Key material could not be parsed as an RSA private key
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// The signature primitive failed
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// Key file could not be read
    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

impl From<AuthError> for KalshiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidKey(_) | AuthError::Signing(_) => KalshiError::Signing(err.to_string()),
            AuthError::EnvVarNotSet(_) | AuthError::Io { .. } => {
                KalshiError::Configuration(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::EnvVarNotSet("KALSHI_API_KEY_ID".to_string());
        assert!(err.to_string().contains("KALSHI_API_KEY_ID"));
    }

    #[test]
    fn test_conversion_into_kalshi_error() {
        let err: KalshiError = AuthError::InvalidKey("not a PEM".into()).into();
        assert!(matches!(err, KalshiError::Signing(_)));

        let err: KalshiError = AuthError::EnvVarNotSet("KALSHI_PRIVATE_KEY_PATH".into()).into();
        assert!(matches!(err, KalshiError::Configuration(_)));
    }
}
