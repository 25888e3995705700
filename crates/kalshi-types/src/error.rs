//! Error types for the Kalshi client

use thiserror::Error;

/// HTTP status returned when the exchange throttles a caller
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Main error type for Kalshi client operations
///
/// The core never retries on its own. [`KalshiError::is_retryable`] is
/// advisory: callers decide what to do with it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KalshiError {
    // === Request construction ===
    /// Key material unusable or the signature primitive rejected the input
    #[error("signing failed: {0}")]
    Signing(String),

    /// Request violates a required-field or mutual-exclusion constraint
    #[error("invalid request: {0}")]
    Validation(String),

    // === REST ===
    /// Non-2xx HTTP response
    #[error("API error {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    // === Network ===
    /// Network-level failure (connect, send, receive)
    #[error("transport error: {0}")]
    Transport(String),

    /// Streaming session ended, gracefully or not
    #[error("stream closed ({code}): {reason}")]
    StreamClosed {
        /// Close status code (1000 for a normal closure)
        code: u16,
        /// Close reason reported by the closing side
        reason: String,
    },

    // === Protocol ===
    /// Response or frame could not be decoded
    #[error("invalid JSON: {message}")]
    InvalidJson {
        message: String,
        raw: Option<String>,
    },

    /// Operation not allowed in the current state
    #[error("invalid state: expected {expected}, got {actual}")]
    InvalidState { expected: String, actual: String },

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl KalshiError {
    /// Create an API error from a status code and raw body
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a decoding error, keeping the raw payload for diagnostics
    pub fn invalid_json(err: &serde_json::Error, raw: impl Into<String>) -> Self {
        Self::InvalidJson {
            message: err.to_string(),
            raw: Some(raw.into()),
        }
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the exchange throttled the request
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(STATUS_TOO_MANY_REQUESTS)
    }

    /// Returns true if a caller-side retry could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status == STATUS_TOO_MANY_REQUESTS || *status >= 500,
            Self::Transport(_) => true,
            Self::StreamClosed { code, .. } => *code != 1000,
            _ => false,
        }
    }

    /// Returns true if the error happened before any I/O was attempted
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Signing(_) | Self::Validation(_) | Self::Configuration(_)
        )
    }
}

/// Result type for Kalshi operations
pub type KalshiResult<T> = Result<T, KalshiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KalshiError::api(429, r#"{"error":"too many requests"}"#);
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("too many requests"));
    }

    #[test]
    fn test_rate_limit_classification() {
        let err = KalshiError::api(429, "");
        assert!(err.is_rate_limited());
        assert!(err.is_retryable());

        let err = KalshiError::api(400, "bad request");
        assert!(!err.is_rate_limited());
        assert!(!err.is_retryable());
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_local_errors_are_not_retryable() {
        let err = KalshiError::validation("exactly one of yes_price or no_price");
        assert!(err.is_local());
        assert!(!err.is_retryable());
        assert!(KalshiError::Signing("bad key".into()).is_local());
    }

    #[test]
    fn test_stream_closed_retryability() {
        let normal = KalshiError::StreamClosed {
            code: 1000,
            reason: "bye".into(),
        };
        let abnormal = KalshiError::StreamClosed {
            code: 1006,
            reason: "reset".into(),
        };
        assert!(!normal.is_retryable());
        assert!(abnormal.is_retryable());
    }
}
