//! Transport layer errors

use std::time::Duration;

use kalshi_types::KalshiError;
use thiserror::Error;

/// Errors raised by a [`Transport`](crate::transport::Transport)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// Connection timeout
    #[error("connection timeout after {0:?}")]
    Timeout(Duration),

    /// Not connected
    #[error("not connected")]
    NotConnected,

    /// Protocol error
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<TransportError> for KalshiError {
    fn from(err: TransportError) -> Self {
        KalshiError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folds_into_transport_error() {
        let err: KalshiError = TransportError::Timeout(Duration::from_secs(10)).into();
        assert_eq!(err, KalshiError::Transport("connection timeout after 10s".into()));
        assert!(err.is_retryable());
    }
}
