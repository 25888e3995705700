//! Error helpers for REST operations
//!
//! REST calls fail with the workspace-wide [`KalshiError`]; this module maps
//! HTTP-client failures into it.

use kalshi_types::KalshiError;

/// Result type for REST operations
pub type RestResult<T> = Result<T, KalshiError>;

/// Map a reqwest failure into a transport error
pub(crate) fn transport_error(err: reqwest::Error) -> KalshiError {
    let kind = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else if err.is_request() {
        "request"
    } else {
        "http"
    };
    KalshiError::Transport(format!("{kind}: {err}"))
}

/// Map a query encoding failure into a validation error
pub(crate) fn encode_error(err: serde_urlencoded::ser::Error) -> KalshiError {
    KalshiError::Validation(format!("unencodable query parameters: {err}"))
}
