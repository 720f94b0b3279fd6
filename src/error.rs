//! Error types for jsonwire.

use thiserror::Error;

/// Main error type for dispatch operations.
///
/// Protocol-level failures (unknown method, bad parameters, malformed
/// requests) never surface here; they become wire-level error responses.
/// This type covers only failures the dispatcher reports to its caller:
/// I/O on the transport streams and response-encode failures.
#[derive(Debug, Error)]
pub enum RpcError {
    /// I/O error while reading a request or writing a response.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error while encoding a response.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using RpcError.
pub type Result<T> = std::result::Result<T, RpcError>;
