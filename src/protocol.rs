//! JSON-RPC 2.0 wire envelopes.
//!
//! Defines the request and response objects exchanged with remote
//! callers, the error object, and the protocol error codes. Request
//! parameters are kept raw ([`RawValue`]) until dispatch decodes each
//! one into the exact type the target method declares.
//!
//! A request without an `id` is a *notification*: it runs for effect
//! only and never receives a response.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// Protocol version tag carried by every envelope.
pub const VERSION: &str = "2.0";

/// Protocol error codes.
pub mod codes {
    /// Request or parameter bytes could not be decoded.
    pub const PARSE_ERROR: i64 = -32700;
    /// Method name is not in the registry.
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Supplied parameter count does not match the method's.
    pub const INVALID_PARAMS: i64 = -32602;

    /// Handler-reported failure. All handler errors collapse to this
    /// one code; only the message survives.
    pub const HANDLER_ERROR: i64 = 1;

    /// Lower bound of the reserved protocol range.
    pub const RESERVED_MIN: i64 = -32768;
    /// Upper bound of the reserved protocol range.
    pub const RESERVED_MAX: i64 = -32000;

    /// Check whether a code falls in the reserved protocol range.
    #[inline]
    pub fn is_reserved(code: i64) -> bool {
        (RESERVED_MIN..=RESERVED_MAX).contains(&code)
    }
}

/// Incoming request envelope.
///
/// Decoded once from transport bytes, read-only thereafter. `params`
/// stay encoded; the registry entry for `method` knows the native type
/// each position must decode into.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    /// Protocol version, expected "2.0". Not validated; an absent
    /// field decodes as empty and the request dispatches normally.
    #[serde(default)]
    pub jsonrpc: String,
    /// Request identifier. `None` marks a notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Fully-qualified method name, `"namespace.Method"`.
    pub method: String,
    /// Positional parameters, still encoded.
    #[serde(default)]
    pub params: Vec<Box<RawValue>>,
}

/// Outgoing response envelope.
///
/// Constructed only for requests that carried an `id`. A well-formed
/// response sets at most one of `result`/`error`; the constructors
/// below guarantee it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Protocol version, always "2.0".
    pub jsonrpc: String,
    /// Result payload, present only on success with a value output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Echo of the request identifier.
    pub id: i64,
    /// Error object, present only on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

impl Response {
    /// Build a success response carrying a result payload.
    pub fn result(id: i64, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: VERSION.to_string(),
            result: Some(result),
            id,
            error: None,
        }
    }

    /// Build a success response with no result payload.
    pub fn empty(id: i64) -> Self {
        Self {
            jsonrpc: VERSION.to_string(),
            result: None,
            id,
            error: None,
        }
    }

    /// Build an error response.
    pub fn error(id: i64, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: VERSION.to_string(),
            result: None,
            id,
            error: Some(ErrorObject {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Wire error object: numeric code plus human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Numeric error code.
    pub code: i64,
    /// Short description.
    pub message: String,
}

impl fmt::Display for ErrorObject {
    /// Codes in the reserved protocol range render with the code
    /// included; application codes render the message alone.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if codes::is_reserved(self.code) {
            write!(f, "RPC error ({}): {}", self.code, self.message)
        } else {
            f.write_str(&self.message)
        }
    }
}

impl std::error::Error for ErrorObject {}
