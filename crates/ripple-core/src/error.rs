//! Shared error type across ripple crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed message.
    BadRequest,
    /// Identity could not be resolved.
    AuthFailed,
    /// Event could not be serialized.
    EncodeFailed,
    /// Transport broke (closed, reset, write failed).
    Transport,
    /// A read or write deadline lapsed.
    Timeout,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::AuthFailed => "AUTH_FAILED",
            ClientCode::EncodeFailed => "ENCODE_FAILED",
            ClientCode::Transport => "TRANSPORT",
            ClientCode::Timeout => "TIMEOUT",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RippleError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("auth failed")]
    AuthFailed,
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("transport: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("internal: {0}")]
    Internal(String),
}

impl RippleError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            RippleError::BadRequest(_) => ClientCode::BadRequest,
            RippleError::AuthFailed => ClientCode::AuthFailed,
            RippleError::Encode(_) => ClientCode::EncodeFailed,
            RippleError::Transport(_) => ClientCode::Transport,
            RippleError::Timeout => ClientCode::Timeout,
            RippleError::Internal(_) => ClientCode::Internal,
        }
    }
}

impl From<serde_json::Error> for RippleError {
    fn from(e: serde_json::Error) -> Self {
        RippleError::Encode(e.to_string())
    }
}
