//! Error type definitions
//!
//! Defines the main error types used throughout the QR login helper.

use std::time::Duration;
use thiserror::Error;

/// Main error type for the QR login helper
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid login session input (e.g. an empty session key)
    #[error("Session error: {0}")]
    Session(String),

    /// Network/HTTP client errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-200 HTTP status from a passport endpoint
    #[error("Unexpected HTTP status: {status}")]
    HttpStatus { status: u16 },

    /// Response body could not be decoded
    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },

    /// Passport API answered with a non-zero top-level code
    #[error("API rejected request: [{code}] {message}")]
    ApiRejected { code: i64, message: String },

    /// The QR code expired before the login was confirmed
    #[error("QR code has expired, request a new one")]
    Expired,

    /// Polling budget exhausted without a terminal status
    #[error("Login timed out after {}s", waited.as_secs())]
    Timeout { waited: Duration },

    /// Poll status code outside the known set (strict mode only)
    #[error("Unexpected poll status: [{code}] {message}")]
    UnexpectedStatus { code: i64, message: String },

    /// Login was cancelled by the caller
    #[error("Login cancelled")]
    Cancelled,

    /// QR code generation or image write failure
    #[error("QR code error: {0}")]
    QrCode(String),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new session error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create a malformed response error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Create an API rejection error
    pub fn api_rejected(code: i64, message: impl Into<String>) -> Self {
        Self::ApiRejected {
            code,
            message: message.into(),
        }
    }

    /// Create a QR code error
    pub fn qrcode(msg: impl Into<String>) -> Self {
        Self::QrCode(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error came from the transport layer rather than the API
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::HttpStatus { .. })
    }
}
