//! Poll response types and status classification
//!
//! The poll endpoint reports progress through two codes: the top-level API code
//! and the login code nested in `data`. Both are folded into one [`PollStatus`].

use serde::{Deserialize, Serialize};
use std::fmt;

use super::serde_helpers::null_as_default;

use super::StoredCookie;

/// QR code expired
pub const CODE_EXPIRED: i64 = 86038;
/// Scanned, waiting for confirmation on the device
pub const CODE_SCANNED: i64 = 86090;
/// Not scanned yet
pub const CODE_NOT_SCANNED: i64 = 86101;

/// Body of `GET /x/passport-login/web/qrcode/poll`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollEnvelope {
    /// Top-level API code
    pub code: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,

    #[serde(default)]
    pub data: Option<PollData>,
}

/// `data` object of the poll response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub refresh_token: String,

    /// Server time in milliseconds
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: i64,

    /// Login code, 0 once the user confirmed
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

/// Classification of a single poll response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStatus {
    /// User confirmed the login
    Confirmed,
    /// QR code is no longer valid
    Expired,
    /// Scanned, awaiting confirmation
    Scanned,
    /// Not scanned yet
    AwaitingScan,
    /// Any code outside the documented set
    Unknown(i64),
}

impl PollStatus {
    /// Classify a response from its outer code and optional inner code.
    ///
    /// The documented status codes may arrive either as the top-level code or,
    /// with a top-level code of 0, nested in `data.code`.
    pub fn from_codes(outer: i64, inner: Option<i64>) -> Self {
        match outer {
            0 => match inner {
                Some(0) => Self::Confirmed,
                Some(code) => Self::from_status_code(code),
                None => Self::Unknown(outer),
            },
            code => Self::from_status_code(code),
        }
    }

    fn from_status_code(code: i64) -> Self {
        match code {
            CODE_EXPIRED => Self::Expired,
            CODE_SCANNED => Self::Scanned,
            CODE_NOT_SCANNED => Self::AwaitingScan,
            other => Self::Unknown(other),
        }
    }
}

impl PollEnvelope {
    /// Classify this response
    pub fn status(&self) -> PollStatus {
        PollStatus::from_codes(self.code, self.data.as_ref().map(|d| d.code))
    }

    /// Most specific message the server sent
    pub fn best_message(&self) -> &str {
        match &self.data {
            Some(data) if !data.message.is_empty() => &data.message,
            _ => &self.message,
        }
    }
}

/// States of one login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    /// Challenge issued, nothing polled yet
    Requested,
    AwaitingScan,
    Scanned,
    Confirmed,
    Expired,
    TimedOut,
}

impl LoginState {
    /// State after observing `status`; unknown codes keep the current state
    pub fn advance(self, status: PollStatus) -> Self {
        match status {
            PollStatus::Confirmed => Self::Confirmed,
            PollStatus::Expired => Self::Expired,
            PollStatus::Scanned => Self::Scanned,
            PollStatus::AwaitingScan => Self::AwaitingScan,
            PollStatus::Unknown(_) => self,
        }
    }
}

impl fmt::Display for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Requested => "requested",
            Self::AwaitingScan => "awaiting scan",
            Self::Scanned => "scanned, awaiting confirmation",
            Self::Confirmed => "confirmed",
            Self::Expired => "expired",
            Self::TimedOut => "timed out",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful poll
#[derive(Debug, Clone)]
pub struct PollResult {
    pub outer_code: i64,
    pub inner_code: i64,
    pub message: String,
    /// Cross-domain login URL returned on success
    pub url: String,
    /// Long-lived renewal credential
    pub refresh_token: String,
    pub timestamp: i64,
    /// Cookies from the `Set-Cookie` headers of the final response
    pub cookies: Vec<StoredCookie>,
}

impl PollResult {
    /// Combine a decoded poll body with the cookies of the same response
    pub fn from_envelope(envelope: PollEnvelope, cookies: Vec<StoredCookie>) -> Self {
        let message = envelope.best_message().to_string();
        let data = envelope.data.unwrap_or_default();
        Self {
            outer_code: envelope.code,
            inner_code: data.code,
            message,
            url: data.url,
            refresh_token: data.refresh_token,
            timestamp: data.timestamp,
            cookies,
        }
    }
}
