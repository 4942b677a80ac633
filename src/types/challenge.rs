//! Login challenge types
//!
//! Wire format of the QR code generate endpoint and the challenge handed to the poller.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

use super::serde_helpers::null_as_default;

/// Body of `GET /x/passport-login/web/qrcode/generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeEnvelope {
    /// Top-level API code, 0 on success
    pub code: i64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub ttl: i64,

    /// Absent or null when the request was rejected
    #[serde(default)]
    pub data: Option<ChallengeData>,
}

/// `data` object of the generate response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeData {
    /// URL to encode into the QR code
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    /// Session key used to poll the login status
    #[serde(default, deserialize_with = "null_as_default")]
    pub qrcode_key: String,
}

/// One QR login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// URL the mobile app opens after scanning
    pub login_url: String,
    /// Opaque key correlating poll requests with this challenge
    pub session_key: String,
}

impl Challenge {
    /// Create a new challenge
    pub fn new(login_url: impl Into<String>, session_key: impl Into<String>) -> Self {
        Self {
            login_url: normalize_login_url(&login_url.into()),
            session_key: session_key.into(),
        }
    }

    /// Build a challenge from a decoded generate response
    pub fn from_envelope(envelope: ChallengeEnvelope) -> Result<Self> {
        if envelope.code != 0 {
            return Err(Error::api_rejected(envelope.code, envelope.message));
        }

        let data = envelope
            .data
            .ok_or_else(|| Error::malformed("challenge response has no data object"))?;

        if data.url.is_empty() || data.qrcode_key.is_empty() {
            return Err(Error::malformed(
                "challenge response is missing url or qrcode_key",
            ));
        }

        Ok(Self::new(data.url, data.qrcode_key))
    }
}

/// Undo a literal `\u0026` escape left in the URL by double encoding
pub fn normalize_login_url(url: &str) -> String {
    url.replace("\\u0026", "&")
}
