//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the QR login helper.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Default passport host
pub const DEFAULT_BASE_URL: &str = "https://passport.bilibili.com";

/// Desktop browser user agent, the passport API rejects empty ones
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Main configuration settings for the QR login helper
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Passport API configuration
    pub api: ApiSettings,
    /// Polling loop configuration
    pub polling: PollingSettings,
    /// Output artifact configuration
    pub output: OutputSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Passport API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the passport service
    pub base_url: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

/// Polling loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    /// Delay between two status polls in milliseconds
    pub interval_ms: u64,
    /// Overall polling budget in milliseconds
    pub timeout_ms: u64,
    /// Treat unknown poll status codes as fatal instead of transient
    pub strict_status_codes: bool,
}

/// Output artifact configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Where the QR code PNG is written
    pub qrcode_path: PathBuf,
    /// Minimum edge length of the QR code PNG in pixels
    pub qrcode_size: u32,
    /// Write the PNG at all (the terminal rendering is always produced)
    pub write_qrcode_png: bool,
    /// Where the cookie JSON is written
    pub credentials_path: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Enable verbose logging
    pub verbose: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_ms: 5_000,
        }
    }
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_ms: 2_000,
            timeout_ms: 180_000,
            strict_status_codes: false,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            qrcode_path: PathBuf::from("qrcode.png"),
            qrcode_size: 256,
            write_qrcode_png: true,
            credentials_path: PathBuf::from("cookies.json"),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            verbose: false,
        }
    }
}

impl ApiSettings {
    /// Per-request timeout as a [`Duration`]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl PollingSettings {
    /// Poll interval as a [`Duration`]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Overall polling budget as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Settings {
    /// Create new settings with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file, missing keys fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Override fields with `BILI_QRLOGIN_*` environment variables
    pub fn merge_with_env(mut self) -> Result<Self> {
        if let Ok(base_url) = std::env::var("BILI_QRLOGIN_BASE_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(user_agent) = std::env::var("BILI_QRLOGIN_USER_AGENT") {
            self.api.user_agent = user_agent;
        }

        if let Ok(raw) = std::env::var("BILI_QRLOGIN_REQUEST_TIMEOUT_MS") {
            self.api.request_timeout_ms = parse_env_value("BILI_QRLOGIN_REQUEST_TIMEOUT_MS", &raw)?;
        }

        if let Ok(raw) = std::env::var("BILI_QRLOGIN_POLL_INTERVAL_MS") {
            self.polling.interval_ms = parse_env_value("BILI_QRLOGIN_POLL_INTERVAL_MS", &raw)?;
        }

        if let Ok(raw) = std::env::var("BILI_QRLOGIN_POLL_TIMEOUT_MS") {
            self.polling.timeout_ms = parse_env_value("BILI_QRLOGIN_POLL_TIMEOUT_MS", &raw)?;
        }

        if let Ok(raw) = std::env::var("BILI_QRLOGIN_STRICT_STATUS_CODES") {
            self.polling.strict_status_codes =
                parse_env_value("BILI_QRLOGIN_STRICT_STATUS_CODES", &raw)?;
        }

        if let Ok(path) = std::env::var("BILI_QRLOGIN_QRCODE_PATH") {
            self.output.qrcode_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("BILI_QRLOGIN_CREDENTIALS_PATH") {
            self.output.credentials_path = PathBuf::from(path);
        }

        if let Ok(level) = std::env::var("BILI_QRLOGIN_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(self)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.api.base_url).map_err(|e| {
            Error::config(format!("Invalid base URL '{}': {}", self.api.base_url, e))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "Base URL must be http or https, got '{}'",
                base.scheme()
            )));
        }

        if self.api.request_timeout_ms == 0 {
            return Err(Error::config("Request timeout must be greater than zero"));
        }

        if self.polling.interval_ms == 0 {
            return Err(Error::config("Poll interval must be greater than zero"));
        }

        if self.polling.timeout_ms < self.polling.interval_ms {
            return Err(Error::config(format!(
                "Poll timeout ({}ms) must not be shorter than the poll interval ({}ms)",
                self.polling.timeout_ms, self.polling.interval_ms
            )));
        }

        if self.output.qrcode_size == 0 {
            return Err(Error::config("QR code size must be greater than zero"));
        }

        Ok(())
    }

    /// Default config file location, e.g. `~/.config/bili-qrlogin/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bili-qrlogin").join("config.toml"))
    }
}

/// Parse one environment value, naming the variable on failure
fn parse_env_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid {}: {}", name, e)))
}
