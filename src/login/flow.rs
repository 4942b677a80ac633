//! # Login Flow
//!
//! Orchestrates one complete QR login:
//!
//! 1. request a challenge from the passport API
//! 2. render the login URL as a QR code (PNG file and terminal string)
//! 3. poll the status endpoint until a terminal outcome
//! 4. persist the session cookies
//!
//! The flow is split into [`LoginFlowGeneric::begin`] and
//! [`LoginFlowGeneric::complete`] so the caller can show the QR code between
//! the two. [`LoginFlowGeneric::run`] does both.
//!
//! ## Examples
//!
//! ```rust,no_run
//! use bili_qrlogin::{LoginFlow, Settings};
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio_test::block_on(async {
//! let flow = LoginFlow::new(Settings::default())?;
//! let pending = flow.begin().await?;
//! println!("{}", pending.terminal_qr);
//!
//! let outcome = flow.complete(&pending, &CancellationToken::new()).await?;
//! println!("Logged in with {} cookies", outcome.result.cookies.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # });
//! ```

use crate::{
    Result,
    config::Settings,
    login::client::{LoginApi, PassportClient},
    login::poller::StatusPoller,
    storage::{credentials::save_credentials, qr},
    types::{Challenge, PollResult},
    utils::redact,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Convenience type alias for the flow over the real passport API
pub type LoginFlow = LoginFlowGeneric<PassportClient>;

/// A challenge that has been issued and rendered but not yet confirmed
#[derive(Debug, Clone)]
pub struct PendingLogin {
    pub challenge: Challenge,
    /// QR code rendered for a terminal
    pub terminal_qr: String,
    /// Where the PNG was written, `None` if disabled or the write failed
    pub qrcode_path: Option<PathBuf>,
}

/// Result of a completed login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub result: PollResult,
    /// Where the cookies were saved, `None` if persisting failed
    pub credentials_path: Option<PathBuf>,
}

/// QR login orchestration over any [`LoginApi`]
#[derive(Debug)]
pub struct LoginFlowGeneric<A: LoginApi = PassportClient> {
    settings: Arc<Settings>,
    api: A,
}

impl LoginFlowGeneric<PassportClient> {
    /// Creates a login flow against the configured passport service.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built or the base URL is invalid.
    pub fn new(settings: Settings) -> Result<Self> {
        let api = PassportClient::new(&settings.api)?;
        Ok(Self::with_api(settings, api))
    }
}

impl<A: LoginApi> LoginFlowGeneric<A> {
    /// Creates a login flow over a custom API implementation
    pub fn with_api(settings: Settings, api: A) -> Self {
        Self {
            settings: Arc::new(settings),
            api,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Request a challenge and render its QR code.
    ///
    /// A PNG write failure is logged and reported as `qrcode_path: None`;
    /// the terminal rendering is still returned.
    pub async fn begin(&self) -> Result<PendingLogin> {
        let challenge = self.api.request_challenge().await?;
        let terminal_qr = qr::render_terminal(&challenge.login_url)?;

        let output = &self.settings.output;
        let qrcode_path = if output.write_qrcode_png {
            match qr::write_png(&challenge.login_url, &output.qrcode_path, output.qrcode_size) {
                Ok(()) => Some(output.qrcode_path.clone()),
                Err(e) => {
                    tracing::warn!("Failed to write QR code image: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Ok(PendingLogin {
            challenge,
            terminal_qr,
            qrcode_path,
        })
    }

    /// Poll the pending challenge to completion and persist the cookies.
    ///
    /// Persistence failures are logged as warnings and do not fail the login.
    pub async fn complete(
        &self,
        pending: &PendingLogin,
        cancel: &CancellationToken,
    ) -> Result<LoginOutcome> {
        let poller = StatusPoller::new(&self.api, self.settings.polling.clone());
        let result = poller.poll(&pending.challenge.session_key, cancel).await?;

        tracing::info!(
            "Login confirmed, received {} cookies, refresh token {}",
            result.cookies.len(),
            redact(&result.refresh_token)
        );
        for cookie in &result.cookies {
            tracing::debug!(
                "Cookie {} (domain={:?} path={:?} expires={:?})",
                cookie.name,
                cookie.domain,
                cookie.path,
                cookie.expires
            );
        }

        let path = &self.settings.output.credentials_path;
        let credentials_path = match save_credentials(path, &result.cookies).await {
            Ok(()) => Some(path.clone()),
            Err(e) => {
                tracing::warn!("Failed to save cookies to {}: {}", path.display(), e);
                None
            }
        };

        Ok(LoginOutcome {
            result,
            credentials_path,
        })
    }

    /// Run a whole login without showing the QR code anywhere but the PNG
    pub async fn run(&self, cancel: &CancellationToken) -> Result<LoginOutcome> {
        let pending = self.begin().await?;
        self.complete(&pending, cancel).await
    }
}
