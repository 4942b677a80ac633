//! Passport API client
//!
//! Talks to the two QR login endpoints. The [`LoginApi`] trait is the seam the
//! poller and the login flow depend on, so both can be driven without a network.

use crate::{
    Error, Result,
    config::settings::ApiSettings,
    login::cookies::extract_cookies,
    types::{Challenge, ChallengeEnvelope, StoredCookie},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

/// Path of the challenge endpoint
pub const GENERATE_PATH: &str = "/x/passport-login/web/qrcode/generate";
/// Path of the status endpoint
pub const POLL_PATH: &str = "/x/passport-login/web/qrcode/poll";

/// Raw result of one status poll
#[derive(Debug, Clone)]
pub struct PollExchange {
    /// HTTP status of the poll response
    pub http_status: u16,
    /// Cookies parsed from the response headers
    pub cookies: Vec<StoredCookie>,
    /// Undecoded response body
    pub body: String,
}

/// Operations of the QR login API
#[async_trait]
pub trait LoginApi: Send + Sync {
    /// Obtain a new login challenge
    async fn request_challenge(&self) -> Result<Challenge>;

    /// Query the login status once.
    ///
    /// Only transport failures are errors; the body is returned undecoded.
    async fn poll_status(&self, session_key: &str) -> Result<PollExchange>;
}

/// reqwest-backed [`LoginApi`] implementation
#[derive(Debug, Clone)]
pub struct PassportClient {
    /// HTTP client with the per-request timeout applied
    client: Client,
    /// Base URL of the passport service
    base_url: Url,
}

impl PassportClient {
    /// Build a client from API settings
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.request_timeout())
            .build()?;

        Self::with_client(client, &settings.base_url)
    }

    /// Use an existing reqwest client.
    ///
    /// A path in `base_url` is kept as a prefix of the endpoint paths, so
    /// `http://proxy/bili` sends polls to `http://proxy/bili/x/passport-login/...`.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| Error::config(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::config(format!("Invalid endpoint path '{}': {}", path, e)))
    }
}

#[async_trait]
impl LoginApi for PassportClient {
    async fn request_challenge(&self) -> Result<Challenge> {
        let url = self.endpoint(GENERATE_PATH)?;
        tracing::debug!("Requesting QR login challenge from {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let envelope: ChallengeEnvelope = serde_json::from_str(&body)
            .map_err(|e| Error::malformed(format!("challenge response: {}", e)))?;

        let challenge = Challenge::from_envelope(envelope)?;
        tracing::info!("QR login challenge issued");
        Ok(challenge)
    }

    async fn poll_status(&self, session_key: &str) -> Result<PollExchange> {
        let url = self.endpoint(POLL_PATH)?;

        let response = self
            .client
            .get(url)
            .query(&[("qrcode_key", session_key)])
            .send()
            .await?;

        let http_status = response.status().as_u16();
        let cookies = extract_cookies(&response);
        let body = response.text().await?;

        Ok(PollExchange {
            http_status,
            cookies,
            body,
        })
    }
}
