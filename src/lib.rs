//! Bilibili QR code login helper
//!
//! Logs in to the Bilibili web passport by QR code and stores the resulting
//! session cookies on disk.
//!
//! # Architecture
//!
//! A login is a single sequential pipeline:
//! - **Challenge Requester**: obtains a login URL and a session key
//! - **QR Renderer**: turns the login URL into a PNG and a terminal rendering
//! - **Status Poller**: polls until the user confirms on a mobile device,
//!   the code expires, or the polling budget runs out
//! - **Cookie Extractor**: collects the `Set-Cookie` headers of each poll
//! - **Credential Persister**: writes the cookies as a JSON array
//!
//! # Usage
//!
//! ```bash
//! bili-qrlogin --output cookies.json --qrcode qrcode.png
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use bili_qrlogin::{LoginFlow, Settings};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let flow = LoginFlow::new(Settings::default())?;
//! let outcome = flow.run(&CancellationToken::new()).await?;
//! println!("{} cookies saved", outcome.result.cookies.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod login;
pub mod storage;
pub mod types;
pub mod utils;

pub use config::Settings;
pub use error::{Error, Result};
pub use login::{LoginApi, LoginFlow, PassportClient, StatusPoller};
pub use types::{Challenge, PollResult, StoredCookie};
