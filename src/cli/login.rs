//! Login mode CLI logic
//!
//! Loads configuration, sets up logging, shows the QR code and waits for the
//! login to finish. Ctrl-C cancels the wait.

use crate::{
    Settings,
    config::ConfigLoader,
    login::{LoginFlow, LoginOutcome},
    utils::version,
};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Arguments for login mode
#[derive(Debug, Default)]
pub struct LoginArgs {
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub qrcode: Option<PathBuf>,
    pub no_png: bool,
    pub verbose: bool,
}

/// Run one interactive login with the given arguments
pub async fn run_login_mode(args: LoginArgs) -> Result<LoginOutcome> {
    let config_path = args.config.clone().or_else(|| {
        Settings::default_config_path().filter(|path| path.exists())
    });

    let settings = ConfigLoader::new()
        .load(config_path.as_deref())
        .context("failed to load configuration")?;
    let settings = apply_overrides(settings, &args);

    init_logging(&settings);
    tracing::info!("bili-qrlogin v{}", version::get_version());
    if let Some(path) = &config_path {
        tracing::info!("Using configuration file {}", path.display());
    }

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling login");
            signal_token.cancel();
        }
    });

    let flow = LoginFlow::new(settings)?;
    let pending = flow.begin().await?;

    println!("{}", pending.terminal_qr);
    println!("Scan the QR code above with the Bilibili app and confirm the login.");
    if let Some(path) = &pending.qrcode_path {
        println!("The QR code is also saved at {}", path.display());
    }

    let outcome = flow.complete(&pending, &cancel).await?;
    match &outcome.credentials_path {
        Some(path) => println!(
            "Login succeeded, {} cookies saved to {}",
            outcome.result.cookies.len(),
            path.display()
        ),
        None => println!("Login succeeded, but the cookies could not be saved"),
    }

    Ok(outcome)
}

/// Apply command line flags on top of the loaded settings
pub fn apply_overrides(mut settings: Settings, args: &LoginArgs) -> Settings {
    if let Some(output) = &args.output {
        settings.output.credentials_path = output.clone();
    }
    if let Some(qrcode) = &args.qrcode {
        settings.output.qrcode_path = qrcode.clone();
    }
    if args.no_png {
        settings.output.write_qrcode_png = false;
    }
    if args.verbose {
        settings.logging.verbose = true;
    }
    settings
}

/// Log filter: `RUST_LOG` first, then `--verbose`, then the configured level
fn log_filter(settings: &Settings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if settings.logging.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(&settings.logging.level)
        }
    })
}

fn init_logging(settings: &Settings) {
    let result = tracing_subscriber::registry()
        .with(log_filter(settings))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if result.is_err() {
        tracing::debug!("Logging already initialized");
    }
}
