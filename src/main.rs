//! QR code login binary
//!
//! Requests a Bilibili web login QR code, prints it to the terminal and waits
//! until the login is confirmed on a phone, then saves the session cookies.
//!
//! # Usage
//!
//! ```bash
//! bili-qrlogin --output cookies.json --qrcode qrcode.png
//! ```
//!
//! # Output
//!
//! The credentials file holds a JSON array of cookies:
//! ```json
//! [
//!   {
//!     "Name": "SESSDATA",
//!     "Value": "...",
//!     "Domain": "bilibili.com",
//!     "Path": "/",
//!     "Expires": "2031-01-01T00:00:00Z",
//!     "Secure": true,
//!     "HttpOnly": true
//!   }
//! ]
//! ```

use bili_qrlogin::{
    cli::{LoginArgs, run_login_mode},
    utils::VERSION,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "bili-qrlogin")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Where to write the cookie JSON
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Where to write the QR code PNG
    #[arg(short, long, value_name = "PATH")]
    qrcode: Option<PathBuf>,

    /// Only print the QR code to the terminal
    #[arg(long)]
    no_png: bool,

    /// Show version information
    #[arg(long)]
    version: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl From<Cli> for LoginArgs {
    fn from(cli: Cli) -> Self {
        Self {
            config: cli.config,
            output: cli.output,
            qrcode: cli.qrcode,
            no_png: cli.no_png,
            verbose: cli.verbose,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", VERSION);
        return;
    }

    if let Err(e) = run_login_mode(cli.into()).await {
        eprintln!("Login failed: {:#}", e);
        std::process::exit(1);
    }
}
