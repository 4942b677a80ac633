//! Command line front end
//!
//! Contains the logic behind the `bili-qrlogin` binary so it can be tested
//! without spawning a process.

pub mod login;

pub use login::{LoginArgs, run_login_mode};
