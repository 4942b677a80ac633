//! Utility functions and helpers
//!
//! This module contains utility functions used throughout the crate.

pub mod redact;
pub mod version;

pub use redact::redact;
pub use version::{VERSION, get_version};
