//! Configuration management for the QR login helper
//!
//! This module handles loading and managing configuration settings
//! from defaults, TOML files and environment variables.

pub mod loader;
pub mod settings;

pub use loader::ConfigLoader;
pub use settings::Settings;
