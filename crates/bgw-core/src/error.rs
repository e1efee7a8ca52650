//! Typed error definitions for configuration handling.
//!
//! Gateway failures live in `bgw-rest`; this crate only needs to describe
//! what can go wrong while reading, validating, or writing the config file.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading, validating, or saving the JSON config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The config file exists but could not be read or written.
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for [`AppConfig`](crate::config::AppConfig).
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the gateway cannot work with.
    #[error("invalid config: {0}")]
    Invalid(String),
}
