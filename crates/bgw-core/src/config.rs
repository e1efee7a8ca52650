//! Configuration parsing for the Bybit gateway.
//!
//! The runner reads a single JSON config file with three sections: the
//! (externally served) listen address, the Bybit credentials and endpoint,
//! and the logger settings. Every field has a default, so a partial file is
//! accepted.
//!
//! # Example config
//!
//! ```json
//! {
//!   "server": { "host": "0.0.0.0", "port": 50051 },
//!   "bybit": {
//!     "baseUrl": "https://api.bybit.com",
//!     "apiKey": "xxxx",
//!     "apiSecret": "yyyy",
//!     "debug": false,
//!     "timeoutMs": 10000
//!   },
//!   "logger": { "level": "info", "output": "stdout" }
//! }
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable that overrides `bybit.apiKey`.
pub const ENV_API_KEY: &str = "BYBIT_API_KEY";

/// Environment variable that overrides `bybit.apiSecret`.
pub const ENV_API_SECRET: &str = "BYBIT_API_SECRET";

/// Top-level application config, deserialized from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listen address for the service wrapper.
    #[serde(default)]
    pub server: ServerConfig,

    /// Bybit REST API settings.
    #[serde(default)]
    pub bybit: BybitConfig,

    /// Logger settings.
    #[serde(default)]
    pub logger: LoggerConfig,
}

/// Listen address block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Bybit REST API settings.
///
/// `Debug` is implemented by hand so the secret never reaches a log line.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BybitConfig {
    /// REST base URL, without the `/v5` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (sent in `X-BAPI-API-KEY`).
    #[serde(default)]
    pub api_key: String,

    /// API secret (HMAC-SHA256 signing key).
    #[serde(default)]
    pub api_secret: String,

    /// Log request URLs and raw response bodies at debug level.
    #[serde(default)]
    pub debug: bool,

    /// Upper bound for a single HTTP round trip, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl BybitConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// `true` when both credentials are present.
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

impl Default for BybitConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            api_secret: String::new(),
            debug: false,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl fmt::Debug for BybitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BybitConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &mask(&self.api_key))
            .field("api_secret", &"***")
            .field("debug", &self.debug)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Logger settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Default level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `"stdout"`, `"stderr"`, or a directory for daily rolling files.
    #[serde(default = "default_log_output")]
    pub output: String,
}

impl LoggerConfig {
    /// Directory for file output, or `None` for console-only logging.
    pub fn log_dir(&self) -> Option<&str> {
        match self.output.to_ascii_lowercase().as_str() {
            "stdout" | "stderr" | "" => None,
            _ => Some(self.output.as_str()),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            output: default_log_output(),
        }
    }
}

impl AppConfig {
    /// Reject values that would make every request fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.bybit.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid("bybit.baseUrl is empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "bybit.baseUrl must be http(s): {url}"
            )));
        }
        if self.bybit.timeout_ms == 0 {
            return Err(ConfigError::Invalid("bybit.timeoutMs must be > 0".into()));
        }
        Ok(())
    }

    /// Replace credentials with `BYBIT_API_KEY` / `BYBIT_API_SECRET` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            if !key.is_empty() {
                self.bybit.api_key = key;
            }
        }
        if let Ok(secret) = std::env::var(ENV_API_SECRET) {
            if !secret.is_empty() {
                self.bybit.api_secret = secret;
            }
        }
    }
}

/// Load and parse a JSON config file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Write the config as pretty-printed JSON.
pub fn save_config(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Mask an API key for display: first four characters, then `***`.
pub fn mask(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{prefix}***")
}

// ---------------------------------------------------------------------------
// Defaults (used by serde)
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    50051
}

fn default_base_url() -> String {
    "https://api.bybit.com".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_output() -> String {
    "stdout".into()
}
