//! # bgw-core
//!
//! Shared plumbing for the Bybit gateway workspace:
//!
//! - **Configuration** (`config`): JSON config deserialization, defaults, validation
//! - **Error types** (`error`): `ConfigError` via thiserror
//! - **Logging** (`logging`): tracing subscriber setup and the injectable `Logger`
//! - **Time utilities** (`time_util`): millisecond wall clock

pub mod config;
pub mod error;
pub mod logging;
pub mod time_util;

pub use config::{AppConfig, BybitConfig};
pub use error::ConfigError;
pub use logging::{Logger, NoopLogger, SharedLogger, TracingLogger};
