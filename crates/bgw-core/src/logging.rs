//! Logging initialization and the injectable logger collaborator.
//!
//! [`init_logging`] installs the global `tracing` subscriber once at program
//! start:
//! - Console output (colored, human-readable)
//! - File output (daily rotation via `tracing-appender`)
//! - Configurable log level via env var `RUST_LOG` or explicit parameter
//!
//! Library code does not log through ambient globals. Components that need
//! to log take an `Arc<dyn Logger>` at construction; [`TracingLogger`]
//! forwards into the subscriber installed here.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// Should be called once at program start, by the binary only.
///
/// # Parameters
///
/// - `log_level`: default level if `RUST_LOG` env var is not set (e.g. `"info"`)
/// - `log_dir`: optional directory for daily-rotating log files
/// - `module_name`: used as the log file prefix (e.g. `"bgw-runner"`)
pub fn init_logging(log_level: &str, log_dir: Option<&str>, module_name: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_ansi(true);

    if let Some(dir) = log_dir {
        let file_appender = tracing_appender::rolling::daily(dir, module_name);
        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .init();
    }
}

/// Leveled logging capability handed to components at construction.
///
/// Implementations must be cheap to call from many tasks at once.
pub trait Logger: Send + Sync {
    fn debug(&self, msg: &str);
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// Shared handle to a [`Logger`].
pub type SharedLogger = Arc<dyn Logger>;

/// Forwards every message to `tracing` under the `bgw` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn shared() -> SharedLogger {
        Arc::new(Self)
    }
}

impl Logger for TracingLogger {
    fn debug(&self, msg: &str) {
        tracing::debug!(target: "bgw", "{msg}");
    }

    fn info(&self, msg: &str) {
        tracing::info!(target: "bgw", "{msg}");
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: "bgw", "{msg}");
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: "bgw", "{msg}");
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl NoopLogger {
    pub fn shared() -> SharedLogger {
        Arc::new(Self)
    }
}

impl Logger for NoopLogger {
    fn debug(&self, _msg: &str) {}
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}
