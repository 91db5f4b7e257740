//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::error::{AppError, AppResult};
use crate::ports::LogLevel;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// Logs go to stderr so rendered panels on stdout stay machine-readable.
pub fn init_logging(level: LogLevel, json: bool) -> AppResult<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let result = if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
    };

    result.map_err(|e| AppError::ConfigError {
        message: format!("Failed to initialize logging: {}", e),
    })
}
