// Ports - Interface definitions (contracts)

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::error::AppResult;

/// Port for the remote clipping service
#[async_trait]
pub trait ClipServicePort: Send + Sync {
    /// Resolve title, thumbnail, duration and quality options for a source URL
    async fn fetch_info(&self, url: &SourceUrl) -> Result<ResolvedVideo, ClientError>;

    /// Ask the service to cut a clip; the returned download URL is absolute
    async fn create_clip(&self, request: &ClipRequest) -> Result<ClipResult, ClientError>;

    /// Fetch a produced artifact into `destination`, returning the byte count
    async fn download_artifact(
        &self,
        download_url: &str,
        destination: &Path,
    ) -> Result<u64, ClientError>;
}

/// Port for configuration management
#[async_trait]
pub trait ConfigPort: Send + Sync {
    /// Get configuration value
    async fn get_config(&self, key: &str) -> AppResult<Option<String>>;

    /// Get configuration value with default
    async fn get_config_or_default(&self, key: &str, default: &str) -> AppResult<String>;

    /// Set configuration value
    async fn set_config(&self, key: &str, value: &str) -> AppResult<()>;

    /// Load configuration from file
    async fn load_config(&self, file_path: &Path) -> AppResult<()>;

    /// Validate configuration
    async fn validate_config(&self) -> AppResult<()>;

    /// Path of the last loaded config file, if any
    async fn get_config_file_path(&self) -> AppResult<Option<String>>;
}

/// Port for logging and observability
#[async_trait]
pub trait LogPort: Send + Sync {
    /// Log info message
    async fn info(&self, message: &str);

    /// Log warning message
    async fn warn(&self, message: &str);

    /// Log error message
    async fn error(&self, message: &str);

    /// Log debug message
    async fn debug(&self, message: &str);

    /// Log structured event
    async fn log_event(&self, event: &LogEvent);
}

/// Log event with structured data
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, ClientError> {
        match level_str.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ClientError::Validation(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    /// Directive string understood by `tracing_subscriber::EnvFilter`
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
