//! Error handling module for the clipper client

use thiserror::Error;

/// Process-level errors: configuration, wiring, output
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration value missing or malformed
    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },

    /// Explicitly requested config file does not exist
    #[error("Config file not found: {path}")]
    ConfigFileNotFound { path: String },

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {message}")]
    HttpClientError { message: String },

    /// Panel could not be rendered in the requested format
    #[error("Failed to render output: {message}")]
    RenderError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for process-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
