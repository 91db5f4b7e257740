// Adapters - External system implementations

pub mod http_service;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use http_service::{HttpClipServiceAdapter, ServiceEndpoints};
pub use toml_config::TomlConfigAdapter;
pub use tracing_log::TracingLogAdapter;
