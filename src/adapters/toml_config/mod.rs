// TOML config adapter - Configuration management using TOML files

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use reqwest::Url;

use crate::config_initialization::keys;
use crate::error::{AppError, AppResult};
use crate::ports::*;
use crate::presenter::render::OutputFormat;

/// Table holding this tool's settings inside the TOML file
const SECTION: &str = "clipper";

/// Default values, applied before file, environment and CLI layers
const DEFAULTS: &[(&str, &str)] = &[
    (keys::BASE_URL, "http://127.0.0.1:8000"),
    (keys::INFO_PATH, "/api/info"),
    (keys::CLIP_PATH, "/api/clip"),
    (keys::LOG_LEVEL, "warn"),
    (keys::DISCARD_STALE, "false"),
    (keys::OUTPUT_FORMAT, "text"),
];

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    config: RwLock<HashMap<String, String>>,
    config_file_path: RwLock<Option<PathBuf>>,
}

impl TomlConfigAdapter {
    /// Create new TOML config adapter seeded with defaults
    pub fn new() -> Self {
        let config = DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            config: RwLock::new(config),
            config_file_path: RwLock::new(None),
        }
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, HashMap<String, String>>> {
        self.config.read().map_err(|_| AppError::ConfigError {
            message: "configuration lock poisoned".to_string(),
        })
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, HashMap<String, String>>> {
        self.config.write().map_err(|_| AppError::ConfigError {
            message: "configuration lock poisoned".to_string(),
        })
    }

    /// Merge the `[clipper]` table of a TOML document into the current values
    fn deserialize_config(&self, toml_content: &str) -> AppResult<()> {
        let parsed: toml::Value = toml::from_str(toml_content).map_err(|e| AppError::ConfigError {
            message: format!("Failed to parse TOML config: {}", e),
        })?;

        let Some(table) = parsed.get(SECTION).and_then(|section| section.as_table()) else {
            return Ok(());
        };

        let mut config = self.write()?;
        for (key, value) in table {
            // Scalars are stored in their textual form so `timeout = 30` works like `"30"`
            let text = match value {
                toml::Value::String(s) => s.clone(),
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Float(f) => f.to_string(),
                other => {
                    return Err(AppError::ConfigError {
                        message: format!("Unsupported value for {}: {}", key, other),
                    })
                }
            };
            config.insert(key.clone(), text);
        }

        Ok(())
    }
}

impl Default for TomlConfigAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigPort for TomlConfigAdapter {
    async fn get_config(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn get_config_or_default(&self, key: &str, default: &str) -> AppResult<String> {
        Ok(self
            .read()?
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string()))
    }

    async fn set_config(&self, key: &str, value: &str) -> AppResult<()> {
        self.write()?.insert(key.to_string(), value.to_string());
        tracing::debug!("Set config {} = {}", key, value);
        Ok(())
    }

    async fn load_config(&self, file_path: &Path) -> AppResult<()> {
        if !file_path.exists() {
            return Err(AppError::ConfigFileNotFound {
                path: file_path.display().to_string(),
            });
        }

        let content = tokio::fs::read_to_string(file_path).await?;
        self.deserialize_config(&content)?;

        let mut config_path = self.config_file_path.write().map_err(|_| AppError::ConfigError {
            message: "configuration lock poisoned".to_string(),
        })?;
        *config_path = Some(file_path.to_path_buf());

        Ok(())
    }

    async fn validate_config(&self) -> AppResult<()> {
        let config = self.read()?;
        let invalid = |key: &str, e: String| AppError::ConfigError {
            message: format!("{}: {}", key, e),
        };

        if let Some(log_level) = config.get(keys::LOG_LEVEL) {
            LogLevel::parse(log_level).map_err(|e| invalid(keys::LOG_LEVEL, e.to_string()))?;
        }

        if let Some(base_url) = config.get(keys::BASE_URL) {
            Url::parse(base_url).map_err(|e| invalid(keys::BASE_URL, e.to_string()))?;
        }

        if let Some(discard) = config.get(keys::DISCARD_STALE) {
            discard
                .parse::<bool>()
                .map_err(|e| invalid(keys::DISCARD_STALE, e.to_string()))?;
        }

        if let Some(timeout) = config.get(keys::TIMEOUT_SECS) {
            let secs: u64 = timeout
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid(keys::TIMEOUT_SECS, e.to_string()))?;
            if secs == 0 {
                return Err(invalid(keys::TIMEOUT_SECS, "must be at least 1".to_string()));
            }
        }

        if let Some(format) = config.get(keys::OUTPUT_FORMAT) {
            OutputFormat::parse(format).map_err(|e| invalid(keys::OUTPUT_FORMAT, e.to_string()))?;
        }

        Ok(())
    }

    async fn get_config_file_path(&self) -> AppResult<Option<String>> {
        let config_path = self.config_file_path.read().map_err(|_| AppError::ConfigError {
            message: "configuration lock poisoned".to_string(),
        })?;
        Ok(config_path
            .as_ref()
            .map(|path| path.to_string_lossy().to_string()))
    }
}
