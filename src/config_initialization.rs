//! Configuration initialization and hierarchy management

use std::path::Path;
use std::time::Duration;

use crate::cli::Cli;
use crate::error::{AppError, AppResult};
use crate::ports::{ConfigPort, LogLevel};
use crate::presenter::render::OutputFormat;

/// Configuration keys of the `[clipper]` table
pub mod keys {
    pub const BASE_URL: &str = "base_url";
    pub const INFO_PATH: &str = "info_path";
    pub const CLIP_PATH: &str = "clip_path";
    pub const LOG_LEVEL: &str = "log_level";
    pub const DISCARD_STALE: &str = "discard_stale_responses";
    pub const TIMEOUT_SECS: &str = "request_timeout_secs";
    pub const OUTPUT_FORMAT: &str = "output_format";
}

/// Environment variables and the keys they override
pub const ENV_MAPPINGS: &[(&str, &str)] = &[
    ("CLIPPER_BASE_URL", keys::BASE_URL),
    ("CLIPPER_INFO_PATH", keys::INFO_PATH),
    ("CLIPPER_CLIP_PATH", keys::CLIP_PATH),
    ("CLIPPER_LOG_LEVEL", keys::LOG_LEVEL),
    ("CLIPPER_DISCARD_STALE", keys::DISCARD_STALE),
    ("CLIPPER_TIMEOUT_SECS", keys::TIMEOUT_SECS),
    ("CLIPPER_OUTPUT_FORMAT", keys::OUTPUT_FORMAT),
];

/// Files probed when no `--config` is given
const CONFIG_SEARCH_PATHS: &[&str] = &["clipper.toml", "config/clipper.toml"];

/// Fully resolved client settings
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub info_path: String,
    pub clip_path: String,
    pub log_level: LogLevel,
    pub discard_stale_responses: bool,
    pub request_timeout: Option<Duration>,
    pub output_format: OutputFormat,
    /// Human-readable trail of which layers contributed, logged once logging is up
    pub applied_sources: Vec<String>,
}

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub async fn initialize_configuration_hierarchy(
    config: &dyn ConfigPort,
    cli: &Cli,
) -> AppResult<ClientSettings> {
    let mut applied_sources = Vec::new();

    // Step 1: defaults are seeded by the adapter itself
    // Step 2: config file
    load_config_file(config, cli.config.as_deref()).await?;
    if let Some(path) = config.get_config_file_path().await? {
        applied_sources.push(format!("file {}", path));
    }

    // Step 3: environment
    let env_overrides = apply_environment(config, |name| std::env::var(name).ok()).await?;
    if env_overrides > 0 {
        applied_sources.push(format!("{} environment override(s)", env_overrides));
    }

    // Step 4: command line
    let cli_overrides = apply_cli_configuration_overrides(config, cli).await?;
    if cli_overrides > 0 {
        applied_sources.push(format!("{} command-line override(s)", cli_overrides));
    }

    config.validate_config().await?;

    let mut settings = settings_from_config(config).await?;
    settings.applied_sources = applied_sources;
    Ok(settings)
}

/// Load an explicit config file, or the first one found on the search path
async fn load_config_file(config: &dyn ConfigPort, explicit: Option<&Path>) -> AppResult<()> {
    if let Some(path) = explicit {
        return config.load_config(path).await;
    }

    for candidate in CONFIG_SEARCH_PATHS {
        let path = Path::new(candidate);
        if path.exists() {
            return config.load_config(path).await;
        }
    }

    Ok(())
}

/// Copy every mapped environment variable that `lookup` finds into the config
pub async fn apply_environment<F>(config: &dyn ConfigPort, lookup: F) -> AppResult<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_overrides = 0;
    for (env_var, config_key) in ENV_MAPPINGS {
        if let Some(value) = lookup(env_var) {
            config.set_config(config_key, &value).await?;
            env_overrides += 1;
        }
    }
    Ok(env_overrides)
}

/// Apply CLI argument overrides to configuration
async fn apply_cli_configuration_overrides(config: &dyn ConfigPort, cli: &Cli) -> AppResult<usize> {
    let mut cli_overrides = 0;

    let overrides = [
        (keys::BASE_URL, cli.base_url.clone()),
        (keys::LOG_LEVEL, cli.log_level.clone()),
        (keys::OUTPUT_FORMAT, cli.format.clone()),
        (keys::TIMEOUT_SECS, cli.timeout_secs.map(|secs| secs.to_string())),
        (keys::DISCARD_STALE, cli.discard_stale.then(|| "true".to_string())),
    ];

    for (key, value) in overrides {
        if let Some(value) = value {
            config.set_config(key, &value).await?;
            cli_overrides += 1;
        }
    }

    Ok(cli_overrides)
}

/// Read typed settings out of a validated config store
pub async fn settings_from_config(config: &dyn ConfigPort) -> AppResult<ClientSettings> {
    let invalid = |message: String| AppError::ConfigError { message };

    let log_level = LogLevel::parse(&config.get_config_or_default(keys::LOG_LEVEL, "warn").await?)
        .map_err(|e| invalid(e.to_string()))?;
    let discard_stale_responses = config
        .get_config_or_default(keys::DISCARD_STALE, "false")
        .await?
        .parse::<bool>()
        .map_err(|e| invalid(format!("{}: {}", keys::DISCARD_STALE, e)))?;
    let request_timeout = match config.get_config(keys::TIMEOUT_SECS).await? {
        Some(secs) => Some(Duration::from_secs(
            secs.parse::<u64>()
                .map_err(|e| invalid(format!("{}: {}", keys::TIMEOUT_SECS, e)))?,
        )),
        None => None,
    };
    let output_format =
        OutputFormat::parse(&config.get_config_or_default(keys::OUTPUT_FORMAT, "text").await?)
            .map_err(|e| invalid(e.to_string()))?;

    Ok(ClientSettings {
        base_url: config
            .get_config_or_default(keys::BASE_URL, "http://127.0.0.1:8000")
            .await?,
        info_path: config.get_config_or_default(keys::INFO_PATH, "/api/info").await?,
        clip_path: config.get_config_or_default(keys::CLIP_PATH, "/api/clip").await?,
        log_level,
        discard_stale_responses,
        request_timeout,
        output_format,
        applied_sources: Vec::new(),
    })
}
