//! Clipper client
//!
//! Command-line client for a remote video clipping service.
//!
//! # Usage
//!
//! ```bash
//! clipper info --url "https://www.youtube.com/watch?v=..."
//! clipper clip --url "https://www.youtube.com/watch?v=..." --quality 720 --start 00:01:00 --end 00:01:30 --output clip.mp4
//! clipper session
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use clipper_client::adapters::TomlConfigAdapter;
use clipper_client::app::DefaultAppContainer;
use clipper_client::cli::{commands, Cli, Commands};
use clipper_client::config_initialization::initialize_configuration_hierarchy;
use clipper_client::utils::logging::init_logging;

/// Main entry point for the clipper client
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Resolve configuration before logging so the configured level applies
    let config = TomlConfigAdapter::new();
    let settings = initialize_configuration_hierarchy(&config, &cli).await?;
    init_logging(settings.log_level, cli.json_logs)?;

    for source in &settings.applied_sources {
        info!("Configuration applied from {}", source);
    }
    info!(base_url = %settings.base_url, "Clipper client starting");

    let container = DefaultAppContainer::new(&settings)?;

    // Execute the requested command
    let succeeded = match cli.command {
        Commands::Info(args) => commands::info(&container, &settings, args).await?,
        Commands::Clip(args) => commands::clip(&container, &settings, args).await?,
        Commands::Session => commands::session(&container, &settings).await?,
    };

    if !succeeded {
        warn!("Operation ended in error");
        std::process::exit(1);
    }

    Ok(())
}
