//! CLI module for the clipper client
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// Clipper client
///
/// Resolves video metadata and requests trimmed clips from a remote clipping service.
#[derive(Parser, Debug)]
#[command(name = "clipper")]
#[command(about = "Request trimmed clips from a remote video clipping service")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Base URL of the clipping service
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Configuration file (TOML, `[clipper]` table)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Output format (text, json, yaml)
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Request timeout in seconds (transport default when unset)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Ignore responses of requests superseded by a newer trigger
    #[arg(long, global = true)]
    pub discard_stale: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch title, duration and quality options of a video
    Info(args::InfoArgs),
    /// Request a trimmed clip
    Clip(args::ClipArgs),
    /// Interactive session: check, adjust, submit, save
    Session,
}
