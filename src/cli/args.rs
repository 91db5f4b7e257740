//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Source video URL
    #[arg(short, long, default_value = "")]
    pub url: String,
}

/// Arguments for the clip command
#[derive(Args, Debug)]
pub struct ClipArgs {
    /// Source video URL
    #[arg(short, long, default_value = "")]
    pub url: String,

    /// Quality value as offered by `info` (service default when omitted)
    #[arg(short, long)]
    pub quality: Option<String>,

    /// Start time, forwarded as typed (e.g. 90, 01:30, 00:01:30)
    #[arg(short, long, default_value = "")]
    pub start: String,

    /// End time, forwarded as typed
    #[arg(short, long, default_value = "")]
    pub end: String,

    /// Download the produced clip to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
