//! Clipper client library
//!
//! Two-phase client for a remote video clipping service: resolve metadata and
//! quality options for a source URL, then request a trimmed clip and present
//! the playable/downloadable result.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod presenter;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::ClientError;
pub use domain::model::{
    ClipRequest, ClipResult, QualityOption, RequestStatus, ResolvedVideo, SourceUrl, VideoMetadata,
};
pub use error::{AppError, AppResult};
