// Application layer - Use case interactors

pub mod clip_requester;
pub mod container;
pub mod metadata_resolver;

// Re-export interactors
pub use clip_requester::ClipRequester;
pub use container::{AppContainer, DefaultAppContainer};
pub use metadata_resolver::MetadataResolver;
