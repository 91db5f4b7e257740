// Metadata resolver - Orchestrates the metadata fetch use case

use std::sync::Arc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Interactor resolving a source URL to metadata and quality options
pub struct MetadataResolver {
    service_port: Arc<dyn ClipServicePort>,
    log_port: Arc<dyn LogPort>,
}

impl MetadataResolver {
    /// Create new metadata resolver with injected ports
    pub fn new(service_port: Arc<dyn ClipServicePort>, log_port: Arc<dyn LogPort>) -> Self {
        Self {
            service_port,
            log_port,
        }
    }

    /// Resolve `raw_url`. An empty URL fails without touching the network.
    pub async fn resolve(&self, raw_url: &str) -> Result<ResolvedVideo, ClientError> {
        let url = match SourceUrl::parse(raw_url) {
            Ok(url) => url,
            Err(err) => {
                self.log_port.warn("Metadata lookup rejected: no URL given").await;
                return Err(err);
            }
        };

        self.log_port
            .info(&format!("Resolving metadata for: {}", url))
            .await;

        match self.service_port.fetch_info(&url).await {
            Ok(resolved) => {
                self.log_port
                    .log_event(
                        &LogEvent::new(LogLevel::Info, "Metadata resolved")
                            .with("title", &resolved.metadata.title)
                            .with("duration_seconds", resolved.metadata.duration_seconds)
                            .with("qualities", resolved.qualities.len()),
                    )
                    .await;
                let offered: Vec<&str> =
                    resolved.qualities.iter().map(|q| q.value.as_str()).collect();
                self.log_port
                    .debug(&format!("Offered qualities: [{}]", offered.join(", ")))
                    .await;
                Ok(resolved)
            }
            Err(err) => {
                self.log_port
                    .log_event(
                        &LogEvent::new(LogLevel::Warn, "Metadata lookup failed")
                            .with("kind", err.kind())
                            .with("error", &err),
                    )
                    .await;
                Err(err)
            }
        }
    }
}
