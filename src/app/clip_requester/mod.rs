// Clip requester - Orchestrates the clip request use case

use std::path::Path;
use std::sync::Arc;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Interactor submitting clip requests and fetching their artifacts
pub struct ClipRequester {
    service_port: Arc<dyn ClipServicePort>,
    log_port: Arc<dyn LogPort>,
}

impl ClipRequester {
    /// Create new clip requester with injected ports
    pub fn new(service_port: Arc<dyn ClipServicePort>, log_port: Arc<dyn LogPort>) -> Self {
        Self {
            service_port,
            log_port,
        }
    }

    /// Submit one clip request. Time bounds and quality are forwarded unchecked.
    pub async fn request(&self, params: ClipRequest) -> Result<ClipResult, ClientError> {
        self.log_port
            .log_event(
                &LogEvent::new(LogLevel::Info, "Submitting clip request")
                    .with("url", &params.url)
                    .with("quality", params.quality.as_deref().unwrap_or("<none>"))
                    .with("start_time", &params.start_time)
                    .with("end_time", &params.end_time),
            )
            .await;

        match self.service_port.create_clip(&params).await {
            Ok(result) => {
                self.log_port
                    .info(&format!(
                        "Clip ready: '{}' ({}) at {}",
                        result.title, result.duration_label, result.download_url
                    ))
                    .await;
                Ok(result)
            }
            Err(err) => {
                self.log_port
                    .log_event(
                        &LogEvent::new(LogLevel::Warn, "Clip request failed")
                            .with("kind", err.kind())
                            .with("error", &err),
                    )
                    .await;
                Err(err)
            }
        }
    }

    /// Download the artifact of a finished clip to `destination`
    pub async fn save(&self, result: &ClipResult, destination: &Path) -> Result<u64, ClientError> {
        self.log_port
            .info(&format!(
                "Saving {} to {}",
                result.download_url,
                destination.display()
            ))
            .await;

        let written = self
            .service_port
            .download_artifact(&result.download_url, destination)
            .await;

        match &written {
            Ok(bytes) => {
                self.log_port
                    .info(&format!("Saved {} bytes to {}", bytes, destination.display()))
                    .await
            }
            Err(err) => {
                self.log_port
                    .error(&format!("Saving clip failed: {}", err))
                    .await
            }
        }
        written
    }
}
