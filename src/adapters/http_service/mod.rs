// HTTP clip service adapter - Form-encoded calls to the info/clip endpoints via reqwest

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::error::{AppError, AppResult};
use crate::ports::*;

/// Endpoint layout of a clip service deployment
#[derive(Debug, Clone)]
pub struct ServiceEndpoints {
    pub base_url: String,
    pub info_path: String,
    pub clip_path: String,
    pub request_timeout: Option<Duration>,
}

/// Success body of the info endpoint
#[derive(Debug, Deserialize)]
struct InfoPayload {
    title: String,
    thumbnail: String,
    duration: f64,
    qualities: Vec<QualityOption>,
}

/// Success body of the clip endpoint
#[derive(Debug, Deserialize)]
struct ClipPayload {
    #[serde(default)]
    title: Option<String>,
    duration: DurationLabel,
    download_url: String,
    #[serde(default)]
    resolution: Option<String>,
}

/// The clip endpoint reports duration either as text or as a bare number
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DurationLabel {
    Text(String),
    Number(serde_json::Number),
}

impl DurationLabel {
    fn into_label(self) -> String {
        match self {
            DurationLabel::Text(text) => text,
            DurationLabel::Number(n) => n.to_string(),
        }
    }
}

/// Failure body; `detail` is only trusted when it is a non-empty string
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Clip service adapter backed by a shared reqwest client
pub struct HttpClipServiceAdapter {
    client: Client,
    base_url: Url,
    info_url: Url,
    clip_url: Url,
}

impl HttpClipServiceAdapter {
    /// Create new adapter for the given deployment
    pub fn new(endpoints: &ServiceEndpoints) -> AppResult<Self> {
        let base_url = Url::parse(&endpoints.base_url).map_err(|e| AppError::ConfigError {
            message: format!("Invalid base_url '{}': {}", endpoints.base_url, e),
        })?;
        let info_url = join_endpoint(&base_url, &endpoints.info_path)?;
        let clip_url = join_endpoint(&base_url, &endpoints.clip_path)?;

        let mut builder = Client::builder();
        if let Some(timeout) = endpoints.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| AppError::HttpClientError {
            message: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            info_url,
            clip_url,
        })
    }

    /// Resolve a possibly relative link against the service origin
    pub fn resolve_link(&self, link: &str) -> String {
        self.base_url
            .join(link)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| link.to_string())
    }

    /// POST form fields and return the status with the raw body
    async fn post_form(
        &self,
        url: &Url,
        fields: &[(&str, &str)],
    ) -> Result<(StatusCode, Vec<u8>), ClientError> {
        debug!(endpoint = %url, fields = fields.len(), "Dispatching form request");
        let response = self
            .client
            .post(url.clone())
            .form(fields)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        debug!(endpoint = %url, status = status.as_u16(), bytes = body.len(), "Response received");
        Ok((status, body.to_vec()))
    }
}

/// Build the error for a non-success response
fn remote_error(status: StatusCode, body: &[u8]) -> ClientError {
    let detail = serde_json::from_slice::<ErrorPayload>(body)
        .ok()
        .and_then(|payload| payload.detail)
        .and_then(|value| value.as_str().map(str::to_string))
        .filter(|detail| !detail.is_empty());
    ClientError::Remote {
        status: status.as_u16(),
        detail,
    }
}

fn join_endpoint(base_url: &Url, path: &str) -> AppResult<Url> {
    base_url.join(path).map_err(|e| AppError::ConfigError {
        message: format!("Invalid endpoint path '{}': {}", path, e),
    })
}

fn whole_seconds(duration: f64) -> Result<u64, ClientError> {
    if !duration.is_finite() || duration < 0.0 {
        return Err(ClientError::Shape(format!(
            "duration must be a non-negative number, got {}",
            duration
        )));
    }
    Ok(duration.trunc() as u64)
}

#[async_trait]
impl ClipServicePort for HttpClipServiceAdapter {
    async fn fetch_info(&self, url: &SourceUrl) -> Result<ResolvedVideo, ClientError> {
        let (status, body) = self.post_form(&self.info_url, &[("url", url.as_str())]).await?;
        if !status.is_success() {
            return Err(remote_error(status, &body));
        }

        let payload: InfoPayload =
            serde_json::from_slice(&body).map_err(|e| ClientError::Shape(e.to_string()))?;

        Ok(ResolvedVideo {
            metadata: VideoMetadata {
                title: payload.title,
                thumbnail_url: payload.thumbnail,
                duration_seconds: whole_seconds(payload.duration)?,
            },
            qualities: payload.qualities,
        })
    }

    async fn create_clip(&self, request: &ClipRequest) -> Result<ClipResult, ClientError> {
        let (status, body) = self.post_form(&self.clip_url, &request.form_fields()).await?;
        if !status.is_success() {
            return Err(remote_error(status, &body));
        }

        let payload: ClipPayload =
            serde_json::from_slice(&body).map_err(|e| ClientError::Shape(e.to_string()))?;

        let download_url = self.resolve_link(&payload.download_url);
        Ok(
            ClipResult::new(payload.title, payload.duration.into_label(), download_url)
                .with_resolution(payload.resolution),
        )
    }

    async fn download_artifact(
        &self,
        download_url: &str,
        destination: &Path,
    ) -> Result<u64, ClientError> {
        let target = self.resolve_link(download_url);
        debug!(url = %target, destination = %destination.display(), "Downloading artifact");

        let mut response = self
            .client
            .get(&target)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(|e| ClientError::Transport(e.to_string()))?;
            return Err(remote_error(status, &body));
        }

        let io_error = |action: &str, e: std::io::Error| {
            ClientError::Io(format!("Impossible de {} {} : {}", action, destination.display(), e))
        };

        // Staged next to the destination; dropped (and deleted) unless fully received
        let staging_dir = destination
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let (file, staged) = tempfile::NamedTempFile::new_in(staging_dir)
            .map_err(|e| io_error("créer", e))?
            .into_parts();
        let mut file = tokio::fs::File::from_std(file);

        let mut written = 0u64;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?
        {
            file.write_all(&chunk).await.map_err(|e| io_error("écrire", e))?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| io_error("écrire", e))?;
        drop(file);

        staged
            .persist(destination)
            .map_err(|e| io_error("écrire", e.error))?;

        Ok(written)
    }
}
