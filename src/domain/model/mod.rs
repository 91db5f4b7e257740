// Domain models - Core types exchanged with the clip service

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::ClientError;

/// Shown when a request is triggered without a source URL
pub const EMPTY_URL_MESSAGE: &str = "Veuillez entrer une URL d'abord.";

/// Title used when the clip endpoint does not name the artifact
pub const DEFAULT_CLIP_TITLE: &str = "Votre vidéo";

/// User-supplied video URL. Opaque apart from being non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SourceUrl(String);

impl SourceUrl {
    /// Accept any non-empty input verbatim; the remote endpoint judges the rest
    pub fn parse(raw: &str) -> Result<Self, ClientError> {
        if raw.is_empty() {
            return Err(ClientError::Validation(EMPTY_URL_MESSAGE.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Descriptive metadata of a source video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoMetadata {
    pub title: String,
    pub thumbnail_url: String,
    pub duration_seconds: u64,
}

impl VideoMetadata {
    pub fn minutes(&self) -> u64 {
        self.duration_seconds / 60
    }

    pub fn seconds(&self) -> u64 {
        self.duration_seconds % 60
    }

    /// Duration as displayed next to the title, e.g. `Durée: 2m 5s`
    pub fn duration_label(&self) -> String {
        format!("Durée: {}m {}s", self.minutes(), self.seconds())
    }
}

/// One selectable output quality. `value` is passed back to the clip endpoint untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityOption {
    pub value: String,
    pub label: String,
}

impl QualityOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Outcome of a successful metadata fetch; metadata and options travel together
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedVideo {
    pub metadata: VideoMetadata,
    pub qualities: Vec<QualityOption>,
}

/// Parameters of a clip submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipRequest {
    pub url: SourceUrl,
    /// Absent when no quality options were ever fetched
    pub quality: Option<String>,
    /// Time bounds are forwarded as typed; the endpoint validates the range
    pub start_time: String,
    pub end_time: String,
}

impl ClipRequest {
    pub fn new(
        url: SourceUrl,
        quality: Option<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            url,
            quality,
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    /// Form fields in the order the clip endpoint expects them
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![("url", self.url.as_str())];
        if let Some(quality) = &self.quality {
            fields.push(("quality", quality.as_str()));
        }
        fields.push(("start_time", self.start_time.as_str()));
        fields.push(("end_time", self.end_time.as_str()));
        fields
    }
}

/// Playable/downloadable artifact produced by the clip endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClipResult {
    pub title: String,
    pub duration_label: String,
    pub download_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

impl ClipResult {
    /// Build a result, substituting the placeholder title when none was given
    pub fn new(
        title: Option<String>,
        duration_label: impl Into<String>,
        download_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_CLIP_TITLE.to_string()),
            duration_label: duration_label.into(),
            download_url: download_url.into(),
            resolution: None,
        }
    }

    pub fn with_resolution(mut self, resolution: Option<String>) -> Self {
        self.resolution = resolution;
        self
    }
}

/// Lifecycle of one operation as seen by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Error(String),
    /// Carries the confirmation text, if the operation shows one
    Success(Option<String>),
}

impl RequestStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestStatus::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RequestStatus::Success(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            RequestStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }

    /// Text of whichever status affordance is currently visible
    pub fn visible_message(&self) -> Option<&str> {
        match self {
            RequestStatus::Error(msg) => Some(msg),
            RequestStatus::Success(Some(msg)) => Some(msg),
            _ => None,
        }
    }
}
