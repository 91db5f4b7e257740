// Domain errors - Failure taxonomy for the metadata and clip operations

use thiserror::Error;

/// Every way a metadata fetch or clip request can fail
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Precondition failed before any network call
    #[error("{0}")]
    Validation(String),

    /// Request could not complete (unreachable host, timeout, broken body)
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Endpoint answered with a non-success status
    #[error("Remote error (status {status}){}", .detail.as_ref().map(|d| format!(": {}", d)).unwrap_or_default())]
    Remote { status: u16, detail: Option<String> },

    /// Success status but the body is missing expected fields
    #[error("Unexpected response shape: {0}")]
    Shape(String),

    /// Downloaded artifact could not be written locally
    #[error("Local I/O failure: {0}")]
    Io(String),
}

impl ClientError {
    /// Message shown to the user for this failure.
    ///
    /// Validation messages and remote `detail` fields are shown verbatim.
    /// Everything else collapses to the operation's fallback text.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Remote {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ClientError::Io(msg) => msg.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Short name of the error kind, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "validation",
            ClientError::Transport(_) => "transport",
            ClientError::Remote { .. } => "remote",
            ClientError::Shape(_) => "shape",
            ClientError::Io(_) => "io",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: &str = "Une erreur est survenue.";

    #[test]
    fn test_remote_detail_is_shown_verbatim() {
        let err = ClientError::Remote {
            status: 400,
            detail: Some("Invalid URL".to_string()),
        };
        assert_eq!(err.user_message(FALLBACK), "Invalid URL");
    }

    #[test]
    fn test_remote_without_detail_uses_fallback() {
        let err = ClientError::Remote {
            status: 500,
            detail: None,
        };
        assert_eq!(err.user_message(FALLBACK), FALLBACK);
    }

    #[test]
    fn test_transport_and_shape_use_fallback() {
        let transport = ClientError::Transport("connection refused".to_string());
        let shape = ClientError::Shape("missing field `title`".to_string());
        assert_eq!(transport.user_message(FALLBACK), FALLBACK);
        assert_eq!(shape.user_message(FALLBACK), FALLBACK);
    }

    #[test]
    fn test_validation_message_is_kept() {
        let err = ClientError::Validation("Veuillez entrer une URL d'abord.".to_string());
        assert_eq!(err.user_message(FALLBACK), "Veuillez entrer une URL d'abord.");
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn test_remote_display_includes_status() {
        let err = ClientError::Remote {
            status: 404,
            detail: Some("File not found or expired.".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Remote error (status 404): File not found or expired."
        );
        let bare = ClientError::Remote {
            status: 502,
            detail: None,
        };
        assert_eq!(bare.to_string(), "Remote error (status 502)");
    }
}
