//! Terminal rendering of panels

use std::fmt;

use serde::Serialize;

use crate::domain::errors::ClientError;
use crate::domain::model::RequestStatus;
use crate::error::{AppError, AppResult};
use crate::presenter::{ClipPanel, ControlState, MetadataPanel};
use crate::session::ClipperSession;

/// How panels are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn parse(format: &str) -> Result<Self, ClientError> {
        match format.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(ClientError::Validation(format!(
                "Invalid output format: {}. Valid formats: text, json, yaml",
                other
            ))),
        }
    }

    pub fn render<T: Serialize + fmt::Display>(&self, value: &T) -> AppResult<String> {
        match self {
            OutputFormat::Text => Ok(value.to_string()),
            OutputFormat::Json => serde_json::to_string_pretty(value)
                .map(|mut s| {
                    s.push('\n');
                    s
                })
                .map_err(|e| AppError::RenderError {
                    message: format!("JSON serialization failed: {}", e),
                }),
            OutputFormat::Yaml => serde_yaml::to_string(value).map_err(|e| AppError::RenderError {
                message: format!("YAML serialization failed: {}", e),
            }),
        }
    }
}

fn write_control(f: &mut fmt::Formatter<'_>, control: &ControlState) -> fmt::Result {
    if control.enabled {
        writeln!(f, "[{}]", control.label)
    } else {
        writeln!(f, "[{}] (désactivé)", control.label)
    }
}

fn write_status(f: &mut fmt::Formatter<'_>, status: &RequestStatus) -> fmt::Result {
    match status {
        RequestStatus::Error(msg) => writeln!(f, "✖ {}", msg),
        RequestStatus::Success(Some(msg)) => writeln!(f, "✔ {}", msg),
        _ => Ok(()),
    }
}

impl fmt::Display for MetadataPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_control(f, &self.control)?;
        write_status(f, &self.status)?;

        if let Some(meta) = &self.metadata {
            writeln!(f, "{}", meta.title)?;
            writeln!(f, "{}", meta.duration_label())?;
            writeln!(f, "Miniature: {}", meta.thumbnail_url)?;
        }

        if !self.qualities.is_empty() {
            writeln!(f, "Qualités:")?;
            for quality in &self.qualities {
                writeln!(f, "  {} ({})", quality.label, quality.value)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ClipPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_control(f, &self.control)?;
        write_status(f, &self.status)?;

        if let Some(result) = self.visible_result() {
            writeln!(f, "{}", result.title)?;
            writeln!(f, "{}", result.duration_label)?;
            if let Some(resolution) = &result.resolution {
                writeln!(f, "Résolution: {}", resolution)?;
            }
        }
        if let Some(src) = self.player.src.as_deref().filter(|_| self.player.visible) {
            writeln!(f, "Lecteur: {}", src)?;
        }
        if let Some(href) = self.download_href.as_deref().filter(|_| self.status.is_success()) {
            writeln!(f, "Télécharger: {}", href)?;
        }
        Ok(())
    }
}

impl fmt::Display for ClipperSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = &self.form;
        writeln!(f, "URL: {}", form.url)?;
        writeln!(f, "Qualité: {}", form.quality.as_deref().unwrap_or("-"))?;
        writeln!(f, "Début: {}", form.start_time)?;
        writeln!(f, "Fin: {}", form.end_time)?;
        writeln!(f, "--")?;
        write!(f, "{}", self.metadata)?;
        writeln!(f, "--")?;
        write!(f, "{}", self.clip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::*;

    fn resolved() -> ResolvedVideo {
        ResolvedVideo {
            metadata: VideoMetadata {
                title: "Demo".to_string(),
                thumbnail_url: "https://x/t.jpg".to_string(),
                duration_seconds: 125,
            },
            qualities: vec![QualityOption::new("720p", "720p")],
        }
    }

    #[test]
    fn test_metadata_text_output() {
        let mut panel = MetadataPanel::default();
        let ticket = panel.begin();
        panel.apply(ticket, Ok(resolved()));

        let text = OutputFormat::Text.render(&panel).unwrap();
        assert_eq!(
            text,
            "[🔍 Vérifier]\nDemo\nDurée: 2m 5s\nMiniature: https://x/t.jpg\nQualités:\n  720p (720p)\n"
        );
    }

    #[test]
    fn test_pending_control_is_marked_disabled() {
        let mut panel = ClipPanel::default();
        panel.begin();
        let text = panel.to_string();
        assert_eq!(text, "[Traitement en cours...] (désactivé)\n");
    }

    #[test]
    fn test_clip_text_output() {
        let mut panel = ClipPanel::default();
        let ticket = panel.begin();
        panel.apply(
            ticket,
            Ok(ClipResult::new(None, "10s", "https://x/clip.mp4")),
        );
        let text = panel.to_string();
        assert!(text.contains("✔ Séquence extraite avec succès !"));
        assert!(text.contains("Votre vidéo\n10s\n"));
        assert!(text.contains("Lecteur: https://x/clip.mp4"));
        assert!(text.contains("Télécharger: https://x/clip.mp4"));
    }

    #[test]
    fn test_json_output_skips_internal_state() {
        let mut panel = MetadataPanel::default();
        let ticket = panel.begin();
        panel.apply(ticket, Ok(resolved()));

        let json: serde_json::Value =
            serde_json::from_str(&OutputFormat::Json.render(&panel).unwrap()).unwrap();
        assert_eq!(json["metadata"]["duration_seconds"], 125);
        assert_eq!(json["qualities"][0]["value"], "720p");
        assert_eq!(json["status"]["state"], "success");
        assert!(json.get("generations").is_none());
    }

    #[test]
    fn test_yaml_output() {
        let panel = ClipPanel::default();
        let yaml = OutputFormat::Yaml.render(&panel).unwrap();
        assert!(yaml.contains("state: idle"));
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(OutputFormat::parse("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("text").unwrap(), OutputFormat::Text);
        assert!(OutputFormat::parse("xml").is_err());
    }
}
