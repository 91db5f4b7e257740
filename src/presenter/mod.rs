//! Request status presentation
//!
//! Each operation owns one panel: [`MetadataPanel`] for metadata fetches and
//! [`ClipPanel`] for clip requests. A panel is a small state machine over
//! [`RequestStatus`] plus the controls and display areas it drives. Panels
//! change only through `begin`, `reject` and `apply`, so the whole flow can
//! be exercised without a terminal.

use serde::Serialize;

use crate::domain::errors::ClientError;
use crate::domain::model::*;

pub mod render;

pub const CHECK_IDLE_LABEL: &str = "🔍 Vérifier";
pub const CHECK_BUSY_LABEL: &str = "⏳...";
pub const SUBMIT_IDLE_LABEL: &str = "Extraire la séquence";
pub const SUBMIT_BUSY_LABEL: &str = "Traitement en cours...";

pub const INFO_FALLBACK_MESSAGE: &str = "Erreur lors de la récupération des infos.";
pub const CLIP_FALLBACK_MESSAGE: &str = "Une erreur est survenue.";
pub const CLIP_SUCCESS_MESSAGE: &str = "Séquence extraite avec succès !";

/// Trigger button of an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlState {
    pub enabled: bool,
    pub label: String,
    #[serde(skip)]
    idle_label: &'static str,
}

impl ControlState {
    fn new(idle_label: &'static str) -> Self {
        Self {
            enabled: true,
            label: idle_label.to_string(),
            idle_label,
        }
    }

    fn busy(&mut self, label: &str) {
        self.enabled = false;
        self.label = label.to_string();
    }

    fn restore(&mut self) {
        self.enabled = true;
        self.label = self.idle_label.to_string();
    }
}

/// Media player showing the produced clip
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerState {
    pub src: Option<String>,
    pub visible: bool,
    pub playing: bool,
}

impl PlayerState {
    /// Pause, drop the source and hide the player
    fn stop(&mut self) {
        self.playing = false;
        self.src = None;
        self.visible = false;
    }

    fn load(&mut self, src: &str) {
        self.src = Some(src.to_string());
        self.visible = true;
    }

    /// Start playback of the loaded source, if any
    pub fn play(&mut self) -> bool {
        self.playing = self.src.is_some();
        self.playing
    }
}

/// Identifies one trigger of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Whether a completion reached the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Rendered,
    /// A newer trigger superseded this one
    Discarded,
}

/// Request generation counter. When `discard_stale` is off every completion
/// is accepted and the last one to arrive wins.
#[derive(Debug, Clone, Default)]
struct Generations {
    issued: u64,
    discard_stale: bool,
}

impl Generations {
    fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    fn accepts(&self, ticket: Ticket) -> bool {
        !self.discard_stale || ticket.0 == self.issued
    }
}

/// Display state of the metadata fetch
#[derive(Debug, Clone, Serialize)]
pub struct MetadataPanel {
    pub status: RequestStatus,
    pub control: ControlState,
    pub metadata: Option<VideoMetadata>,
    pub qualities: Vec<QualityOption>,
    #[serde(skip)]
    generations: Generations,
}

impl MetadataPanel {
    pub fn new(discard_stale: bool) -> Self {
        Self {
            status: RequestStatus::Idle,
            control: ControlState::new(CHECK_IDLE_LABEL),
            metadata: None,
            qualities: Vec::new(),
            generations: Generations {
                issued: 0,
                discard_stale,
            },
        }
    }

    /// Enter Pending. Previously shown metadata stays until the attempt resolves.
    pub fn begin(&mut self) -> Ticket {
        self.status = RequestStatus::Pending;
        self.control.busy(CHECK_BUSY_LABEL);
        self.generations.issue()
    }

    /// Precondition failed: show the error without ever going Pending
    pub fn reject(&mut self, error: &ClientError) {
        self.status = RequestStatus::Error(error.user_message(INFO_FALLBACK_MESSAGE));
    }

    /// Apply the outcome of the attempt identified by `ticket`
    pub fn apply(
        &mut self,
        ticket: Ticket,
        outcome: Result<ResolvedVideo, ClientError>,
    ) -> Applied {
        if !self.generations.accepts(ticket) {
            return Applied::Discarded;
        }

        match outcome {
            Ok(resolved) => {
                self.metadata = Some(resolved.metadata);
                self.qualities = resolved.qualities;
                self.status = RequestStatus::Success(None);
            }
            Err(err) => {
                // Stale metadata and options remain visible next to the error
                self.status = RequestStatus::Error(err.user_message(INFO_FALLBACK_MESSAGE));
            }
        }
        self.control.restore();
        Applied::Rendered
    }

    /// Value the quality selector falls back to after a fetch
    pub fn default_quality(&self) -> Option<&str> {
        self.qualities.first().map(|q| q.value.as_str())
    }
}

impl Default for MetadataPanel {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Display state of the clip request
#[derive(Debug, Clone, Serialize)]
pub struct ClipPanel {
    pub status: RequestStatus,
    pub control: ControlState,
    pub result: Option<ClipResult>,
    pub player: PlayerState,
    pub download_href: Option<String>,
    #[serde(skip)]
    generations: Generations,
}

impl ClipPanel {
    pub fn new(discard_stale: bool) -> Self {
        Self {
            status: RequestStatus::Idle,
            control: ControlState::new(SUBMIT_IDLE_LABEL),
            result: None,
            player: PlayerState::default(),
            download_href: None,
            generations: Generations {
                issued: 0,
                discard_stale,
            },
        }
    }

    fn clear_result(&mut self) {
        self.result = None;
        self.download_href = None;
        self.player.stop();
    }

    /// Enter Pending: hide the previous result and silence the player first
    pub fn begin(&mut self) -> Ticket {
        self.clear_result();
        self.status = RequestStatus::Pending;
        self.control.busy(SUBMIT_BUSY_LABEL);
        self.generations.issue()
    }

    /// Submission refused before dispatch
    pub fn reject(&mut self, error: &ClientError) {
        self.clear_result();
        self.status = RequestStatus::Error(error.user_message(CLIP_FALLBACK_MESSAGE));
    }

    /// Apply the outcome of the attempt identified by `ticket`
    pub fn apply(&mut self, ticket: Ticket, outcome: Result<ClipResult, ClientError>) -> Applied {
        if !self.generations.accepts(ticket) {
            return Applied::Discarded;
        }

        match outcome {
            Ok(result) => {
                self.player.load(&result.download_url);
                self.download_href = Some(result.download_url.clone());
                self.result = Some(result);
                self.status = RequestStatus::Success(Some(CLIP_SUCCESS_MESSAGE.to_string()));
            }
            Err(err) => {
                self.clear_result();
                self.status = RequestStatus::Error(err.user_message(CLIP_FALLBACK_MESSAGE));
            }
        }
        self.control.restore();
        Applied::Rendered
    }

    /// The result area is only visible after a successful request
    pub fn visible_result(&self) -> Option<&ClipResult> {
        if self.status.is_success() {
            self.result.as_ref()
        } else {
            None
        }
    }
}

impl Default for ClipPanel {
    fn default() -> Self {
        Self::new(false)
    }
}
