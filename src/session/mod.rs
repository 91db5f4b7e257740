//! Interactive clip session
//!
//! A session ties the user-editable form to the two operation panels. The
//! metadata and clip flows never touch each other's panel; the only thing the
//! metadata flow hands over is the quality selector default.

use serde::Serialize;

use crate::app::{ClipRequester, MetadataResolver};
use crate::domain::errors::ClientError;
use crate::domain::model::*;
use crate::presenter::{Applied, ClipPanel, MetadataPanel, Ticket};

pub mod interactive;

/// Values currently typed into the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClipForm {
    pub url: String,
    pub quality: Option<String>,
    pub start_time: String,
    pub end_time: String,
}

impl ClipForm {
    /// Snapshot the form as a clip request
    pub fn to_request(&self) -> Result<ClipRequest, ClientError> {
        let url = SourceUrl::parse(&self.url)?;
        Ok(ClipRequest::new(
            url,
            self.quality.clone(),
            self.start_time.clone(),
            self.end_time.clone(),
        ))
    }
}

/// Metadata fetch that passed its precondition and awaits dispatch
#[derive(Debug)]
pub struct PendingCheck {
    pub ticket: Ticket,
    pub url: SourceUrl,
}

/// Clip submission that passed its precondition and awaits dispatch
#[derive(Debug)]
pub struct PendingSubmit {
    pub ticket: Ticket,
    pub request: ClipRequest,
}

/// Form plus one panel per operation
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClipperSession {
    pub form: ClipForm,
    pub metadata: MetadataPanel,
    pub clip: ClipPanel,
}

impl ClipperSession {
    pub fn new(discard_stale: bool) -> Self {
        Self {
            form: ClipForm::default(),
            metadata: MetadataPanel::new(discard_stale),
            clip: ClipPanel::new(discard_stale),
        }
    }

    /// Trigger the metadata fetch. `None` means the URL was empty and the
    /// panel already shows the validation error.
    pub fn start_check(&mut self) -> Option<PendingCheck> {
        match SourceUrl::parse(&self.form.url) {
            Ok(url) => Some(PendingCheck {
                ticket: self.metadata.begin(),
                url,
            }),
            Err(err) => {
                self.metadata.reject(&err);
                None
            }
        }
    }

    /// Apply a metadata completion; a fresh option set resets the selector
    pub fn finish_check(
        &mut self,
        ticket: Ticket,
        outcome: Result<ResolvedVideo, ClientError>,
    ) -> Applied {
        let published = outcome.is_ok();
        let applied = self.metadata.apply(ticket, outcome);
        if applied == Applied::Rendered && published {
            self.form.quality = self.metadata.default_quality().map(str::to_string);
        }
        applied
    }

    /// Run the metadata flow to completion
    pub async fn check(&mut self, resolver: &MetadataResolver) -> Applied {
        let Some(pending) = self.start_check() else {
            return Applied::Rendered;
        };
        let outcome = resolver.resolve(pending.url.as_str()).await;
        self.finish_check(pending.ticket, outcome)
    }

    /// Trigger a clip submission from the current form values
    pub fn start_submit(&mut self) -> Option<PendingSubmit> {
        match self.form.to_request() {
            Ok(request) => Some(PendingSubmit {
                ticket: self.clip.begin(),
                request,
            }),
            Err(err) => {
                self.clip.reject(&err);
                None
            }
        }
    }

    pub fn finish_submit(
        &mut self,
        ticket: Ticket,
        outcome: Result<ClipResult, ClientError>,
    ) -> Applied {
        self.clip.apply(ticket, outcome)
    }

    /// Run the clip flow to completion
    pub async fn submit(&mut self, requester: &ClipRequester) -> Applied {
        let Some(pending) = self.start_submit() else {
            return Applied::Rendered;
        };
        let outcome = requester.request(pending.request).await;
        self.finish_submit(pending.ticket, outcome)
    }

    /// Pick a quality. Values outside the offered set are left to the endpoint to judge.
    pub fn select_quality(&mut self, value: &str) {
        self.form.quality = Some(value.to_string());
    }

    /// Whether the selected quality is one of the currently offered options
    pub fn quality_is_offered(&self) -> bool {
        match &self.form.quality {
            Some(value) => self.metadata.qualities.iter().any(|q| &q.value == value),
            None => false,
        }
    }
}
