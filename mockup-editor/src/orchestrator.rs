//! Drives AI edits against the editor history.
//!
//! An edit is split into `begin_edit` and `complete_edit` so an event loop can
//! hand the request to a worker and come back later; `apply_edit` does both
//! inline. At most one edit is in flight: a second `begin_edit` while pending
//! is refused, and nothing is queued. History only changes on success, and the
//! base image is frozen while an edit is pending.

use mockup_ai::{AiError, ImageService};
use mockup_core::ImagePayload;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{EditorHistory, HistoryError};

/// Message shown to the user when an edit fails, whatever the cause.
pub const EDIT_FAILED_NOTICE: &str = "Failed to edit image.";

/// Message shown when a finished edit no longer applies to the displayed image.
pub const EDIT_DISCARDED_NOTICE: &str = "The image changed while editing; the edit was discarded.";

/// An edit that has been started and must be completed exactly once.
#[derive(Debug)]
pub struct EditTicket {
    id: u64,
    source: ImagePayload,
    instruction: String,
}

impl EditTicket {
    /// The image the edit applies to.
    pub fn source(&self) -> &ImagePayload {
        &self.source
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }
}

#[derive(Debug, Default)]
pub struct EditOrchestrator {
    history: EditorHistory,
    instruction: String,
    pending: Option<u64>,
    next_ticket: u64,
    notice: Option<String>,
}

impl EditOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &EditorHistory {
        &self.history
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn set_instruction(&mut self, text: impl Into<String>) {
        self.instruction = text.into();
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the "apply edit" control should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_pending() && !self.instruction.trim().is_empty() && self.history.present().is_some()
    }

    pub fn can_undo(&self) -> bool {
        !self.is_pending() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.is_pending() && self.history.can_redo()
    }

    /// Last user-facing error, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Load a new base image, dropping the undo/redo branches.
    pub fn select(&mut self, image: ImagePayload) -> Result<(), EditError> {
        if self.is_pending() {
            debug!("select refused: an edit is in flight");
            return Err(EditError::Busy);
        }
        self.history = self.history.select(image);
        Ok(())
    }

    /// Step back one edit. Does nothing while an edit is pending.
    pub fn undo(&mut self) {
        if self.is_pending() {
            debug!("undo ignored: an edit is in flight");
            return;
        }
        self.history = self.history.undo();
    }

    /// Step forward one edit. Does nothing while an edit is pending.
    pub fn redo(&mut self) {
        if self.is_pending() {
            debug!("redo ignored: an edit is in flight");
            return;
        }
        self.history = self.history.redo();
    }

    /// Validate locally and enter the pending state.
    pub fn begin_edit(&mut self) -> Result<EditTicket, EditError> {
        if self.pending.is_some() {
            debug!("edit refused: another edit is in flight");
            return Err(EditError::Busy);
        }

        let instruction = self.instruction.trim();
        if instruction.is_empty() {
            return Err(EditError::EmptyInstruction);
        }
        let source = self.history.present().cloned().ok_or(EditError::NoBaseImage)?;

        let id = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some(id);
        self.notice = None;

        info!(ticket = id, instruction = %instruction, "edit started");
        Ok(EditTicket {
            id,
            source,
            instruction: instruction.to_string(),
        })
    }

    /// Finish the in-flight edit with the service's answer.
    pub fn complete_edit(
        &mut self,
        ticket: EditTicket,
        result: Result<ImagePayload, AiError>,
    ) -> Result<(), EditError> {
        if self.pending != Some(ticket.id) {
            warn!(ticket = ticket.id, "completion for an edit that is not pending");
            return Err(EditError::UnknownTicket);
        }
        self.pending = None;

        let image = match result {
            Ok(image) => image,
            Err(err) => {
                error!(ticket = ticket.id, error = %err, "edit failed");
                self.notice = Some(EDIT_FAILED_NOTICE.to_string());
                return Err(EditError::Service(err));
            }
        };

        // the base is frozen while pending; this only trips if the history was swapped out
        let still_current = self
            .history
            .present()
            .is_some_and(|present| present.same_buffer(&ticket.source));
        if !still_current {
            warn!(ticket = ticket.id, "base image changed during edit; result dropped");
            self.notice = Some(EDIT_DISCARDED_NOTICE.to_string());
            return Err(EditError::BaseChanged);
        }

        self.history = self.history.commit(image)?;
        self.instruction.clear();
        info!(ticket = ticket.id, depth = self.history.depth(), "edit committed");
        Ok(())
    }

    /// Run one edit to completion against `service`.
    pub fn apply_edit(&mut self, service: &dyn ImageService) -> Result<(), EditError> {
        let ticket = self.begin_edit()?;
        let result = service.edit(ticket.source(), ticket.instruction());
        self.complete_edit(ticket, result)
    }
}

#[derive(Debug, Error)]
pub enum EditError {
    #[error("edit instruction is empty")]
    EmptyInstruction,

    #[error("select an image before editing")]
    NoBaseImage,

    #[error("an edit is already in progress")]
    Busy,

    #[error("no such edit in progress")]
    UnknownTicket,

    #[error("the base image changed while the edit was running")]
    BaseChanged,

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("edit request failed: {0}")]
    Service(#[from] AiError),
}
