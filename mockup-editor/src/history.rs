// Undo/redo history for the image editor.
//
// The history is a value: every transition builds a new `EditorHistory` and the
// caller swaps it in whole. Payloads are shared buffers, so snapshots are cheap.

use mockup_core::ImagePayload;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorHistory {
    /// Oldest first.
    past: Vec<ImagePayload>,
    present: Option<ImagePayload>,
    /// Most recently undone first.
    future: Vec<ImagePayload>,
}

impl EditorHistory {
    /// A history with nothing selected yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start over from a new base image. Prior undo/redo branches are dropped.
    pub fn select(&self, image: ImagePayload) -> Self {
        debug!(
            dropped_past = self.past.len(),
            dropped_future = self.future.len(),
            image = ?image,
            "selecting new base image"
        );
        Self {
            past: Vec::new(),
            present: Some(image),
            future: Vec::new(),
        }
    }

    /// Record an edit result as the new present. Clears the redo branch.
    pub fn commit(&self, image: ImagePayload) -> Result<Self, HistoryError> {
        let present = self.present.as_ref().ok_or(HistoryError::NoBaseImage)?;

        if !self.future.is_empty() {
            debug!(discarded = self.future.len(), "commit discards redo branch");
        }

        let mut past = Vec::with_capacity(self.past.len() + 1);
        past.extend(self.past.iter().cloned());
        past.push(present.clone());

        trace!(depth = past.len(), "edit committed");
        Ok(Self {
            past,
            present: Some(image),
            future: Vec::new(),
        })
    }

    /// Step back one edit. No-op when there is nothing to undo.
    pub fn undo(&self) -> Self {
        let (Some((previous, rest)), Some(present)) = (self.past.split_last(), self.present.as_ref())
        else {
            debug!("undo ignored: nothing to undo");
            return self.clone();
        };

        let mut future = Vec::with_capacity(self.future.len() + 1);
        future.push(present.clone());
        future.extend(self.future.iter().cloned());

        trace!(past = rest.len(), future = future.len(), "undo");
        Self {
            past: rest.to_vec(),
            present: Some(previous.clone()),
            future,
        }
    }

    /// Re-apply the most recently undone edit. No-op when there is nothing to redo.
    pub fn redo(&self) -> Self {
        let (Some((next, rest)), Some(present)) = (self.future.split_first(), self.present.as_ref())
        else {
            debug!("redo ignored: nothing to redo");
            return self.clone();
        };

        let mut past = Vec::with_capacity(self.past.len() + 1);
        past.extend(self.past.iter().cloned());
        past.push(present.clone());

        trace!(past = past.len(), future = rest.len(), "redo");
        Self {
            past,
            present: Some(next.clone()),
            future: rest.to_vec(),
        }
    }

    pub fn past(&self) -> &[ImagePayload] {
        &self.past
    }

    pub fn present(&self) -> Option<&ImagePayload> {
        self.present.as_ref()
    }

    pub fn future(&self) -> &[ImagePayload] {
        &self.future
    }

    /// The state an undo would return to.
    pub fn previous(&self) -> Option<&ImagePayload> {
        self.past.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of states held, present included.
    pub fn depth(&self) -> usize {
        self.past.len() + self.future.len() + usize::from(self.present.is_some())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("no base image selected")]
    NoBaseImage,
}
