// Drag-and-drop target state and upload validation.
//
// Enter/leave events fire for every nested element under the pointer, so the
// "dragging" highlight is driven by a depth counter rather than the last event.

use mockup_core::{ImagePayload, PayloadError};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropZone {
    depth: u32,
    dragging: bool,
}

impl DropZone {
    /// `dragenter`. `carries_items` is false for drags with nothing attached.
    pub fn on_drag_enter(&mut self, carries_items: bool) {
        self.depth = self.depth.saturating_add(1);
        if carries_items {
            self.dragging = true;
        }
        trace!(depth = self.depth, dragging = self.dragging, "drag enter");
    }

    /// `dragleave`. The highlight clears only once every enter is matched.
    pub fn on_drag_leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.dragging = false;
        }
        trace!(depth = self.depth, dragging = self.dragging, "drag leave");
    }

    /// `drop`. Always resets, whatever the counter says.
    pub fn on_drop(&mut self) {
        trace!(depth = self.depth, "drop");
        self.depth = 0;
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }
}

/// Turn a picked or dropped file into a payload. Only `image/*` is accepted.
pub fn accept_upload(mime: &str, bytes: &[u8]) -> Result<ImagePayload, UploadError> {
    let payload = ImagePayload::from_bytes(mime, bytes)?;
    debug!(mime = %mime, bytes = bytes.len(), "upload accepted");
    Ok(payload)
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload rejected: {0}")]
    Rejected(#[from] PayloadError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_enter_leave_keeps_highlight() {
        let mut zone = DropZone::default();
        zone.on_drag_enter(true); // outer
        zone.on_drag_enter(true); // child
        zone.on_drag_leave(); // leaving outer for child
        assert!(zone.is_dragging());
        assert_eq!(zone.depth(), 1);

        zone.on_drag_leave();
        assert!(!zone.is_dragging());
        assert_eq!(zone.depth(), 0);
    }

    #[test]
    fn drop_resets_unconditionally() {
        let mut zone = DropZone::default();
        zone.on_drag_enter(true);
        zone.on_drag_enter(true);
        zone.on_drag_enter(true);
        zone.on_drop();
        assert_eq!(zone, DropZone::default());
    }

    #[test]
    fn empty_drag_does_not_highlight() {
        let mut zone = DropZone::default();
        zone.on_drag_enter(false);
        assert!(!zone.is_dragging());
        assert_eq!(zone.depth(), 1);
    }

    #[test]
    fn stray_leave_does_not_underflow() {
        let mut zone = DropZone::default();
        zone.on_drag_leave();
        assert_eq!(zone.depth(), 0);
    }

    #[test]
    fn uploads_must_be_images() {
        assert!(accept_upload("image/jpeg", b"\xff\xd8\xff").is_ok());
        assert!(accept_upload("text/plain", b"hello").is_err());
        assert!(accept_upload("image/png", b"").is_err());
    }
}
