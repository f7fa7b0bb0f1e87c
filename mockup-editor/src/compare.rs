// Hold-to-compare: while held, the editor shows the state before the last edit.
// Purely a display toggle; the history is only ever read.

use mockup_core::ImagePayload;
use tracing::trace;

use crate::EditorHistory;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareMode {
    comparing: bool,
}

impl CompareMode {
    /// Press.
    pub fn start(&mut self) {
        trace!("compare start");
        self.comparing = true;
    }

    /// Release, or pointer left the control.
    pub fn end(&mut self) {
        trace!("compare end");
        self.comparing = false;
    }

    pub fn is_active(&self) -> bool {
        self.comparing
    }

    /// The image to show right now.
    pub fn display<'a>(&self, history: &'a EditorHistory) -> Option<&'a ImagePayload> {
        match history.previous() {
            Some(previous) if self.comparing => Some(previous),
            _ => history.present(),
        }
    }
}
