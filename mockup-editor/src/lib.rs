//! mockup-editor: client-side state of the mockup studio.
//!
//! The editor history is the only undoable state. It changes through exactly four
//! transitions (`select`, `commit`, `undo`, `redo`), each returning a fresh value.
//! Compare mode and drag highlighting are display state and never touch it.

pub mod compare;
pub mod drop_zone;
pub mod generation;
pub mod history;
pub mod orchestrator;
pub mod session;

pub use compare::CompareMode;
pub use drop_zone::{accept_upload, DropZone, UploadError};
pub use generation::{
    GenerateError, GenerateTicket, GeneratedImage, GenerationPanel, GALLERY_LIMIT, GENERATE_FAILED_NOTICE,
};
pub use history::{EditorHistory, HistoryError};
pub use orchestrator::{
    EditError, EditOrchestrator, EditTicket, EDIT_DISCARDED_NOTICE, EDIT_FAILED_NOTICE,
};
pub use session::{SessionError, StudioSession, StudioView};
