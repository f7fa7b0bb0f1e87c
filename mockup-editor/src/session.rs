//! Studio session: everything one browser tab holds.
//!
//! A session owns:
//! - the uploaded logo and the product it is previewed on
//! - the overlay styling for the preview
//! - the generation panel and its gallery
//! - the AI editor (history + compare + drop zone)
//!
//! Nothing here is persisted; a session lives as long as the tab.

use mockup_core::{Catalog, CatalogError, ImagePayload, MockupProduct, OverlayStyle, PixelRect};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    accept_upload, CompareMode, DropZone, EditError, EditOrchestrator, GenerationPanel, UploadError,
};

/// Which panel is on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudioView {
    #[default]
    Mockup,
    Generate,
    Edit,
}

#[derive(Debug)]
pub struct StudioSession {
    pub session_id: Uuid,
    view: StudioView,
    catalog: Catalog,
    selected_product: String,
    pub overlay: OverlayStyle,
    uploaded_logo: Option<ImagePayload>,
    pub generation: GenerationPanel,
    pub editor: EditOrchestrator,
    pub compare: CompareMode,
    pub drop_zone: DropZone,
}

impl StudioSession {
    /// Open a session on `catalog`, preselecting its first product.
    pub fn new(catalog: Catalog) -> Self {
        let selected_product = catalog.first().id.clone();
        let session_id = Uuid::new_v4();
        tracing::info!(
            session_id = %session_id,
            products = catalog.products().len(),
            "studio session opened"
        );

        Self {
            session_id,
            view: StudioView::default(),
            catalog,
            selected_product,
            overlay: OverlayStyle::default(),
            uploaded_logo: None,
            generation: GenerationPanel::new(),
            editor: EditOrchestrator::new(),
            compare: CompareMode::default(),
            drop_zone: DropZone::default(),
        }
    }

    pub fn view(&self) -> StudioView {
        self.view
    }

    pub fn set_view(&mut self, view: StudioView) {
        tracing::debug!(from = ?self.view, to = ?view, "switching view");
        self.compare.end();
        self.view = view;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selected_product(&self) -> &MockupProduct {
        self.catalog
            .get(&self.selected_product)
            .unwrap_or_else(|_| self.catalog.first())
    }

    pub fn select_product(&mut self, id: &str) -> Result<(), CatalogError> {
        self.catalog.get(id)?;
        self.selected_product = id.to_string();
        Ok(())
    }

    pub fn uploaded_logo(&self) -> Option<&ImagePayload> {
        self.uploaded_logo.as_ref()
    }

    /// File-picker upload. In the edit view the logo also becomes the editor's base image.
    ///
    /// The logo is kept even when the editor refuses it because an edit is pending.
    pub fn upload_logo(&mut self, mime: &str, bytes: &[u8]) -> Result<(), SessionError> {
        let logo = accept_upload(mime, bytes)?;
        self.uploaded_logo = Some(logo.clone());
        if self.view == StudioView::Edit {
            self.editor.select(logo)?;
        }
        Ok(())
    }

    /// A file dropped on the editor canvas becomes the editor's base image.
    pub fn drop_on_editor(&mut self, mime: &str, bytes: &[u8]) -> Result<(), SessionError> {
        self.drop_zone.on_drop();
        let image = accept_upload(mime, bytes)?;
        self.editor.select(image)?;
        Ok(())
    }

    /// Open the uploaded logo in the editor.
    pub fn edit_logo(&mut self) -> Result<(), SessionError> {
        let logo = self.uploaded_logo.clone().ok_or(SessionError::NoLogo)?;
        self.editor.select(logo)?;
        self.set_view(StudioView::Edit);
        Ok(())
    }

    /// Open the latest generated image in the editor.
    pub fn edit_generated(&mut self) -> Result<(), SessionError> {
        let image = self
            .generation
            .latest()
            .map(|g| g.image.clone())
            .ok_or(SessionError::NoGeneratedImage)?;
        self.editor.select(image)?;
        self.set_view(StudioView::Edit);
        Ok(())
    }

    /// What the editor canvas shows, honouring a held compare button.
    pub fn editor_display(&self) -> Option<&ImagePayload> {
        self.compare.display(self.editor.history())
    }

    /// Where the logo lands on the selected product photo.
    pub fn logo_placement(&self, photo_width: u32, photo_height: u32) -> PixelRect {
        self.selected_product()
            .logo_area
            .resolve(photo_width, photo_height)
    }
}

impl Default for StudioSession {
    fn default() -> Self {
        Self::new(Catalog::default())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("upload a logo first")]
    NoLogo,

    #[error("generate an image first")]
    NoGeneratedImage,

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Edit(#[from] EditError),
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G'];

    #[test]
    fn starts_on_first_product_in_mockup_view() {
        let session = StudioSession::default();
        assert_eq!(session.view(), StudioView::Mockup);
        assert_eq!(session.selected_product().id, "mug-1");
        assert!(session.editor_display().is_none());
    }

    #[test]
    fn select_unknown_product_keeps_current() {
        let mut session = StudioSession::default();
        assert!(session.select_product("hoodie").is_err());
        session.select_product("totebag-1").unwrap();
        assert_eq!(session.selected_product().name, "Canvas Tote Bag");
        assert_eq!(session.logo_placement(1000, 1000).x, 350);
    }

    #[test]
    fn upload_in_mockup_view_does_not_touch_editor() {
        let mut session = StudioSession::default();
        session.upload_logo("image/png", PNG).unwrap();
        assert!(session.uploaded_logo().is_some());
        assert!(session.editor.history().present().is_none());
    }

    #[test]
    fn upload_in_edit_view_selects_into_editor() {
        let mut session = StudioSession::default();
        session.set_view(StudioView::Edit);
        session.upload_logo("image/png", PNG).unwrap();
        assert_eq!(session.editor.history().present(), session.uploaded_logo());
    }

    #[test]
    fn edit_logo_requires_upload() {
        let mut session = StudioSession::default();
        assert!(matches!(session.edit_logo(), Err(SessionError::NoLogo)));
        assert!(matches!(
            session.edit_generated(),
            Err(SessionError::NoGeneratedImage)
        ));

        session.upload_logo("image/png", PNG).unwrap();
        session.edit_logo().unwrap();
        assert_eq!(session.view(), StudioView::Edit);
        assert_eq!(session.editor_display(), session.uploaded_logo());
    }

    #[test]
    fn loading_into_editor_refused_while_edit_pending() {
        let mut session = StudioSession::default();
        session.set_view(StudioView::Edit);
        session.drop_on_editor("image/png", PNG).unwrap();
        let base = session.editor.history().present().cloned();

        session.editor.set_instruction("make it blue");
        let _ticket = session.editor.begin_edit().unwrap();

        assert!(matches!(
            session.drop_on_editor("image/png", b"GIF89a"),
            Err(SessionError::Edit(EditError::Busy))
        ));
        assert!(matches!(
            session.upload_logo("image/png", b"AAA"),
            Err(SessionError::Edit(EditError::Busy))
        ));
        assert!(session.uploaded_logo().is_some());
        assert_eq!(session.editor.history().present().cloned(), base);
    }

    #[test]
    fn rejected_drop_still_clears_highlight() {
        let mut session = StudioSession::default();
        session.drop_zone.on_drag_enter(true);
        assert!(matches!(
            session.drop_on_editor("application/zip", b"PK"),
            Err(SessionError::Upload(_))
        ));
        assert!(!session.drop_zone.is_dragging());
        assert!(session.editor.history().present().is_none());
    }
}
