//! Text-to-image generation panel.
//!
//! Generation is independent of the editor history: a result becomes a
//! candidate that the user may load into the editor explicitly.

use mockup_ai::{AiError, ImageService};
use mockup_core::{ExportKind, ImagePayload, ImageSize};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Message shown to the user when generation fails.
pub const GENERATE_FAILED_NOTICE: &str =
    "Failed to generate image. Ensure you've selected a billing project if requested.";

/// Results kept in the gallery; the oldest is dropped past this.
pub const GALLERY_LIMIT: usize = 20;

/// A finished generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedImage {
    pub id: Uuid,
    pub image: ImagePayload,
    pub prompt: String,
    /// Unix milliseconds.
    pub created_at: u64,
}

impl GeneratedImage {
    /// Download naming for this result, stamped with its creation time.
    pub fn export_kind(&self) -> ExportKind {
        ExportKind::Generated {
            unix_millis: u128::from(self.created_at),
        }
    }
}

#[derive(Debug)]
pub struct GenerateTicket {
    id: u64,
    prompt: String,
    size: ImageSize,
}

impl GenerateTicket {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }
}

#[derive(Debug, Default)]
pub struct GenerationPanel {
    prompt: String,
    size: ImageSize,
    pending: Option<u64>,
    next_ticket: u64,
    notice: Option<String>,
    /// Newest last.
    gallery: Vec<GeneratedImage>,
}

impl GenerationPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn set_size(&mut self, size: ImageSize) {
        self.size = size;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// The most recent result, offered for download or editing.
    pub fn latest(&self) -> Option<&GeneratedImage> {
        self.gallery.last()
    }

    pub fn gallery(&self) -> &[GeneratedImage] {
        &self.gallery
    }

    pub fn find(&self, id: Uuid) -> Option<&GeneratedImage> {
        self.gallery.iter().find(|g| g.id == id)
    }

    /// Drop one result from the gallery.
    pub fn remove(&mut self, id: Uuid) -> Option<GeneratedImage> {
        let index = self.gallery.iter().position(|g| g.id == id)?;
        Some(self.gallery.remove(index))
    }

    pub fn begin_generate(&mut self) -> Result<GenerateTicket, GenerateError> {
        if self.pending.is_some() {
            return Err(GenerateError::Busy);
        }
        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            return Err(GenerateError::EmptyPrompt);
        }

        let id = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some(id);
        self.notice = None;

        tracing::info!(ticket = id, size = %self.size, "generation started");
        Ok(GenerateTicket {
            id,
            prompt: prompt.to_string(),
            size: self.size,
        })
    }

    pub fn complete_generate(
        &mut self,
        ticket: GenerateTicket,
        result: Result<ImagePayload, AiError>,
    ) -> Result<&GeneratedImage, GenerateError> {
        if self.pending != Some(ticket.id) {
            return Err(GenerateError::UnknownTicket);
        }
        self.pending = None;

        let image = result.map_err(|err| {
            tracing::error!(ticket = ticket.id, error = %err, "generation failed");
            self.notice = Some(GENERATE_FAILED_NOTICE.to_string());
            GenerateError::Service(err)
        })?;

        let created_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();

        let generated = GeneratedImage {
            id: Uuid::new_v4(),
            image,
            prompt: ticket.prompt,
            created_at,
        };
        if self.gallery.len() >= GALLERY_LIMIT {
            let dropped = self.gallery.remove(0);
            tracing::debug!(id = %dropped.id, "gallery full; oldest result dropped");
        }
        tracing::info!(id = %generated.id, gallery = self.gallery.len() + 1, "generation finished");
        self.gallery.push(generated);

        self.gallery.last().ok_or(GenerateError::UnknownTicket)
    }

    /// Run one generation to completion against `service`.
    pub fn generate(&mut self, service: &dyn ImageService) -> Result<&GeneratedImage, GenerateError> {
        let ticket = self.begin_generate()?;
        let result = service.generate(ticket.prompt(), ticket.size());
        self.complete_generate(ticket, result)
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("prompt is required")]
    EmptyPrompt,

    #[error("a generation is already in progress")]
    Busy,

    #[error("no such generation in progress")]
    UnknownTicket,

    #[error("generation request failed: {0}")]
    Service(#[from] AiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedService(Result<&'static str, u16>);

    impl ImageService for FixedService {
        fn generate(&self, prompt: &str, size: ImageSize) -> Result<ImagePayload, AiError> {
            assert_eq!(prompt, "retro fox logo");
            assert_eq!(size, ImageSize::TwoK);
            match self.0 {
                Ok(data) => Ok(ImagePayload::parse(data).unwrap()),
                Err(status) => Err(AiError::Upstream {
                    status,
                    message: "boom".into(),
                }),
            }
        }

        fn edit(&self, _image: &ImagePayload, _instruction: &str) -> Result<ImagePayload, AiError> {
            unreachable!("panel never edits")
        }
    }

    fn panel() -> GenerationPanel {
        let mut panel = GenerationPanel::new();
        panel.set_prompt("  retro fox logo ");
        panel.set_size(ImageSize::TwoK);
        panel
    }

    #[test]
    fn empty_prompt_rejected() {
        let mut panel = GenerationPanel::new();
        assert!(matches!(panel.begin_generate(), Err(GenerateError::EmptyPrompt)));
        assert!(!panel.is_pending());
    }

    #[test]
    fn success_lands_in_gallery() {
        let mut panel = panel();
        let id = panel.generate(&FixedService(Ok("R0VO"))).unwrap().id;

        assert_eq!(panel.gallery().len(), 1);
        assert_eq!(panel.latest().unwrap().prompt, "retro fox logo");
        assert_eq!(panel.find(id).unwrap().image.as_str(), "R0VO");
        // prompt stays for another round
        assert_eq!(panel.prompt(), "  retro fox logo ");
    }

    #[test]
    fn created_at_is_unix_millis() {
        let mut panel = panel();
        let generated = panel.generate(&FixedService(Ok("R0VO"))).unwrap().clone();

        // 2001-09-09 in millis; seconds would be four digits shorter
        assert!(generated.created_at > 1_000_000_000_000);
        assert_eq!(
            generated.export_kind().file_name(),
            format!("generated-{}.png", generated.created_at)
        );
    }

    #[test]
    fn gallery_is_capped_and_removable() {
        let mut panel = panel();
        let service = FixedService(Ok("R0VO"));
        let first = panel.generate(&service).unwrap().id;
        for _ in 1..GALLERY_LIMIT {
            panel.generate(&service).unwrap();
        }
        assert_eq!(panel.gallery().len(), GALLERY_LIMIT);
        assert!(panel.find(first).is_some());

        let newest = panel.generate(&service).unwrap().id;
        assert_eq!(panel.gallery().len(), GALLERY_LIMIT);
        assert!(panel.find(first).is_none());

        let removed = panel.remove(newest).unwrap();
        assert_eq!(removed.id, newest);
        assert_eq!(panel.gallery().len(), GALLERY_LIMIT - 1);
        assert!(panel.remove(newest).is_none());
    }

    #[test]
    fn failure_sets_notice_and_keeps_gallery() {
        let mut panel = panel();
        assert!(panel.generate(&FixedService(Err(500))).is_err());
        assert!(panel.gallery().is_empty());
        assert_eq!(panel.notice(), Some(GENERATE_FAILED_NOTICE));
        assert!(!panel.is_pending());
    }

    #[test]
    fn busy_while_pending() {
        let mut panel = panel();
        let ticket = panel.begin_generate().unwrap();
        assert!(matches!(panel.begin_generate(), Err(GenerateError::Busy)));
        panel
            .complete_generate(ticket, Ok(ImagePayload::parse("R0VO").unwrap()))
            .unwrap();
        assert!(!panel.is_pending());
    }
}
