//! Saving images out of the studio.

use anyhow::Context;
use std::fs;
use std::path::Path;

use crate::ImagePayload;

/// File name used when saving an edited image.
pub const EDITED_FILE_NAME: &str = "edited-image.png";

/// What is being saved; decides the suggested file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// A fresh generation, stamped with unix milliseconds.
    Generated { unix_millis: u128 },
    Edited,
}

impl ExportKind {
    pub fn generated_now() -> Self {
        let unix_millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        ExportKind::Generated { unix_millis }
    }

    pub fn file_name(&self) -> String {
        match self {
            ExportKind::Generated { unix_millis } => format!("generated-{unix_millis}.png"),
            ExportKind::Edited => EDITED_FILE_NAME.to_string(),
        }
    }
}

/// Decode a payload and write the raw image bytes to disk.
pub fn save_payload(path: impl AsRef<Path>, payload: &ImagePayload) -> anyhow::Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent dir: {}", parent.display()))?;
    }

    let bytes = payload.decode().context("decode image payload")?;
    fs::write(path, &bytes).with_context(|| format!("write image file: {}", path.display()))?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "image saved");
    Ok(())
}
