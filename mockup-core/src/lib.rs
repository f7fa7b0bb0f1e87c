//! mockup-core: shared value types for the mockup studio.
//!
//! Design rules:
//! - Image payloads are base64 text, with or without a `data:image/<fmt>;base64,` header.
//! - Styling parameters are bounded and clamped, never rejected.
//! - The catalog is plain data; nothing here talks to the network.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod catalog;
pub mod export;
pub mod overlay;
pub mod payload;

pub use catalog::{default_products, Catalog, CatalogError, LogoArea, MockupProduct, PixelRect};
pub use export::{save_payload, ExportKind, EDITED_FILE_NAME};
pub use overlay::{BlendMode, OverlayStyle};
pub use payload::{ImagePayload, PayloadError, DEFAULT_MIME};

/// A bounded scalar parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounded {
    pub value: f32,
    pub min: f32,
    pub max: f32,
}

impl Bounded {
    pub fn new(value: f32, min: f32, max: f32) -> Result<Self, ParamError> {
        if !(min < max) {
            return Err(ParamError::InvalidBounds { min, max });
        }
        Ok(Self { value, min, max }.clamped())
    }

    pub fn clamped(mut self) -> Self {
        if self.value.is_nan() {
            self.value = self.min;
        } else if self.value < self.min {
            self.value = self.min;
        } else if self.value > self.max {
            self.value = self.max;
        }
        self
    }

    /// Replace the value, clamping it into range.
    pub fn set(&mut self, value: f32) {
        self.value = value;
        *self = self.clamped();
    }
}

/// Errors related to bounded parameters.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("invalid bounds: min={min} max={max}")]
    InvalidBounds { min: f32, max: f32 },
}

/// Output size hint for image generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl ImageSize {
    pub const ALL: [ImageSize; 3] = [ImageSize::OneK, ImageSize::TwoK, ImageSize::FourK];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::OneK => "1K",
            ImageSize::TwoK => "2K",
            ImageSize::FourK => "4K",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown image size '{0}' (expected 1K, 2K or 4K)")]
pub struct UnknownImageSize(pub String);

impl FromStr for ImageSize {
    type Err = UnknownImageSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageSize::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownImageSize(s.to_string()))
    }
}
