// The image model boundary for the mockup studio.
// Defines the JSON we exchange with the generative image API, parses and validates it,
// and turns it into payloads the rest of the studio understands.

use mockup_core::{ImagePayload, ImageSize, PayloadError};
use thiserror::Error;

pub mod contract;
pub mod gemini;
pub mod proxy;

pub use contract::{
    first_inline_image, Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part,
};
pub use gemini::{GeminiClient, GeminiConfig, DEFAULT_API_BASE, DEFAULT_EDIT_MODEL, DEFAULT_GENERATE_MODEL};
pub use proxy::ProxyClient;

/// The two remote capabilities the studio consumes.
///
/// Implementations make exactly one request per call. Retrying is the caller's
/// decision, and the studio never retries.
pub trait ImageService {
    /// Create a new image from a text prompt.
    fn generate(&self, prompt: &str, size: ImageSize) -> Result<ImagePayload, AiError>;

    /// Apply a natural-language instruction to an existing image.
    fn edit(&self, image: &ImagePayload, instruction: &str) -> Result<ImagePayload, AiError>;
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("request to image service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("image service returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("could not parse image service response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    NoImage(&'static str),

    #[error("image service returned an invalid image: {0}")]
    InvalidImage(#[from] PayloadError),
}
