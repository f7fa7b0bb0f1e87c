//! Wire format of the `models/{model}:generateContent` endpoint.
//!
//! Only the fields the studio reads or writes are modelled; unknown response
//! fields are ignored so upstream additions do not break parsing.

use mockup_core::{ImagePayload, ImageSize};
use serde::{Deserialize, Serialize};

use crate::AiError;

/// Square output; mockups are previewed in a square frame.
pub const ASPECT_RATIO: &str = "1:1";

/// MIME type the upstream API returns edited and generated images in.
pub const RESPONSE_MIME: &str = "image/png";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// One piece of content: text or inline binary data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    /// Inline image part carrying the bare base64 body of `image`.
    pub fn image(image: &ImagePayload) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: RESPONSE_MIME.to_string(),
                data: image.base64_data().to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub image_size: ImageSize,
    pub aspect_ratio: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub image_config: ImageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Text-to-image request at the given size.
    pub fn generate(prompt: &str, size: ImageSize) -> Self {
        Self {
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(prompt)],
            }],
            generation_config: Some(GenerationConfig {
                image_config: ImageConfig {
                    image_size: size,
                    aspect_ratio: ASPECT_RATIO.to_string(),
                },
            }),
        }
    }

    /// Image + instruction request. The image goes first, then the instruction.
    pub fn edit(image: &ImagePayload, instruction: &str) -> Self {
        Self {
            contents: vec![Content {
                role: None,
                parts: vec![Part::image(image), Part::text(instruction)],
            }],
            generation_config: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Error body returned by the upstream API on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,
}

/// Pull the first inline image out of the first candidate.
///
/// `missing` becomes the error message when the response carries no image,
/// e.g. when the model answered with text only.
pub fn first_inline_image(
    response: &GenerateContentResponse,
    missing: &'static str,
) -> Result<ImagePayload, AiError> {
    let inline = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|content| content.parts.iter().find_map(|p| p.inline_data.as_ref()));

    match inline {
        Some(data) => Ok(ImagePayload::from_base64(RESPONSE_MIME, &data.data)?),
        None => {
            tracing::warn!(
                candidates = response.candidates.len(),
                "image service response has no inline image"
            );
            Err(AiError::NoImage(missing))
        }
    }
}

/// Best-effort message from an upstream error body.
pub fn upstream_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => body.trim().chars().take(200).collect(),
    }
}
