//! Client for the studio's own backend proxy (`/api/generate-image`, `/api/edit-image`).
//! This is what the editor talks to; it never sees the upstream API key.

use mockup_core::{ImagePayload, ImageSize};
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{AiError, ImageService};

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    prompt: &'a str,
    size: ImageSize,
}

#[derive(Debug, Serialize)]
struct EditBody<'a> {
    image: &'a str,
    prompt: &'a str,
}

/// Either `{image}` on success or `{error}` on failure.
#[derive(Debug, Deserialize)]
struct ProxyReply {
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct ProxyClient {
    http: HttpClient,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AiError> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn post<B: Serialize>(&self, path: &str, body: &B, missing: &'static str) -> Result<ImagePayload, AiError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        let reply: Option<ProxyReply> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let message = reply
                .and_then(|r| r.error)
                .unwrap_or_else(|| format!("proxy returned {}", status.as_u16()));
            tracing::error!(path = path, status = status.as_u16(), message = %message, "proxy request failed");
            return Err(AiError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        match reply.and_then(|r| r.image) {
            Some(image) => Ok(ImagePayload::parse(image)?),
            None => Err(AiError::NoImage(missing)),
        }
    }
}

impl ImageService for ProxyClient {
    fn generate(&self, prompt: &str, size: ImageSize) -> Result<ImagePayload, AiError> {
        self.post(
            "/api/generate-image",
            &GenerateBody { prompt, size },
            "No image data found in response.",
        )
    }

    fn edit(&self, image: &ImagePayload, instruction: &str) -> Result<ImagePayload, AiError> {
        self.post(
            "/api/edit-image",
            &EditBody {
                image: image.as_str(),
                prompt: instruction,
            },
            "No edited image returned.",
        )
    }
}
