//! Direct client for the upstream generative image API. Used by the backend proxy;
//! the API key never leaves the server.

use mockup_core::{ImagePayload, ImageSize};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use std::time::{Duration, Instant};

use crate::contract::{first_inline_image, upstream_message, GenerateContentRequest, GenerateContentResponse};
use crate::{AiError, ImageService};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GENERATE_MODEL: &str = "gemini-3-pro-image-preview";
pub const DEFAULT_EDIT_MODEL: &str = "gemini-2.5-flash-image";

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub api_base: String,
    pub generate_model: String,
    pub edit_model: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            generate_model: DEFAULT_GENERATE_MODEL.to_string(),
            edit_model: DEFAULT_EDIT_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

pub struct GeminiClient {
    http: HttpClient,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let http = HttpClient::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            model.trim()
        )
    }

    fn call(&self, model: &str, request: &GenerateContentRequest) -> Result<GenerateContentResponse, AiError> {
        let started = Instant::now();
        let response = self
            .http
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        tracing::debug!(
            model = model,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = body.len(),
            "image service responded"
        );

        if !status.is_success() {
            let message = upstream_message(&body);
            tracing::error!(model = model, status = status.as_u16(), message = %message, "image service request failed");
            return Err(AiError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl ImageService for GeminiClient {
    fn generate(&self, prompt: &str, size: ImageSize) -> Result<ImagePayload, AiError> {
        let model = &self.config.generate_model;
        tracing::info!(model = %model, size = %size, "generating image");
        let response = self.call(model, &GenerateContentRequest::generate(prompt, size))?;
        first_inline_image(&response, "No image data found in response.")
    }

    fn edit(&self, image: &ImagePayload, instruction: &str) -> Result<ImagePayload, AiError> {
        let model = &self.config.edit_model;
        tracing::info!(model = %model, image = ?image, "editing image");
        let response = self.call(model, &GenerateContentRequest::edit(image, instruction))?;
        first_inline_image(&response, "No edited image returned.")
    }
}
