//! Request routing. Pure: bytes in, status + JSON out. The HTTP loop lives in `server`.

use mockup_ai::ImageService;
use mockup_core::{ImagePayload, ImageSize};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

pub const HEALTH_MESSAGE: &str = "MockupGenius API is running";

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// `None` for bodiless responses (preflight).
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, json!({ "error": message.into() }))
    }

    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    size: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EditRequest {
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    prompt: Option<String>,
}

/// Route one request.
pub fn handle(service: &dyn ImageService, method: &str, url: &str, body: &[u8]) -> ApiResponse {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        ("OPTIONS", _) => ApiResponse::no_content(),
        ("GET", "/health") => ApiResponse::json(200, json!({ "status": "ok", "message": HEALTH_MESSAGE })),
        ("POST", "/api/generate-image") => generate_image(service, body),
        ("POST", "/api/edit-image") => edit_image(service, body),
        _ => {
            warn!(method = method, path = path, "no such route");
            ApiResponse::error(404, "Not found")
        }
    }
}

fn parse_body<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<T, ApiResponse> {
    serde_json::from_slice(body).map_err(|err| {
        warn!(error = %err, "rejecting request body");
        if err.is_data() {
            // well-formed JSON with the wrong shape, e.g. `{"prompt": 5}`
            ApiResponse::error(400, format!("Invalid request body: {err}"))
        } else {
            ApiResponse::error(400, "Request body must be valid JSON")
        }
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn generate_image(service: &dyn ImageService, body: &[u8]) -> ApiResponse {
    let request: GenerateRequest = match parse_body(body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let Some(prompt) = non_blank(request.prompt) else {
        return ApiResponse::error(400, "Prompt is required");
    };
    let size = match request.size.as_deref().map(str::parse::<ImageSize>) {
        None => ImageSize::default(),
        Some(Ok(size)) => size,
        Some(Err(err)) => return ApiResponse::error(400, err.to_string()),
    };

    info!(prompt = %prompt, size = %size, "[generate]");
    match service.generate(&prompt, size) {
        Ok(image) => ApiResponse::json(200, json!({ "image": image.to_data_url() })),
        Err(err) => {
            error!(error = %err, "generate failed");
            ApiResponse::error(500, err.to_string())
        }
    }
}

fn edit_image(service: &dyn ImageService, body: &[u8]) -> ApiResponse {
    let request: EditRequest = match parse_body(body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let (Some(image), Some(prompt)) = (non_blank(request.image), non_blank(request.prompt)) else {
        return ApiResponse::error(400, "Image and Prompt are required");
    };
    let image = match ImagePayload::parse(image) {
        Ok(image) => image,
        Err(err) => return ApiResponse::error(400, format!("Invalid image: {err}")),
    };

    info!(prompt = %prompt, image = ?image, "[edit]");
    match service.edit(&image, &prompt) {
        Ok(edited) => ApiResponse::json(200, json!({ "image": edited.to_data_url() })),
        Err(err) => {
            error!(error = %err, "edit failed");
            ApiResponse::error(500, err.to_string())
        }
    }
}
