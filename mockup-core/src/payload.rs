//! Image payloads as they travel between the upload surface, the editor and the proxy.
//!
//! A payload is base64 image data, optionally carrying a `data:image/<fmt>;base64,`
//! header. Every consumer accepts both forms; `base64_data` and `to_data_url`
//! convert between them.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// MIME type assumed for payloads without a data-URL header.
pub const DEFAULT_MIME: &str = "image/png";

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";
const IMAGE_MIME_PREFIX: &str = "image/";

/// Encoded image, shared so that history snapshots clone cheaply.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImagePayload(Arc<str>);

impl ImagePayload {
    /// Accept a bare base64 body or a data URL.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, PayloadError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PayloadError::Empty);
        }
        if trimmed.starts_with(DATA_PREFIX) {
            split_data_url(trimmed)?;
        }
        Ok(Self(Arc::from(trimmed)))
    }

    /// Encode raw file bytes (an upload) as a data URL.
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Result<Self, PayloadError> {
        let mime = mime.trim().to_ascii_lowercase();
        if !is_image_mime(&mime) {
            tracing::warn!(mime = %mime, "rejecting non-image upload");
            return Err(PayloadError::NotAnImage { mime });
        }
        if bytes.is_empty() {
            return Err(PayloadError::Empty);
        }

        let encoded = BASE64.encode(bytes);
        tracing::debug!(mime = %mime, bytes = bytes.len(), "encoded upload as data url");
        Ok(Self(Arc::from(format!(
            "{DATA_PREFIX}{mime}{BASE64_MARKER}{encoded}"
        ))))
    }

    /// Wrap a bare base64 body returned by the image API.
    pub fn from_base64(mime: &str, data: &str) -> Result<Self, PayloadError> {
        if data.trim().is_empty() {
            return Err(PayloadError::Empty);
        }
        Self::parse(format!("{DATA_PREFIX}{mime}{BASE64_MARKER}{}", data.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_data_url(&self) -> bool {
        self.0.starts_with(DATA_PREFIX)
    }

    /// The base64 body with any data-URL header stripped.
    pub fn base64_data(&self) -> &str {
        match split_data_url(&self.0) {
            Ok((_, body)) if self.is_data_url() => body,
            _ => &self.0,
        }
    }

    /// Declared MIME type, `image/png` for bare payloads.
    pub fn mime_type(&self) -> &str {
        match split_data_url(&self.0) {
            Ok((mime, _)) if self.is_data_url() => mime,
            _ => DEFAULT_MIME,
        }
    }

    /// Always-prefixed form, suitable for an `<img src>` or a JSON response.
    pub fn to_data_url(&self) -> String {
        if self.is_data_url() {
            self.0.to_string()
        } else {
            format!("{DATA_PREFIX}{DEFAULT_MIME}{BASE64_MARKER}{}", self.0)
        }
    }

    /// Decode the base64 body into raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>, PayloadError> {
        BASE64
            .decode(self.base64_data())
            .map_err(|source| PayloadError::Base64 { source })
    }

    /// Length of the encoded text.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when both handles point at the same shared buffer.
    pub fn same_buffer(&self, other: &ImagePayload) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// Payloads run to megabytes; never dump them into logs.
impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("mime", &self.mime_type())
            .field("data_url", &self.is_data_url())
            .field("len", &self.len())
            .finish()
    }
}

impl TryFrom<String> for ImagePayload {
    type Error = PayloadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ImagePayload> for String {
    fn from(value: ImagePayload) -> Self {
        value.0.to_string()
    }
}

fn is_image_mime(mime: &str) -> bool {
    mime.len() > IMAGE_MIME_PREFIX.len() && mime.starts_with(IMAGE_MIME_PREFIX)
}

/// Split `data:<mime>;base64,<body>` into `(mime, body)`.
fn split_data_url(s: &str) -> Result<(&str, &str), PayloadError> {
    let rest = s
        .strip_prefix(DATA_PREFIX)
        .ok_or_else(|| malformed(s))?;
    let (mime, body) = rest.split_once(BASE64_MARKER).ok_or_else(|| malformed(s))?;
    if !is_image_mime(mime) {
        return Err(malformed(s));
    }
    if body.is_empty() {
        return Err(PayloadError::Empty);
    }
    Ok((mime, body))
}

fn malformed(s: &str) -> PayloadError {
    let header: String = s.chars().take(40).collect();
    PayloadError::MalformedHeader { header }
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("image payload is empty")]
    Empty,

    #[error("malformed data url header: {header}")]
    MalformedHeader { header: String },

    #[error("'{mime}' is not an image type")]
    NotAnImage { mime: String },

    #[error("invalid base64 image data: {source}")]
    Base64 {
        #[source]
        source: base64::DecodeError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn prefixed_and_bare_forms_share_a_body() {
        let prefixed = ImagePayload::parse("data:image/webp;base64,QUJD").unwrap();
        let bare = ImagePayload::parse("QUJD").unwrap();

        assert_eq!(prefixed.base64_data(), "QUJD");
        assert_eq!(bare.base64_data(), "QUJD");
        assert_eq!(prefixed.mime_type(), "image/webp");
        assert_eq!(bare.mime_type(), "image/png");
        assert_eq!(bare.to_data_url(), "data:image/png;base64,QUJD");
        assert_eq!(prefixed.to_data_url(), "data:image/webp;base64,QUJD");
    }

    #[test]
    fn rejects_empty_and_malformed() {
        assert!(matches!(ImagePayload::parse("   "), Err(PayloadError::Empty)));
        assert!(matches!(
            ImagePayload::parse("data:text/plain;base64,QUJD"),
            Err(PayloadError::MalformedHeader { .. })
        ));
        assert!(matches!(
            ImagePayload::parse("data:image/png,QUJD"),
            Err(PayloadError::MalformedHeader { .. })
        ));
        assert!(matches!(
            ImagePayload::parse("data:image/png;base64,"),
            Err(PayloadError::Empty)
        ));
    }

    #[test]
    fn upload_bytes_round_trip_through_decode() {
        let payload = ImagePayload::from_bytes("image/png", &PNG_MAGIC).unwrap();
        assert!(payload.is_data_url());
        assert_eq!(payload.decode().unwrap(), PNG_MAGIC.to_vec());
    }

    #[test]
    fn upload_rejects_non_image_mime() {
        let err = ImagePayload::from_bytes("application/pdf", b"%PDF").unwrap_err();
        assert!(matches!(err, PayloadError::NotAnImage { .. }));
        assert!(ImagePayload::from_bytes("image/", b"x").is_err());
    }

    #[test]
    fn decode_reports_bad_base64() {
        let payload = ImagePayload::parse("not*base64").unwrap();
        assert!(matches!(payload.decode(), Err(PayloadError::Base64 { .. })));
    }

    #[test]
    fn serde_uses_plain_string() {
        let payload = ImagePayload::parse("data:image/png;base64,QUJD").unwrap();
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, "\"data:image/png;base64,QUJD\"");
        let back: ImagePayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
        assert!(serde_json::from_str::<ImagePayload>("\"\"").is_err());
    }

    #[test]
    fn debug_does_not_leak_body() {
        let payload = ImagePayload::parse("data:image/png;base64,SECRETBODY").unwrap();
        let dbg = format!("{payload:?}");
        assert!(!dbg.contains("SECRETBODY"));
        assert!(dbg.contains("image/png"));
    }
}
