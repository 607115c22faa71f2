//! Image-analysis exchange.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::request::HistoryEntry;

const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";
const DEFAULT_PROMPT: &str = "Please analyze this image.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRequest {
    pub image_base64: String,
    pub media_type: String,
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntry>,
}

impl ImageRequest {
    /// Encode raw image bytes for upload.
    pub fn from_bytes(bytes: &[u8], media_type: impl Into<String>) -> Self {
        Self {
            image_base64: STANDARD.encode(bytes),
            media_type: media_type.into(),
            message: DEFAULT_PROMPT.to_string(),
            conversation_history: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_history(mut self, history: Vec<HistoryEntry>) -> Self {
        self.conversation_history = history;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageResponse {
    pub analysis: String,
    /// Assistant phase that produced the analysis
    #[serde(default)]
    pub phase: String,
}

/// Guess the media type from a file extension, defaulting to JPEG.
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => DEFAULT_MEDIA_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_encodes_base64() {
        let request = ImageRequest::from_bytes(b"\x89PNG", "image/png");
        assert_eq!(request.image_base64, "iVBORw==");
        assert_eq!(request.message, DEFAULT_PROMPT);
    }

    #[test]
    fn test_media_type_for_path() {
        assert_eq!(media_type_for_path(Path::new("a/b/vase.PNG")), "image/png");
        assert_eq!(media_type_for_path(Path::new("x.webp")), "image/webp");
        assert_eq!(media_type_for_path(Path::new("photo.jpg")), "image/jpeg");
        assert_eq!(media_type_for_path(Path::new("noext")), "image/jpeg");
    }

    #[test]
    fn test_image_response_phase_default() {
        let response: ImageResponse =
            serde_json::from_str(r#"{"analysis": "Glazed ceramic"}"#).unwrap();
        assert_eq!(response.phase, "");
    }
}
