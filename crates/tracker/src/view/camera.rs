//! Captured camera stills.
//!
//! A still is uploaded once, kept in the view state as a `data:` URL and
//! shown on the tracker page. It is never attached to an item or written to
//! the document store.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Content types the capture form may submit.
const ACCEPTED_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Why an uploaded still was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    /// No file was submitted.
    #[error("no image was submitted")]
    Empty,

    /// The still is larger than the configured limit.
    #[error("image is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    /// The upload is not an accepted image type.
    #[error("unsupported content type: {0}")]
    UnsupportedType(String),
}

/// A camera still held in the view state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedImage {
    pub content_type: String,
    pub data_url: String,
}

impl CapturedImage {
    /// Build a still from an uploaded file.
    ///
    /// # Errors
    ///
    /// Returns a [`CaptureError`] for empty, oversized or non-image uploads.
    pub fn from_upload(
        content_type: Option<&str>,
        bytes: &[u8],
        max_bytes: usize,
    ) -> Result<Self, CaptureError> {
        if bytes.is_empty() {
            return Err(CaptureError::Empty);
        }
        if bytes.len() > max_bytes {
            return Err(CaptureError::TooLarge {
                size: bytes.len(),
                limit: max_bytes,
            });
        }

        let content_type = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
            .unwrap_or_default();
        if !ACCEPTED_TYPES.contains(&content_type.as_str()) {
            return Err(CaptureError::UnsupportedType(content_type));
        }

        let data_url = format!("data:{content_type};base64,{}", STANDARD.encode(bytes));
        Ok(Self {
            content_type,
            data_url,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_png_becomes_data_url() {
        let image = CapturedImage::from_upload(Some("image/png"), b"\x89PNG", 1024).unwrap();
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.data_url, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_content_type_parameters_are_dropped() {
        let image =
            CapturedImage::from_upload(Some("Image/JPEG; charset=binary"), b"jpeg", 1024).unwrap();
        assert_eq!(image.content_type, "image/jpeg");
        assert!(image.data_url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_rejects_empty_large_and_foreign_uploads() {
        assert_eq!(
            CapturedImage::from_upload(Some("image/png"), b"", 1024),
            Err(CaptureError::Empty)
        );
        assert_eq!(
            CapturedImage::from_upload(Some("image/png"), &[0; 11], 10),
            Err(CaptureError::TooLarge {
                size: 11,
                limit: 10
            })
        );
        assert_eq!(
            CapturedImage::from_upload(Some("text/html"), b"<p>", 1024),
            Err(CaptureError::UnsupportedType("text/html".to_string()))
        );
        assert!(matches!(
            CapturedImage::from_upload(None, b"bytes", 1024),
            Err(CaptureError::UnsupportedType(_))
        ));
    }
}
