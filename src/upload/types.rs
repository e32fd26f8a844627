//! Types for image uploads

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Error;

/// Response of a successful Cloudinary upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedImage {
    /// Publicly retrievable HTTPS URL
    pub secure_url: String,

    /// Cloudinary identifier
    #[serde(default)]
    pub public_id: String,

    /// Image format, e.g. `jpg`
    #[serde(default)]
    pub format: String,

    /// Resource type, normally `image`
    #[serde(default)]
    pub resource_type: String,
}

/// An image picked from the camera or the gallery
#[derive(Debug, Clone)]
pub struct ImageFile {
    /// Raw image bytes
    pub bytes: Vec<u8>,

    /// File name sent with the multipart part
    pub file_name: String,

    /// MIME type sent with the multipart part
    pub mime_type: String,
}

impl ImageFile {
    /// Wrap in-memory JPEG data the way the camera hands it over
    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: "document.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
        }
    }

    /// Read an image from disk, guessing the MIME type from the extension
    pub async fn from_path(path: &Path) -> Result<Self, Error> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "document.jpg".to_string());
        let mime_type = mime_for(path).to_string();

        Ok(Self {
            bytes,
            file_name,
            mime_type,
        })
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "heic" => "image/heic",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}
