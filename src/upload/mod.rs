//! Document image uploads to Cloudinary

mod types;

use async_trait::async_trait;
use reqwest::{multipart, Client};

use crate::error::Error;
use crate::fetch::ensure_success;

pub use types::*;

/// Anything that can store an image and hand back a public URL
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Upload one image into `folder`
    async fn upload(&self, image: ImageFile, folder: &str) -> Result<UploadedImage, Error>;
}

/// Client for Cloudinary unsigned uploads
#[derive(Clone)]
pub struct CloudinaryUploader {
    /// Cloudinary API host
    base_url: String,

    /// Cloud name
    cloud_name: String,

    /// Unsigned upload preset
    upload_preset: String,

    /// HTTP client used for requests
    client: Client,
}

impl CloudinaryUploader {
    /// Create a new uploader
    pub fn new(base_url: &str, cloud_name: &str, upload_preset: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            cloud_name: cloud_name.to_string(),
            upload_preset: upload_preset.to_string(),
            client,
        }
    }

    fn get_url(&self) -> String {
        format!("{}/v1_1/{}/image/upload", self.base_url, self.cloud_name)
    }
}

#[async_trait]
impl ImageUploader for CloudinaryUploader {
    async fn upload(&self, image: ImageFile, folder: &str) -> Result<UploadedImage, Error> {
        let size = image.bytes.len();
        let part = multipart::Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.mime_type)?;

        let form = multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", folder.to_string());

        log::debug!("uploading {} bytes to folder {}", size, folder);

        let response = self
            .client
            .post(self.get_url())
            .multipart(form)
            .send()
            .await?;

        let response = ensure_success(response).await.map_err(|e| match e {
            Error::Request { status, message } => {
                Error::upload(format!("Upload failed with status {}: {}", status, message))
            }
            other => other,
        })?;

        let uploaded = response.json::<UploadedImage>().await?;
        log::info!("uploaded document image {}", uploaded.public_id);
        Ok(uploaded)
    }
}
