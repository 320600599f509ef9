//! Image services: a text-to-image generator and a cloud image host.
//!
//! Both are traits carried in `AppState` as `Arc<dyn ...>`; the concrete
//! clients live in `clipdrop` and `cloudinary`.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod clipdrop;
pub mod cloudinary;

pub use clipdrop::ClipDropClient;
pub use cloudinary::CloudinaryClient;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected image API response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result of a successful upload to the image host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub secure_url: String,
    pub public_id: String,
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Renders `prompt` and returns the encoded image bytes.
    async fn text_to_image(&self, prompt: &str) -> Result<Bytes, MediaError>;
}

#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Uploads `image`, applying `transformation` to the stored asset when given.
    async fn upload(
        &self,
        image: Bytes,
        file_name: &str,
        transformation: Option<&str>,
    ) -> Result<UploadedImage, MediaError>;

    /// Delivery URL for `public_id` rendered through `transformation`.
    fn derived_url(&self, public_id: &str, transformation: &str) -> String;
}
