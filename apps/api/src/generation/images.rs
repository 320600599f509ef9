//! Image capabilities: text-to-image, background removal and object removal.
//!
//! The generated or uploaded image is always re-hosted on the image host; the
//! stored content is a delivery URL, never image bytes.

use serde::Deserialize;

use crate::errors::AppError;
use crate::generation::pipeline::Generated;
use crate::generation::upload::UploadedFile;
use crate::media::{ImageGenerator, ImageHost};

const BACKGROUND_REMOVAL: &str = "e_background_removal";
const GENERATED_FILE_NAME: &str = "generated.png";

pub const IMAGE_SIZE_LIMIT_MESSAGE: &str = "Image file size exceeds allowed size (10MB).";

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateImageRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub publish: Option<bool>,
}

pub async fn generate_image(
    generator: &dyn ImageGenerator,
    host: &dyn ImageHost,
    request: &GenerateImageRequest,
) -> Result<Generated, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("Please describe the image".to_string()));
    }

    let image = generator.text_to_image(&request.prompt).await?;
    let uploaded = host.upload(image, GENERATED_FILE_NAME, None).await?;

    Ok(Generated {
        prompt: request.prompt.clone(),
        content: uploaded.secure_url,
        publish: request.publish.unwrap_or(false),
    })
}

pub async fn remove_background(
    host: &dyn ImageHost,
    image: UploadedFile,
) -> Result<Generated, AppError> {
    let uploaded = host
        .upload(image.bytes, &image.file_name, Some(BACKGROUND_REMOVAL))
        .await?;

    Ok(Generated::new(
        "Remove background from the image",
        uploaded.secure_url,
    ))
}

pub async fn remove_object(
    host: &dyn ImageHost,
    image: UploadedFile,
    object: &str,
) -> Result<Generated, AppError> {
    let object = object.trim();
    if object.is_empty() {
        return Err(AppError::Validation(
            "Please name the object to remove".to_string(),
        ));
    }

    let uploaded = host.upload(image.bytes, &image.file_name, None).await?;
    let url = host.derived_url(&uploaded.public_id, &object_removal(object));

    Ok(Generated::new(format!("Removed {object} from image"), url))
}

/// Generative-remove transformation for `object`, escaped for use in a URL path.
pub fn object_removal(object: &str) -> String {
    format!("e_gen_remove:{}", urlencoding::encode(object))
}
