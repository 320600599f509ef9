use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart::Form, Client};
use serde_json::Value;
use tracing::debug;

use super::{ImageGenerator, MediaError};

const TEXT_TO_IMAGE_URL: &str = "https://clipdrop-api.co/text-to-image/v1";

#[derive(Clone)]
pub struct ClipDropClient {
    client: Client,
    api_key: String,
}

impl ClipDropClient {
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl ImageGenerator for ClipDropClient {
    async fn text_to_image(&self, prompt: &str) -> Result<Bytes, MediaError> {
        let form = Form::new().text("prompt", prompt.to_string());

        let response = self
            .client
            .post(TEXT_TO_IMAGE_URL)
            .header("x-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(body);
            return Err(MediaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let image = response.bytes().await?;
        debug!(bytes = image.len(), "Text-to-image call succeeded");
        Ok(image)
    }
}
