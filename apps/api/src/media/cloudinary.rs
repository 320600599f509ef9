//! Signed uploads and derived delivery URLs for the cloud image host.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{ImageHost, MediaError, UploadedImage};

const UPLOAD_API_URL: &str = "https://api.cloudinary.com/v1_1";
const DELIVERY_URL: &str = "https://res.cloudinary.com";

#[derive(Clone)]
pub struct CloudinaryClient {
    client: Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

impl CloudinaryClient {
    pub fn new(client: Client, cloud_name: String, api_key: String, api_secret: String) -> Self {
        Self {
            client,
            cloud_name,
            api_key,
            api_secret,
        }
    }
}

#[async_trait]
impl ImageHost for CloudinaryClient {
    async fn upload(
        &self,
        image: Bytes,
        file_name: &str,
        transformation: Option<&str>,
    ) -> Result<UploadedImage, MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();

        let mut signed: Vec<(&'static str, String)> = vec![("timestamp", timestamp)];
        if let Some(t) = transformation {
            signed.push(("transformation", t.to_string()));
        }
        let signature = sign_params(&signed, &self.api_secret);

        let mut form = Form::new()
            .part(
                "file",
                Part::bytes(image.to_vec()).file_name(file_name.to_string()),
            )
            .text("api_key", self.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in signed {
            form = form.text(key, value);
        }

        let response = self
            .client
            .post(format!("{UPLOAD_API_URL}/{}/image/upload", self.cloud_name))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| {
                    v.pointer("/error/message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or(body);
            return Err(MediaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let uploaded: UploadResponse = serde_json::from_str(&body)?;
        debug!(public_id = %uploaded.public_id, "Image uploaded");

        Ok(UploadedImage {
            secure_url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    fn derived_url(&self, public_id: &str, transformation: &str) -> String {
        derived_url(&self.cloud_name, public_id, transformation)
    }
}

/// Request signature: parameters sorted by key, joined as `k=v&k=v`, secret
/// appended, SHA-256 hex digest.
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn derived_url(cloud_name: &str, public_id: &str, transformation: &str) -> String {
    format!("{DELIVERY_URL}/{cloud_name}/image/upload/{transformation}/{public_id}")
}
