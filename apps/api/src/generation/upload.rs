//! Multipart form collection for the file-upload capabilities.

use std::collections::HashMap;

use axum::extract::{multipart::MultipartError, Multipart};
use axum::http::StatusCode;
use bytes::Bytes;
use tracing::warn;

use crate::errors::AppError;

/// A file received from the client, held in memory for the request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Files and text fields of a multipart body, keyed by field name.
#[derive(Debug, Default)]
pub struct UploadForm {
    files: HashMap<String, UploadedFile>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Collects the whole body. A body over the router's limit is reported
    /// with `too_large` instead of the generic stream error.
    pub async fn read(multipart: Multipart, too_large: &str) -> Result<Self, AppError> {
        Self::collect(multipart).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                warn!("Upload rejected by body limit: {}", e.body_text());
                AppError::Validation(too_large.to_string())
            } else {
                AppError::from(e)
            }
        })
    }

    async fn collect(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field.bytes().await?;
                    form.files.insert(name, UploadedFile { file_name, bytes });
                }
                None => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    /// Removes and returns the file under `name`, or a validation error naming it.
    pub fn take_file(&mut self, name: &str) -> Result<UploadedFile, AppError> {
        self.files
            .remove(name)
            .filter(|f| !f.bytes.is_empty())
            .ok_or_else(|| {
                AppError::Validation(format!("Please upload a file in the '{name}' field"))
            })
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    #[cfg(test)]
    pub fn from_parts(files: Vec<(&str, UploadedFile)>, fields: Vec<(&str, &str)>) -> Self {
        Self {
            files: files
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}
