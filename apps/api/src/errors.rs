use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::identity::IdentityError;
use crate::llm_client::LlmError;
use crate::media::MediaError;

pub const QUOTA_EXCEEDED_MESSAGE: &str = "Limit Reached. Upgrade to continue";
pub const PREMIUM_REQUIRED_MESSAGE: &str =
    "This feature is only available for premium subscribers";

/// Application-level error type.
///
/// Every variant renders as `200 {"success": false, "message": ...}`: clients
/// read the outcome from the body, never from the status line.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Free usage quota exhausted")]
    QuotaExceeded,

    #[error("Premium plan required")]
    PremiumRequired,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("Database error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("Identity store error: {0}")]
    IdentityStore(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// The human-readable message returned to the client.
    pub fn client_message(&self) -> String {
        match self {
            AppError::QuotaExceeded => QUOTA_EXCEEDED_MESSAGE.to_string(),
            AppError::PremiumRequired => PREMIUM_REQUIRED_MESSAGE.to_string(),
            AppError::Validation(msg)
            | AppError::Unauthorized(msg)
            | AppError::Provider(msg)
            | AppError::EmptyResponse(msg) => msg.clone(),
            AppError::Persistence(_) => "Failed to save the generated content".to_string(),
            AppError::IdentityStore(_) => {
                "Could not load your account usage. Please try again.".to_string()
            }
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::QuotaExceeded | AppError::PremiumRequired | AppError::Validation(_) => {
                tracing::info!("Request rejected: {self}");
            }
            AppError::Unauthorized(msg) => tracing::warn!("Unauthorized request: {msg}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            _ => tracing::error!("{self}"),
        }

        let body = Json(json!({
            "success": false,
            "message": self.client_message(),
        }));

        (StatusCode::OK, body).into_response()
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::EmptyContent => {
                AppError::EmptyResponse("AI returned an empty response. Try again.".to_string())
            }
            LlmError::Api { message, .. } => AppError::Provider(message),
            LlmError::Http(e) => AppError::Provider(format!("AI service error: {e}")),
            LlmError::Parse(e) => {
                AppError::Provider(format!("Malformed response from AI service: {e}"))
            }
        }
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Api { message, .. } => AppError::Provider(message),
            other => AppError::Provider(other.to_string()),
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        AppError::IdentityStore(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Validation(format!("Invalid upload: {}", err.body_text()))
    }
}
