//! Identity provider integration: per-user usage metadata and session verification.
//!
//! The free-usage counter lives in the provider's user `public_metadata`, not in
//! our database. Reads and writes are separate HTTP calls with no compare-and-set,
//! so concurrent requests from one user can overwrite each other's increments.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

pub mod session;

pub use session::{Caller, ClerkSessionVerifier, Plan, SessionVerifier};

const CLERK_API_URL: &str = "https://api.clerk.com/v1";

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Identity API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Read/write access to the per-user free-usage counter.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Returns `None` when the user has no usable counter stored.
    async fn free_usage(&self, user_id: &str) -> Result<Option<u32>, IdentityError>;

    async fn set_free_usage(&self, user_id: &str, value: u32) -> Result<(), IdentityError>;
}

/// Backend API client for the identity provider.
#[derive(Clone)]
pub struct ClerkClient {
    client: Client,
    secret_key: String,
    base_url: String,
}

impl ClerkClient {
    pub fn new(client: Client, secret_key: String) -> Self {
        Self {
            client,
            secret_key,
            base_url: CLERK_API_URL.to_string(),
        }
    }

    async fn check(response: reqwest::Response) -> Result<Value, IdentityError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| {
                    v.pointer("/errors/0/long_message")
                        .or_else(|| v.pointer("/errors/0/message"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or(body);
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl IdentityStore for ClerkClient {
    async fn free_usage(&self, user_id: &str) -> Result<Option<u32>, IdentityError> {
        let response = self
            .client
            .get(format!("{}/users/{user_id}", self.base_url))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        let user = Self::check(response).await?;
        let usage = parse_free_usage(&user);
        debug!(user_id, ?usage, "Fetched free usage");
        Ok(usage)
    }

    async fn set_free_usage(&self, user_id: &str, value: u32) -> Result<(), IdentityError> {
        let response = self
            .client
            .patch(format!("{}/users/{user_id}/metadata", self.base_url))
            .bearer_auth(&self.secret_key)
            .json(&json!({ "public_metadata": { "free_usage": value } }))
            .send()
            .await?;

        Self::check(response).await?;
        debug!(user_id, value, "Stored free usage");
        Ok(())
    }
}

/// Reads `public_metadata.free_usage` from a user object.
///
/// Accepts a non-negative integer or a numeric string. Anything else (missing,
/// null, negative, fractional, garbage) is treated as absent.
pub fn parse_free_usage(user: &Value) -> Option<u32> {
    match user.pointer("/public_metadata/free_usage")? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}
