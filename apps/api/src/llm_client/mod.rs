/// LLM Client — the single point of entry for chat-completion calls.
///
/// Talks to any OpenAI-compatible `/chat/completions` endpoint. Model names are
/// chosen per call by the generation layer; the base URL and key come from config.
///
/// Calls are NOT retried here. The only retry in the system is the blog-title
/// fallback, which lives with the blog-title generator.
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod extract;

pub use extract::ChatCompletion;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One system + user exchange sent to the provider.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub system: &'a str,
    pub user: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Anything that can answer a chat request. `AppState` carries an
/// `Arc<dyn TextProvider>` so tests can script provider responses.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Returns the normalized completion. Content may be empty; callers that
    /// require content go through [`invoke`].
    async fn complete(&self, request: ChatRequest<'_>) -> Result<ChatCompletion, LlmError>;
}

/// Calls the provider and fails with `EmptyContent` when the extracted text is blank.
pub async fn invoke(
    provider: &dyn TextProvider,
    request: ChatRequest<'_>,
) -> Result<ChatCompletion, LlmError> {
    let completion = provider.complete(request).await?;
    if completion.content.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }
    Ok(completion)
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// reqwest-backed client for an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    completions_url: String,
}

impl LlmClient {
    pub fn new(client: Client, base_url: &str, api_key: String) -> Self {
        Self {
            client,
            api_key,
            completions_url: completions_url(base_url),
        }
    }
}

#[async_trait]
impl TextProvider for LlmClient {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<ChatCompletion, LlmError> {
        let body = ChatCompletionRequest {
            model: request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&self.completions_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: provider_error_message(&text),
            });
        }

        let raw: Value = serde_json::from_str(&text)?;
        let completion = extract::normalize(&raw);

        debug!(
            model = request.model,
            finish_reason = completion.finish_reason.as_deref().unwrap_or("none"),
            content_chars = completion.content.chars().count(),
            "LLM call succeeded"
        );

        Ok(completion)
    }
}

fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Pulls `error.message` out of a provider error body. Some OpenAI-compatible
/// bridges wrap the error object in a one-element array.
fn provider_error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.pointer("/0/error/message"))
                .and_then(Value::as_str)
        })
        .map(str::to_string)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "AI service error".to_string()
            } else {
                body.to_string()
            }
        })
}
