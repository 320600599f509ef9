//! Blog title generation with a one-shot fallback for truncated answers.

use serde::Deserialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::generation::pipeline::Generated;
use crate::generation::prompts::{BLOG_TITLE_SYSTEM, BLOG_TITLE_USER_TEMPLATE};
use crate::llm_client::{self, ChatCompletion, ChatRequest, LlmError, TextProvider};

const TEMPERATURE: f32 = 0.9;
const MAX_TOKENS: u32 = 900;
/// Answers shorter than this that did not finish with `stop` trigger the fallback.
const MIN_COMPLETE_CHARS: usize = 120;
const NOT_PROVIDED: &str = "(not provided)";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogTitleRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl BlogTitleRequest {
    fn keyword(&self) -> &str {
        self.keyword.as_deref().unwrap_or_default().trim()
    }

    fn category(&self) -> &str {
        self.category.as_deref().unwrap_or_default().trim()
    }

    /// `Keyword: X\nCategory: Y` when both are given, otherwise the raw prompt.
    pub fn effective_prompt(&self) -> String {
        let (keyword, category) = (self.keyword(), self.category());
        if !keyword.is_empty() && !category.is_empty() {
            format!("Keyword: {keyword}\nCategory: {category}")
        } else {
            self.prompt.clone().unwrap_or_default()
        }
    }

    fn user_message(&self, effective_prompt: &str) -> String {
        let or_missing = |s: &str| {
            if s.is_empty() {
                NOT_PROVIDED.to_string()
            } else {
                s.to_string()
            }
        };
        BLOG_TITLE_USER_TEMPLATE
            .replace("{keyword}", &or_missing(self.keyword()))
            .replace("{category}", &or_missing(self.category()))
            .replace("{request}", effective_prompt)
    }
}

/// Same instructions for the primary call and the fallback; only the model differs.
fn chat<'a>(model: &'a str, user: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        system: BLOG_TITLE_SYSTEM,
        user,
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    }
}

pub fn needs_fallback(completion: &ChatCompletion) -> bool {
    completion.content_len() < MIN_COMPLETE_CHARS && !completion.finished_normally()
}

pub async fn generate(
    provider: &dyn TextProvider,
    config: &Config,
    request: &BlogTitleRequest,
) -> Result<Generated, AppError> {
    let effective_prompt = request.effective_prompt();
    if effective_prompt.trim().is_empty() {
        return Err(AppError::Validation(
            "Please provide a keyword and category".to_string(),
        ));
    }
    let user = request.user_message(&effective_prompt);

    let primary = llm_client::invoke(provider, chat(&config.llm_primary_model, &user))
        .await
        .map_err(|e| match e {
            LlmError::EmptyContent => AppError::EmptyResponse(
                "AI returned an empty response. Try again (or change the keyword).".to_string(),
            ),
            other => other.into(),
        })?;

    if primary.finish_reason.as_deref() == Some("length") {
        warn!("Blog title response was cut off by the token limit");
    }

    let content = if needs_fallback(&primary) {
        warn!(
            chars = primary.content_len(),
            finish_reason = primary.finish_reason.as_deref().unwrap_or("none"),
            model = %config.llm_fallback_model,
            "Blog title response looks incomplete, retrying with fallback model"
        );
        keep_longer(
            primary.content,
            provider.complete(chat(&config.llm_fallback_model, &user)).await,
        )
    } else {
        primary.content
    };

    Ok(Generated::new(effective_prompt, content))
}

/// Keeps the fallback only if it is strictly longer; fallback errors are swallowed.
fn keep_longer(original: String, fallback: Result<ChatCompletion, LlmError>) -> String {
    match fallback {
        Ok(retry) if retry.content_len() > original.chars().count() => {
            info!(chars = retry.content_len(), "Fallback model returned longer content");
            retry.content
        }
        Ok(_) => original,
        Err(e) => {
            warn!("Fallback model failed, keeping original response: {e}");
            original
        }
    }
}
