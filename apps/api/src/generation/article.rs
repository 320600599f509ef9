//! Article generation — maps a requested length to a word band and token ceiling.

use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::errors::AppError;
use crate::generation::pipeline::Generated;
use crate::generation::prompts::ARTICLE_SYSTEM_TEMPLATE;
use crate::llm_client::{self, ChatRequest, TextProvider};

const DEFAULT_LENGTH: f64 = 800.0;
/// Rough words → tokens conversion.
const TOKENS_PER_WORD: f64 = 1.4;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Deserialize)]
pub struct ArticleRequest {
    #[serde(default)]
    pub prompt: String,
    /// Number or numeric string; missing/zero/garbage means 800.
    #[serde(default)]
    pub length: Option<Value>,
}

/// Target word range for an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordBand {
    pub min_words: u32,
    pub max_words: u32,
}

impl WordBand {
    pub fn for_length(length: f64) -> Self {
        let (min_words, max_words) = if length <= 800.0 {
            (500, 800)
        } else if length <= 1200.0 {
            (800, 1200)
        } else {
            (1200, 1800)
        };
        Self {
            min_words,
            max_words,
        }
    }

    pub fn max_tokens(&self) -> u32 {
        (f64::from(self.max_words) * TOKENS_PER_WORD).round() as u32
    }

    /// Hard lower bound written into the instruction.
    pub fn floor_words(&self) -> u32 {
        self.min_words.saturating_sub(50)
    }

    /// Hard upper bound written into the instruction (+10%).
    pub fn ceiling_words(&self) -> u32 {
        (f64::from(self.max_words) * 1.1).round() as u32
    }

    pub fn system_prompt(&self) -> String {
        ARTICLE_SYSTEM_TEMPLATE
            .replace("{min_words}", &self.min_words.to_string())
            .replace("{max_words}", &self.max_words.to_string())
            .replace("{floor_words}", &self.floor_words().to_string())
            .replace("{ceiling_words}", &self.ceiling_words().to_string())
    }
}

/// Reads the requested length, falling back to 800 for anything unusable.
pub fn requested_length(length: Option<&Value>) -> f64 {
    let parsed = match length {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n.is_finite() && n != 0.0 => n,
        _ => DEFAULT_LENGTH,
    }
}

pub async fn generate(
    provider: &dyn TextProvider,
    config: &Config,
    request: &ArticleRequest,
) -> Result<Generated, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("Please enter an article topic".to_string()));
    }

    let band = WordBand::for_length(requested_length(request.length.as_ref()));
    let system = band.system_prompt();

    let completion = llm_client::invoke(
        provider,
        ChatRequest {
            model: &config.llm_primary_model,
            system: &system,
            user: &request.prompt,
            temperature: TEMPERATURE,
            max_tokens: band.max_tokens(),
        },
    )
    .await?;

    Ok(Generated::new(request.prompt.clone(), completion.content))
}
