//! Cover letter generation — job description + candidate skills, in one of three tones.

use serde::Deserialize;

use crate::config::Config;
use crate::errors::AppError;
use crate::generation::pipeline::Generated;
use crate::generation::prompts::{COVER_LETTER_SYSTEM_TEMPLATE, COVER_LETTER_USER_TEMPLATE};
use crate::llm_client::{self, ChatRequest, TextProvider};

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1200;

/// Voice of the generated letter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tone {
    #[default]
    Professional,
    Enthusiastic,
    Concise,
}

impl Tone {
    /// Parses the client's tone option. Missing or blank means professional.
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("professional") => Ok(Tone::Professional),
            Some("enthusiastic") => Ok(Tone::Enthusiastic),
            Some("concise") => Ok(Tone::Concise),
            Some(other) => Err(AppError::Validation(format!(
                "Unsupported tone '{other}'. Choose professional, enthusiastic or concise."
            ))),
        }
    }

    pub fn guidance(self) -> &'static str {
        match self {
            Tone::Professional => {
                "professional and polished; confident without hype, formal greeting and sign-off."
            }
            Tone::Enthusiastic => {
                "warm and energetic; show genuine excitement about the role and company while staying specific."
            }
            Tone::Concise => {
                "brief and direct; three short paragraphs at most, no filler sentences."
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRequest {
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub user_skills: String,
    #[serde(default)]
    pub tone: Option<String>,
}

pub async fn generate(
    provider: &dyn TextProvider,
    config: &Config,
    request: &CoverLetterRequest,
) -> Result<Generated, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "Please paste the job description".to_string(),
        ));
    }
    if request.user_skills.trim().is_empty() {
        return Err(AppError::Validation(
            "Please describe your skills and experience".to_string(),
        ));
    }
    let tone = Tone::parse(request.tone.as_deref())?;

    let system = COVER_LETTER_SYSTEM_TEMPLATE.replace("{tone_guidance}", tone.guidance());
    let user = COVER_LETTER_USER_TEMPLATE
        .replace("{job_description}", request.job_description.trim())
        .replace("{user_skills}", request.user_skills.trim());

    let completion = llm_client::invoke(
        provider,
        ChatRequest {
            model: &config.llm_primary_model,
            system: &system,
            user: &user,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        },
    )
    .await?;

    Ok(Generated::new(
        request.job_description.clone(),
        completion.content,
    ))
}
