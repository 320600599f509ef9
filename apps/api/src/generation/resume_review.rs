//! Resume review — PDF text extraction followed by a rubric-driven LLM evaluation.

use tracing::warn;

use crate::config::Config;
use crate::errors::AppError;
use crate::generation::pipeline::Generated;
use crate::generation::prompts::{RESUME_REVIEW_SYSTEM_TEMPLATE, RESUME_REVIEW_USER_TEMPLATE};
use crate::generation::upload::UploadedFile;
use crate::llm_client::{self, ChatRequest, TextProvider};

pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 4096;
const STORED_PROMPT: &str = "Review the uploaded Resume";

pub const SIZE_LIMIT_MESSAGE: &str = "Resume file size exceeds allowed size (5MB).";
pub const EXTRACTION_FAILED_MESSAGE: &str =
    "Could not extract text from the PDF. Please use a different resume file.";

pub async fn generate(
    provider: &dyn TextProvider,
    config: &Config,
    resume: UploadedFile,
) -> Result<Generated, AppError> {
    if resume.bytes.len() > MAX_RESUME_BYTES {
        return Err(AppError::Validation(SIZE_LIMIT_MESSAGE.to_string()));
    }

    let text = extract_text(resume).await?;

    let system = RESUME_REVIEW_SYSTEM_TEMPLATE.replace("{resume_text}", &text);
    let user = RESUME_REVIEW_USER_TEMPLATE.replace("{resume_text}", &text);

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

    Ok(Generated::new(STORED_PROMPT, completion.content))
}

/// Extracts text from the PDF on the blocking pool.
async fn extract_text(resume: UploadedFile) -> Result<String, AppError> {
    let file_name = resume.file_name;
    let bytes = resume.bytes;
    let extracted =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await;

    match extracted {
        Ok(Ok(text)) => require_text(text),
        Ok(Err(e)) => {
            warn!(file_name = %file_name, "PDF extraction failed: {e}");
            Err(AppError::Validation(EXTRACTION_FAILED_MESSAGE.to_string()))
        }
        // The PDF parser panics on some malformed files.
        Err(e) if e.is_panic() => {
            warn!(file_name = %file_name, "PDF extraction panicked");
            Err(AppError::Validation(EXTRACTION_FAILED_MESSAGE.to_string()))
        }
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "PDF extraction task failed: {e}"
        ))),
    }
}

fn require_text(text: String) -> Result<String, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation(EXTRACTION_FAILED_MESSAGE.to_string()));
    }
    Ok(text)
}
