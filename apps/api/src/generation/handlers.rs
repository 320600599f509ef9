//! Axum route handlers for the generation API.
//!
//! Every handler has the same shape: extract the caller and input, hand a
//! capability closure to `pipeline::run`, return `{success, content}`.

use axum::{
    extract::{multipart::MultipartRejection, FromRequest, Multipart, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::generation::article::{self, ArticleRequest};
use crate::generation::blog_title::{self, BlogTitleRequest};
use crate::generation::capability::Capability;
use crate::generation::cover_letter::{self, CoverLetterRequest};
use crate::generation::images::{self, GenerateImageRequest, IMAGE_SIZE_LIMIT_MESSAGE};
use crate::generation::pipeline;
use crate::generation::resume_review::{self, SIZE_LIMIT_MESSAGE};
use crate::generation::upload::UploadForm;
use crate::identity::Caller;
use crate::state::AppState;

/// JSON body extractor whose rejection renders as `{success: false, message}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub success: bool,
    pub content: String,
}

impl GenerationResponse {
    fn ok(content: String) -> Json<Self> {
        Json(Self {
            success: true,
            content,
        })
    }
}

/// POST /api/ai/generate-article
pub async fn handle_generate_article(
    State(state): State<AppState>,
    caller: Caller,
    JsonBody(request): JsonBody<ArticleRequest>,
) -> Result<Json<GenerationResponse>, AppError> {
    let content = pipeline::run(&state, &caller, Capability::Article, || {
        article::generate(state.llm.as_ref(), &state.config, &request)
    })
    .await?;

    Ok(GenerationResponse::ok(content))
}

/// POST /api/ai/generate-blog-title
pub async fn handle_generate_blog_title(
    State(state): State<AppState>,
    caller: Caller,
    JsonBody(request): JsonBody<BlogTitleRequest>,
) -> Result<Json<GenerationResponse>, AppError> {
    let content = pipeline::run(&state, &caller, Capability::BlogTitle, || {
        blog_title::generate(state.llm.as_ref(), &state.config, &request)
    })
    .await?;

    Ok(GenerationResponse::ok(content))
}

/// POST /api/ai/generate-cover-letter
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    caller: Caller,
    JsonBody(request): JsonBody<CoverLetterRequest>,
) -> Result<Json<GenerationResponse>, AppError> {
    let content = pipeline::run(&state, &caller, Capability::CoverLetter, || {
        cover_letter::generate(state.llm.as_ref(), &state.config, &request)
    })
    .await?;

    Ok(GenerationResponse::ok(content))
}

/// POST /api/ai/generate-image
pub async fn handle_generate_image(
    State(state): State<AppState>,
    caller: Caller,
    JsonBody(request): JsonBody<GenerateImageRequest>,
) -> Result<Json<GenerationResponse>, AppError> {
    let content = pipeline::run(&state, &caller, Capability::ImageGeneration, || {
        images::generate_image(
            state.image_generator.as_ref(),
            state.image_host.as_ref(),
            &request,
        )
    })
    .await?;

    Ok(GenerationResponse::ok(content))
}

/// POST /api/ai/remove-image-background (multipart: `image`)
pub async fn handle_remove_background(
    State(state): State<AppState>,
    caller: Caller,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResponse>, AppError> {
    let mut form = UploadForm::read(multipart?, IMAGE_SIZE_LIMIT_MESSAGE).await?;
    let host = state.image_host.as_ref();

    let content = pipeline::run(&state, &caller, Capability::BackgroundRemoval, || async move {
        let image = form.take_file("image")?;
        images::remove_background(host, image).await
    })
    .await?;

    Ok(GenerationResponse::ok(content))
}

/// POST /api/ai/remove-image-object (multipart: `image`, `object`)
pub async fn handle_remove_object(
    State(state): State<AppState>,
    caller: Caller,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResponse>, AppError> {
    let mut form = UploadForm::read(multipart?, IMAGE_SIZE_LIMIT_MESSAGE).await?;
    let host = state.image_host.as_ref();

    let content = pipeline::run(&state, &caller, Capability::ObjectRemoval, || async move {
        let image = form.take_file("image")?;
        let object = form.field("object").unwrap_or_default().to_string();
        images::remove_object(host, image, &object).await
    })
    .await?;

    Ok(GenerationResponse::ok(content))
}

/// POST /api/ai/resume-review (multipart: `resume`)
pub async fn handle_resume_review(
    State(state): State<AppState>,
    caller: Caller,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResponse>, AppError> {
    let mut form = UploadForm::read(multipart?, SIZE_LIMIT_MESSAGE).await?;
    let llm = state.llm.as_ref();
    let config = &state.config;

    let content = pipeline::run(&state, &caller, Capability::ResumeReview, || async move {
        let resume = form.take_file("resume")?;
        resume_review::generate(llm, config, resume).await
    })
    .await?;

    Ok(GenerationResponse::ok(content))
}
