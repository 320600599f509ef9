// Usage-gated generation: one pipeline, one module per capability.
// All chat-completion calls go through llm_client; image calls through media.

pub mod article;
pub mod blog_title;
pub mod capability;
pub mod cover_letter;
pub mod gate;
pub mod handlers;
pub mod images;
pub mod pipeline;
pub mod prompts;
pub mod resume_review;
pub mod upload;
