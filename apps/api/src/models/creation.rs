use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Value of the `creations.type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CreationType {
    Article,
    BlogTitle,
    CoverLetter,
    Image,
    ResumeReview,
}

impl CreationType {
    pub fn as_str(self) -> &'static str {
        match self {
            CreationType::Article => "article",
            CreationType::BlogTitle => "blog-title",
            CreationType::CoverLetter => "cover-letter",
            CreationType::Image => "image",
            CreationType::ResumeReview => "resume-review",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CreationRow {
    pub id: Uuid,
    pub user_id: String,
    pub prompt: String,
    pub content: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub creation_type: String,
    pub publish: bool,
    pub likes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A row about to be appended. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCreation {
    pub user_id: String,
    pub prompt: String,
    pub content: String,
    pub creation_type: CreationType,
    pub publish: bool,
}
