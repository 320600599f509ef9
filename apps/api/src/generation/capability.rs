use crate::models::creation::CreationType;

/// One distinct generation feature exposed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Article,
    BlogTitle,
    CoverLetter,
    ImageGeneration,
    BackgroundRemoval,
    ObjectRemoval,
    ResumeReview,
}

impl Capability {
    /// Premium-only capabilities reject free callers regardless of usage.
    pub fn premium_only(self) -> bool {
        matches!(
            self,
            Capability::ImageGeneration
                | Capability::BackgroundRemoval
                | Capability::ObjectRemoval
                | Capability::ResumeReview
        )
    }

    pub fn creation_type(self) -> CreationType {
        match self {
            Capability::Article => CreationType::Article,
            Capability::BlogTitle => CreationType::BlogTitle,
            Capability::CoverLetter => CreationType::CoverLetter,
            Capability::ImageGeneration
            | Capability::BackgroundRemoval
            | Capability::ObjectRemoval => CreationType::Image,
            Capability::ResumeReview => CreationType::ResumeReview,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Capability::Article => "article",
            Capability::BlogTitle => "blog-title",
            Capability::CoverLetter => "cover-letter",
            Capability::ImageGeneration => "image",
            Capability::BackgroundRemoval => "background-removal",
            Capability::ObjectRemoval => "object-removal",
            Capability::ResumeReview => "resume-review",
        }
    }
}
