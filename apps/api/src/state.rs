use std::sync::Arc;

use crate::config::Config;
use crate::creations::CreationStore;
use crate::identity::{IdentityStore, SessionVerifier};
use crate::llm_client::TextProvider;
use crate::media::{ImageGenerator, ImageHost};

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every external collaborator sits behind a trait object so the pipeline can
/// be exercised without network access.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: Arc<dyn TextProvider>,
    pub identity: Arc<dyn IdentityStore>,
    pub sessions: Arc<dyn SessionVerifier>,
    pub image_generator: Arc<dyn ImageGenerator>,
    pub image_host: Arc<dyn ImageHost>,
    pub creations: Arc<dyn CreationStore>,
}
