mod config;
mod creations;
mod db;
mod errors;
mod generation;
mod identity;
mod llm_client;
mod media;
mod models;
mod routes;
mod state;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::creations::PgCreationStore;
use crate::db::create_pool;
use crate::identity::{ClerkClient, ClerkSessionVerifier};
use crate::llm_client::LlmClient;
use crate::media::{ClipDropClient, CloudinaryClient};
use crate::routes::build_router;
use crate::state::AppState;

/// Applies to every outbound call; long articles can take a while to generate.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(120);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pencraft API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // One HTTP client shared by every upstream integration
    let http = reqwest::Client::builder()
        .timeout(UPSTREAM_TIMEOUT)
        .build()?;

    let llm = LlmClient::new(http.clone(), &config.llm_base_url, config.llm_api_key.clone());
    info!(
        "LLM client initialized (primary: {}, fallback: {})",
        config.llm_primary_model, config.llm_fallback_model
    );

    let sessions = ClerkSessionVerifier::from_pem(&config.clerk_jwt_key)?;
    let identity = ClerkClient::new(http.clone(), config.clerk_secret_key.clone());

    let image_generator = ClipDropClient::new(http.clone(), config.clipdrop_api_key.clone());
    let image_host = CloudinaryClient::new(
        http,
        config.cloudinary_cloud_name.clone(),
        config.cloudinary_api_key.clone(),
        config.cloudinary_api_secret.clone(),
    );
    info!("Image services initialized (cloud: {})", config.cloudinary_cloud_name);

    // Build app state
    let state = AppState {
        config: config.clone(),
        llm: Arc::new(llm),
        identity: Arc::new(identity),
        sessions: Arc::new(sessions),
        image_generator: Arc::new(image_generator),
        image_host: Arc::new(image_host),
        creations: Arc::new(PgCreationStore::new(db)),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the web client's domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
