use anyhow::{Context, Result};

const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";
const DEFAULT_PRIMARY_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_FALLBACK_MODEL: &str = "gemini-2.5-pro";
const DEFAULT_FREE_USAGE_LIMIT: u32 = 10;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Base URL of the OpenAI-compatible chat-completion endpoint.
    pub llm_base_url: String,
    pub llm_api_key: String,
    pub llm_primary_model: String,
    /// Used only for the one-shot blog-title retry.
    pub llm_fallback_model: String,
    pub clipdrop_api_key: String,
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: String,
    pub clerk_secret_key: String,
    /// PEM public key used for networkless session token verification.
    pub clerk_jwt_key: String,
    pub free_usage_limit: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            llm_base_url: optional_env("LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
            llm_api_key: require_env("LLM_API_KEY")?,
            llm_primary_model: optional_env("LLM_PRIMARY_MODEL", DEFAULT_PRIMARY_MODEL),
            llm_fallback_model: optional_env("LLM_FALLBACK_MODEL", DEFAULT_FALLBACK_MODEL),
            clipdrop_api_key: require_env("CLIPDROP_API_KEY")?,
            cloudinary_cloud_name: require_env("CLOUDINARY_CLOUD_NAME")?,
            cloudinary_api_key: require_env("CLOUDINARY_API_KEY")?,
            cloudinary_api_secret: require_env("CLOUDINARY_API_SECRET")?,
            clerk_secret_key: require_env("CLERK_SECRET_KEY")?,
            clerk_jwt_key: require_env("CLERK_JWT_KEY")?,
            free_usage_limit: match std::env::var("FREE_USAGE_LIMIT") {
                Ok(raw) => raw
                    .parse::<u32>()
                    .context("FREE_USAGE_LIMIT must be a non-negative integer")?,
                Err(_) => DEFAULT_FREE_USAGE_LIMIT,
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
