//! In-memory stand-ins for every external collaborator, shared by unit and router tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::config::Config;
use crate::creations::CreationStore;
use crate::errors::AppError;
use crate::identity::{Caller, IdentityError, IdentityStore, Plan, SessionVerifier};
use crate::llm_client::{ChatCompletion, ChatRequest, LlmError, TextProvider};
use crate::media::{ImageGenerator, ImageHost, MediaError, UploadedImage};
use crate::models::creation::{CreationRow, NewCreation};
use crate::state::AppState;

pub const USER: &str = "user_test";

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/pencraft_test".to_string(),
        llm_base_url: "http://llm.test/v1".to_string(),
        llm_api_key: "test-key".to_string(),
        llm_primary_model: "primary-model".to_string(),
        llm_fallback_model: "fallback-model".to_string(),
        clipdrop_api_key: "clipdrop-key".to_string(),
        cloudinary_cloud_name: "demo".to_string(),
        cloudinary_api_key: "cloud-key".to_string(),
        cloudinary_api_secret: "cloud-secret".to_string(),
        clerk_secret_key: "clerk-secret".to_string(),
        clerk_jwt_key: String::new(),
        free_usage_limit: 10,
        port: 0,
        rust_log: "debug".to_string(),
    }
}

// ── LLM ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// Replays scripted completions in order and records every request.
#[derive(Default)]
pub struct FakeLlm {
    script: Mutex<VecDeque<Result<ChatCompletion, LlmError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, content: &str, finish_reason: &str) -> Self {
        self.push(Ok(ChatCompletion {
            content: content.to_string(),
            finish_reason: Some(finish_reason.to_string()),
        }))
    }

    pub fn reply_without_finish_reason(self, content: &str) -> Self {
        self.push(Ok(ChatCompletion {
            content: content.to_string(),
            finish_reason: None,
        }))
    }

    pub fn fail(self, error: LlmError) -> Self {
        self.push(Err(error))
    }

    fn push(self, outcome: Result<ChatCompletion, LlmError>) -> Self {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextProvider for FakeLlm {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<ChatCompletion, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: request.model.to_string(),
            system: request.system.to_string(),
            user: request.user.to_string(),
            max_tokens: request.max_tokens,
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LlmError::Api {
                    status: 500,
                    message: "no scripted completion left".to_string(),
                })
            })
    }
}

// ── Identity ──────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeIdentity {
    usage: Mutex<HashMap<String, u32>>,
    writes: Mutex<Vec<(String, u32)>>,
    reads: Mutex<usize>,
    fail_reads: bool,
    fail_writes: Mutex<bool>,
}

impl FakeIdentity {
    pub fn with_usage(user_id: &str, usage: Option<u32>) -> Self {
        let identity = Self::default();
        if let Some(value) = usage {
            identity
                .usage
                .lock()
                .unwrap()
                .insert(user_id.to_string(), value);
        }
        identity
    }

    pub fn failing() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    pub fn writes(&self) -> Vec<(String, u32)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn reads(&self) -> usize {
        *self.reads.lock().unwrap()
    }
}

fn identity_unavailable() -> IdentityError {
    IdentityError::Api {
        status: 503,
        message: "identity store unavailable".to_string(),
    }
}

#[async_trait]
impl IdentityStore for FakeIdentity {
    async fn free_usage(&self, user_id: &str) -> Result<Option<u32>, IdentityError> {
        *self.reads.lock().unwrap() += 1;
        if self.fail_reads {
            return Err(identity_unavailable());
        }
        Ok(self.usage.lock().unwrap().get(user_id).copied())
    }

    async fn set_free_usage(&self, user_id: &str, value: u32) -> Result<(), IdentityError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(identity_unavailable());
        }
        self.usage
            .lock()
            .unwrap()
            .insert(user_id.to_string(), value);
        self.writes
            .lock()
            .unwrap()
            .push((user_id.to_string(), value));
        Ok(())
    }
}

/// Accepts `free:<user>` and `premium:<user>` tokens.
pub struct FakeSessions;

impl SessionVerifier for FakeSessions {
    fn verify(&self, token: &str) -> Result<Caller, AppError> {
        let (plan, user_id) = match token.split_once(':') {
            Some(("free", user)) => (Plan::Free, user),
            Some(("premium", user)) => (Plan::Premium, user),
            _ => return Err(AppError::Unauthorized("Invalid session".to_string())),
        };
        Ok(Caller {
            user_id: user_id.to_string(),
            plan,
        })
    }
}

// ── Media ─────────────────────────────────────────────────────────────────────

pub struct FakeImageGenerator {
    image: &'static [u8],
}

impl FakeImageGenerator {
    pub fn new(image: &'static [u8]) -> Self {
        Self { image }
    }
}

#[async_trait]
impl ImageGenerator for FakeImageGenerator {
    async fn text_to_image(&self, _prompt: &str) -> Result<Bytes, MediaError> {
        Ok(Bytes::from_static(self.image))
    }
}

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub bytes: Bytes,
    pub file_name: String,
    pub transformation: Option<String>,
}

#[derive(Default)]
pub struct FakeImageHost {
    uploads: Mutex<Vec<RecordedUpload>>,
}

impl FakeImageHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageHost for FakeImageHost {
    async fn upload(
        &self,
        image: Bytes,
        file_name: &str,
        transformation: Option<&str>,
    ) -> Result<UploadedImage, MediaError> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(RecordedUpload {
            bytes: image,
            file_name: file_name.to_string(),
            transformation: transformation.map(str::to_string),
        });
        let n = uploads.len();
        Ok(UploadedImage {
            secure_url: format!("https://images.test/upload/{n}"),
            public_id: format!("public-{n}"),
        })
    }

    fn derived_url(&self, public_id: &str, transformation: &str) -> String {
        format!("https://images.test/{transformation}/{public_id}")
    }
}

// ── Creations ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryCreations {
    rows: Mutex<Vec<CreationRow>>,
    fail_inserts: Mutex<bool>,
}

impl InMemoryCreations {
    pub fn fail_inserts(&self) {
        *self.fail_inserts.lock().unwrap() = true;
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> Vec<CreationRow> {
        self.rows.lock().unwrap().clone()
    }

    fn newest_first(&self, keep: impl Fn(&CreationRow) -> bool) -> Vec<CreationRow> {
        let mut rows: Vec<CreationRow> = self.rows().into_iter().filter(|r| keep(r)).collect();
        rows.reverse();
        rows
    }
}

#[async_trait]
impl CreationStore for InMemoryCreations {
    async fn insert(&self, creation: NewCreation) -> Result<Uuid, sqlx::Error> {
        if *self.fail_inserts.lock().unwrap() {
            return Err(sqlx::Error::PoolTimedOut);
        }
        let id = Uuid::new_v4();
        self.rows.lock().unwrap().push(CreationRow {
            id,
            user_id: creation.user_id,
            prompt: creation.prompt,
            content: creation.content,
            creation_type: creation.creation_type.as_str().to_string(),
            publish: creation.publish,
            likes: Vec::new(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<CreationRow>, sqlx::Error> {
        Ok(self.newest_first(|r| r.user_id == user_id))
    }

    async fn list_published(&self) -> Result<Vec<CreationRow>, sqlx::Error> {
        Ok(self.newest_first(|r| r.publish))
    }
}

// ── Harness ───────────────────────────────────────────────────────────────────

/// An `AppState` wired to fakes, with handles kept for assertions.
pub struct TestHarness {
    pub config: Config,
    pub llm: Arc<FakeLlm>,
    pub identity: Arc<FakeIdentity>,
    pub creations: Arc<InMemoryCreations>,
    pub generator: Arc<FakeImageGenerator>,
    pub host: Arc<FakeImageHost>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            config: test_config(),
            llm: Arc::new(FakeLlm::new()),
            identity: Arc::new(FakeIdentity::default()),
            creations: Arc::new(InMemoryCreations::default()),
            generator: Arc::new(FakeImageGenerator::new(b"png-bytes")),
            host: Arc::new(FakeImageHost::new()),
        }
    }

    /// Seeds the free-usage counter for [`USER`].
    pub fn with_usage(mut self, usage: Option<u32>) -> Self {
        self.identity = Arc::new(FakeIdentity::with_usage(USER, usage));
        self
    }

    pub fn with_llm_reply(mut self, content: &str, finish_reason: &str) -> Self {
        self.llm = Arc::new(FakeLlm::new().reply(content, finish_reason));
        self
    }

    pub fn free_token() -> String {
        format!("free:{USER}")
    }

    pub fn premium_token() -> String {
        format!("premium:{USER}")
    }

    pub fn state(&self) -> AppState {
        AppState {
            config: self.config.clone(),
            llm: self.llm.clone(),
            identity: self.identity.clone(),
            sessions: Arc::new(FakeSessions),
            image_generator: self.generator.clone(),
            image_host: self.host.clone(),
            creations: self.creations.clone(),
        }
    }
}
