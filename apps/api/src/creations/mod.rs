//! Persistence for generated content. Append-only: there is no update or delete path.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::creation::{CreationRow, NewCreation};

pub mod handlers;

#[async_trait]
pub trait CreationStore: Send + Sync {
    /// Appends one row and returns its id.
    async fn insert(&self, creation: NewCreation) -> Result<Uuid, sqlx::Error>;

    /// The user's creations, newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<CreationRow>, sqlx::Error>;

    /// Published creations from all users, newest first.
    async fn list_published(&self) -> Result<Vec<CreationRow>, sqlx::Error>;
}

pub struct PgCreationStore {
    pool: PgPool,
}

impl PgCreationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CreationStore for PgCreationStore {
    async fn insert(&self, creation: NewCreation) -> Result<Uuid, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            INSERT INTO creations (user_id, prompt, content, type, publish)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&creation.user_id)
        .bind(&creation.prompt)
        .bind(&creation.content)
        .bind(creation.creation_type.as_str())
        .bind(creation.publish)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<CreationRow>, sqlx::Error> {
        sqlx::query_as::<_, CreationRow>(
            "SELECT * FROM creations WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn list_published(&self) -> Result<Vec<CreationRow>, sqlx::Error> {
        sqlx::query_as::<_, CreationRow>(
            "SELECT * FROM creations WHERE publish = TRUE ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
    }
}
