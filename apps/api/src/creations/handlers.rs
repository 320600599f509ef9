use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::identity::Caller;
use crate::models::creation::CreationRow;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreationsResponse {
    pub success: bool,
    pub creations: Vec<CreationRow>,
}

/// GET /api/user/get-user-creations
pub async fn handle_user_creations(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<CreationsResponse>, AppError> {
    let creations = state.creations.list_for_user(&caller.user_id).await?;
    Ok(Json(CreationsResponse {
        success: true,
        creations,
    }))
}

/// GET /api/user/get-published-creations
pub async fn handle_published_creations(
    State(state): State<AppState>,
    _caller: Caller,
) -> Result<Json<CreationsResponse>, AppError> {
    let creations = state.creations.list_published().await?;
    Ok(Json(CreationsResponse {
        success: true,
        creations,
    }))
}
