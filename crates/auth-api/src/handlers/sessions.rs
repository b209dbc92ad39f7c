//! Self-service session management

use auth_core::Session;
use axum::{
    extract::{rejection::PathRejection, Path},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ApiError;
use crate::extract::AuthSession;
use crate::response::ApiResponse;

/// Public view of a session. Never carries the token.
#[derive(Debug, Serialize)]
pub struct SessionDto {
    /// Snowflake id as a string; it does not fit a JavaScript number.
    pub id: String,
    pub username: String,
    pub user_agent: String,
    pub expires_at: DateTime<Utc>,
    pub current: bool,
}

impl SessionDto {
    pub fn from_session(session: &Session, current_id: i64) -> Self {
        Self {
            id: session.id.to_string(),
            username: session.username.clone(),
            user_agent: session.user_agent.clone(),
            expires_at: DateTime::from_timestamp_nanos(session.deadline),
            current: session.id == current_id,
        }
    }
}

/// GET /api/v1/sessions
pub async fn list_sessions(
    AuthSession(mut tx): AuthSession,
) -> Result<Json<ApiResponse<Vec<SessionDto>>>, ApiError> {
    let current_id = tx.session().id;
    let sessions = tx.list_sessions().await?;
    tx.commit().await?;

    let dtos = sessions
        .iter()
        .map(|s| SessionDto::from_session(s, current_id))
        .collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// DELETE /api/v1/sessions/{id}
pub async fn delete_session(
    id: Result<Path<i64>, PathRejection>,
    AuthSession(mut tx): AuthSession,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::Validation(e.body_text()))?;
    tx.delete_session(id).await?;
    tx.commit().await?;

    Ok(Json(ApiResponse::success(())))
}
