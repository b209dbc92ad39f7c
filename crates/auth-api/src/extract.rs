//! Session extractor for authenticated routes.

use auth_core::SessionTransaction;
use auth_infrastructure::SqlAuthRepository;
use auth_shared::constants::SESSION_COOKIE;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tower_cookies::Cookies;

use crate::error::ApiError;
use crate::state::AppState;

/// A validated, already renewed session together with its open transaction.
///
/// The token comes from the session cookie, falling back to
/// `Authorization: Bearer {token}`. Handlers must `commit` for the renewal
/// and their own changes to persist.
pub struct AuthSession(pub SessionTransaction<SqlAuthRepository>);

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::Internal(msg.to_string()))?;

        let token = cookies
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .or_else(|| bearer_token(parts))
            .ok_or(ApiError::MissingToken)?;

        let tx = state.auth.authenticate(&token).await?;
        Ok(AuthSession(tx))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
