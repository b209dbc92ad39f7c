//! HTTP mapping of domain failures

use auth_core::DomainError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing session token")]
    MissingToken,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Domain(e) => match e {
                DomainError::SessionExpired => "SESSION_EXPIRED",
                DomainError::SessionNotFound => "SESSION_NOT_FOUND",
                DomainError::InvalidPassword => "INVALID_PASSWORD",
                DomainError::InvalidToken => "INVALID_TOKEN",
                DomainError::UsernameTaken => "USERNAME_TAKEN",
                DomainError::RandomnessUnavailable(_)
                | DomainError::PasswordHashError(_)
                | DomainError::DatabaseError(_) => "INTERNAL_ERROR",
            },
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::MissingToken => "UNAUTHENTICATED",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            // Store and RNG details stay in the logs.
            tracing::error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
            self.to_string()
        };

        (status, Json(ApiResponse::<()>::error(self.code(), &message))).into_response()
    }
}
