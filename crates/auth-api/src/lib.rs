//! # Auth API
//!
//! HTTP handlers, the session extractor, and the response envelope.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod response;
pub mod state;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_cookies::CookieManagerLayer;

use crate::handlers::{auth, health, sessions};

pub use error::ApiError;
pub use extract::AuthSession;
pub use response::ApiResponse;
pub use state::AppState;

/// All auth routes with the cookie layer applied. CORS and tracing layers
/// are left to the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/auth/signin", post(auth::signin))
        .route("/api/v1/auth/signup", post(auth::signup))
        .route("/api/v1/auth/signout", post(auth::signout))
        .route("/api/v1/sessions", get(sessions::list_sessions))
        .route("/api/v1/sessions/{id}", delete(sessions::delete_session))
        .with_state(state)
        .layer(CookieManagerLayer::new())
}
