//! Domain errors

use auth_security::{PasswordError, TokenError};
use thiserror::Error;

/// Failures surfaced by the auth flows.
///
/// `SessionExpired` covers both unknown and expired tokens, and
/// `InvalidPassword` covers both unknown users and wrong passwords, so a
/// caller cannot tell which precondition failed.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Session expired")]
    SessionExpired,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Username taken")]
    UsernameTaken,

    #[error("Randomness unavailable: {0}")]
    RandomnessUnavailable(String),

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Suggested HTTP status for the transport layer.
    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::SessionExpired => 410,
            DomainError::SessionNotFound => 401,
            DomainError::InvalidPassword => 401,
            DomainError::InvalidToken => 403,
            DomainError::UsernameTaken => 409,
            DomainError::RandomnessUnavailable(_)
            | DomainError::PasswordHashError(_)
            | DomainError::DatabaseError(_) => 500,
        }
    }
}

impl From<TokenError> for DomainError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::RandomnessUnavailable(msg) => DomainError::RandomnessUnavailable(msg),
        }
    }
}

impl From<PasswordError> for DomainError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::HashError(msg) => DomainError::PasswordHashError(msg),
        }
    }
}
