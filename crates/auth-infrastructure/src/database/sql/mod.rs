//! SQL repository implementations

pub mod auth_repo_impl;

pub use auth_repo_impl::SqlAuthRepository;

use auth_core::DomainError;
use tracing::error;

/// Attach context to sqlx errors on the way out of the repository.
pub(crate) trait SqlxResultExt<T> {
    fn db_context(self, context: &str) -> Result<T, DomainError>;
}

impl<T> SqlxResultExt<T> for Result<T, sqlx::Error> {
    fn db_context(self, context: &str) -> Result<T, DomainError> {
        self.map_err(|e| {
            error!("{}: {}", context, e);
            DomainError::DatabaseError(format!("{context}: {e}"))
        })
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
