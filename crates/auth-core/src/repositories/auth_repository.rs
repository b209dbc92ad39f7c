//! Auth store port
//!
//! Every query runs inside a caller-supplied transaction `Tx`. Nothing is
//! visible to other transactions until [`AuthRepository::commit`], and
//! dropping a `Tx` without committing must roll it back.

use async_trait::async_trait;

use crate::domain::{InviteToken, Session, User};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock(type Tx = ();))]
#[async_trait]
pub trait AuthRepository: Send + Sync {
    type Tx: Send;

    async fn begin(&self) -> Result<Self::Tx, DomainError>;
    async fn commit(&self, tx: Self::Tx) -> Result<(), DomainError>;

    // Sessions

    /// Set `deadline` on the session whose token matches exactly and whose
    /// current deadline is at or after `now`, returning the updated row.
    ///
    /// One conditional write with no read before it. `None` when the token is
    /// unknown, expired, or was deleted by a transaction that committed first.
    async fn renew_session(
        &self,
        tx: &mut Self::Tx,
        token: &str,
        now: i64,
        deadline: i64,
    ) -> Result<Option<Session>, DomainError>;

    /// Must fail rather than overwrite when `id` or `auth_token` collides.
    async fn insert_session(&self, tx: &mut Self::Tx, session: &Session) -> Result<(), DomainError>;

    /// Delete sessions with `deadline < now`; returns rows removed.
    async fn delete_expired_sessions(&self, tx: &mut Self::Tx, now: i64) -> Result<u64, DomainError>;

    async fn delete_session_by_token(&self, tx: &mut Self::Tx, token: &str) -> Result<u64, DomainError>;

    /// Deletes only when both `id` and `username` match.
    async fn delete_session_by_id(
        &self,
        tx: &mut Self::Tx,
        id: i64,
        username: &str,
    ) -> Result<u64, DomainError>;

    async fn list_sessions(&self, tx: &mut Self::Tx, username: &str) -> Result<Vec<Session>, DomainError>;

    // Users

    async fn find_passhash(&self, tx: &mut Self::Tx, username: &str) -> Result<Option<String>, DomainError>;

    /// Fails with [`DomainError::UsernameTaken`] on a duplicate username.
    async fn create_user(&self, tx: &mut Self::Tx, user: &User) -> Result<(), DomainError>;

    // Invites

    /// Use one invite. Fails with [`DomainError::InvalidToken`] when the
    /// token is unknown, exhausted, or past its deadline.
    async fn consume_invite(&self, tx: &mut Self::Tx, token: &str, now: i64) -> Result<(), DomainError>;

    async fn insert_invite(&self, tx: &mut Self::Tx, invite: &InviteToken) -> Result<(), DomainError>;
}
