//! Session lookup, renewal, and insertion on top of [`AuthRepository`].

use std::time::Duration;

use tracing::debug;

use crate::domain::session::deadline_after;
use crate::domain::Session;
use crate::error::DomainError;
use crate::repositories::AuthRepository;

/// Slide the deadline of the session for `token` to `now + renew_ttl`.
///
/// A session is valid up to and including its deadline. Unknown and expired
/// tokens both yield [`DomainError::SessionExpired`]; expired rows are left
/// for the sweeper.
pub async fn resolve<R: AuthRepository + ?Sized>(
    repo: &R,
    tx: &mut R::Tx,
    token: &str,
    now: i64,
    renew_ttl: Duration,
) -> Result<Session, DomainError> {
    let session = repo
        .renew_session(tx, token, now, deadline_after(now, renew_ttl))
        .await?
        .ok_or(DomainError::SessionExpired)?;

    debug!(session_id = session.id, "Session renewed");
    Ok(session)
}

/// Persist `session`, then sweep every session whose deadline is before
/// `now`. Both happen in `tx`; a failed sweep fails the insert.
pub async fn insert<R: AuthRepository + ?Sized>(
    repo: &R,
    tx: &mut R::Tx,
    session: &Session,
    now: i64,
) -> Result<(), DomainError> {
    repo.insert_session(tx, session).await?;

    let swept = repo.delete_expired_sessions(tx, now).await?;
    if swept > 0 {
        debug!(swept, "Swept expired sessions");
    }
    Ok(())
}
