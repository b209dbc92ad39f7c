//! Request-scoped transaction bound to an authenticated session.

use std::sync::Arc;

use tracing::info;

use crate::domain::Session;
use crate::error::DomainError;
use crate::repositories::AuthRepository;

/// An open transaction that already carries a validated, renewed session.
///
/// Obtained from [`AuthService::authenticate`](crate::AuthService::authenticate).
/// Nothing done through it, the renewal included, is persisted until
/// [`commit`](Self::commit); dropping it rolls back.
pub struct SessionTransaction<R: AuthRepository> {
    repo: Arc<R>,
    tx: R::Tx,
    session: Session,
}

impl<R: AuthRepository> SessionTransaction<R> {
    pub(crate) fn new(repo: Arc<R>, tx: R::Tx, session: Session) -> Self {
        Self { repo, tx, session }
    }

    /// Snapshot of the current session, with its renewed deadline.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// All sessions belonging to the current user, in no particular order.
    pub async fn list_sessions(&mut self) -> Result<Vec<Session>, DomainError> {
        self.repo
            .list_sessions(&mut self.tx, &self.session.username)
            .await
    }

    /// Delete one of the current user's sessions by id.
    ///
    /// Ids owned by another user fail with [`DomainError::SessionNotFound`],
    /// same as ids that do not exist.
    pub async fn delete_session(&mut self, id: i64) -> Result<(), DomainError> {
        let deleted = self
            .repo
            .delete_session_by_id(&mut self.tx, id, &self.session.username)
            .await?;
        if deleted == 0 {
            return Err(DomainError::SessionNotFound);
        }

        info!(username = %self.session.username, session_id = id, "Session deleted");
        Ok(())
    }

    /// Delete the current session.
    pub async fn signout(&mut self) -> Result<(), DomainError> {
        let deleted = self
            .repo
            .delete_session_by_token(&mut self.tx, &self.session.auth_token)
            .await?;
        if deleted == 0 {
            return Err(DomainError::SessionNotFound);
        }

        info!(username = %self.session.username, session_id = self.session.id, "Signed out");
        Ok(())
    }

    pub async fn commit(self) -> Result<(), DomainError> {
        self.repo.commit(self.tx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockAuthRepository;
    use auth_security::SnowflakeGenerator;
    use std::time::Duration;

    fn transaction(repo: MockAuthRepository) -> SessionTransaction<MockAuthRepository> {
        let ids = SnowflakeGenerator::new(0).unwrap();
        let session = Session::new(&ids, "alice", "curl", 0, Duration::from_secs(60)).unwrap();
        SessionTransaction::new(Arc::new(repo), (), session)
    }

    #[tokio::test]
    async fn test_delete_session_miss_is_not_found() {
        let mut repo = MockAuthRepository::new();
        repo.expect_delete_session_by_id()
            .times(1)
            .returning(|_, _, _| Ok(0));

        let mut tx = transaction(repo);
        let err = tx.delete_session(12345).await.unwrap_err();
        assert!(matches!(err, DomainError::SessionNotFound));
    }

    #[tokio::test]
    async fn test_double_signout_is_not_found() {
        let mut repo = MockAuthRepository::new();
        let mut calls = 0;
        repo.expect_delete_session_by_token()
            .times(2)
            .returning(move |_, _| {
                calls += 1;
                Ok(if calls == 1 { 1 } else { 0 })
            });

        let mut tx = transaction(repo);
        tx.signout().await.unwrap();
        assert!(matches!(tx.signout().await, Err(DomainError::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_commit_hands_transaction_back() {
        let mut repo = MockAuthRepository::new();
        repo.expect_list_sessions()
            .returning(|_, _| Ok(Vec::new()));
        repo.expect_commit().times(1).returning(|_| Ok(()));

        let mut tx = transaction(repo);
        assert!(tx.list_sessions().await.unwrap().is_empty());
        tx.commit().await.unwrap();
    }
}
