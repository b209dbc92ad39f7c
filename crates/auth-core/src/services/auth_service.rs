// ============================================================================
// Auth Core - Authentication Service
// File: crates/auth-core/src/services/auth_service.rs
// ============================================================================
//! Signin, signup, and session resolution

use std::sync::Arc;
use std::time::Duration;

use auth_security::{PasswordService, SnowflakeGenerator};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::domain::{Permission, Session, User};
use crate::error::DomainError;
use crate::repositories::AuthRepository;
use crate::services::session_store;
use crate::services::SessionTransaction;

/// Session lifetimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthPolicy {
    /// Lifetime of a freshly issued session.
    pub initial_ttl: Duration,
    /// Lifetime granted by every successful validation.
    pub renew_ttl: Duration,
}

/// Authentication flow orchestrator.
///
/// Each flow runs in a single repository transaction; any error drops the
/// transaction and rolls back everything it did.
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    ids: SnowflakeGenerator,
    clock: Arc<dyn Clock>,
    policy: AuthPolicy,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(
        repo: Arc<R>,
        ids: SnowflakeGenerator,
        clock: Arc<dyn Clock>,
        policy: AuthPolicy,
    ) -> Self {
        Self {
            repo,
            ids,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> AuthPolicy {
        self.policy
    }

    /// Sign in with username and password. `user_agent` is kept for
    /// listing sessions.
    pub async fn signin(
        &self,
        username: &str,
        password: &str,
        user_agent: &str,
    ) -> Result<Session, DomainError> {
        // Read-only lookup, closed before argon2 runs. The write transaction
        // below starts with the insert.
        let mut tx = self.repo.begin().await?;
        let passhash = self.repo.find_passhash(&mut tx, username).await?;
        self.repo.commit(tx).await?;

        // Unknown users pay for a decoy verification and get the same error
        // as a wrong password.
        let verified = match passhash.as_deref() {
            Some(hash) => PasswordService::verify(password, hash)?,
            None => PasswordService::verify_decoy(password),
        };
        if !verified {
            warn!(username, known = passhash.is_some(), "Signin failed");
            return Err(DomainError::InvalidPassword);
        }

        let mut tx = self.repo.begin().await?;
        let session = self.issue_session(&mut tx, username, user_agent).await?;
        self.repo.commit(tx).await?;

        info!(username, session_id = session.id, "Signin successful");
        Ok(session)
    }

    /// Create an account using an invite token and sign it in.
    ///
    /// Invite consumption, user creation, and session creation commit
    /// together or not at all.
    pub async fn signup(
        &self,
        username: &str,
        password: &str,
        invite_token: &str,
        user_agent: &str,
    ) -> Result<Session, DomainError> {
        // Hash before opening the transaction; argon2 is slow.
        let user = User::new(username, password, Permission::default())?;

        let mut tx = self.repo.begin().await?;

        if let Err(e) = self
            .repo
            .consume_invite(&mut tx, invite_token, self.clock.now_nanos())
            .await
        {
            warn!(username, "Signup failed: invite rejected");
            return Err(e);
        }

        if let Err(e) = self.repo.create_user(&mut tx, &user).await {
            warn!(username, error = %e, "Signup failed: could not create user");
            return Err(e);
        }

        let session = self.issue_session(&mut tx, username, user_agent).await?;
        self.repo.commit(tx).await?;

        info!(
            username,
            permission = %user.permission,
            session_id = session.id,
            "Signup successful"
        );
        Ok(session)
    }

    /// Open a transaction bound to the session named by `token`.
    ///
    /// The session is renewed inside that transaction; the renewal only
    /// persists once [`SessionTransaction::commit`] is called.
    pub async fn authenticate(&self, token: &str) -> Result<SessionTransaction<R>, DomainError> {
        let mut tx = self.repo.begin().await?;
        let session = session_store::resolve(
            self.repo.as_ref(),
            &mut tx,
            token,
            self.clock.now_nanos(),
            self.policy.renew_ttl,
        )
        .await?;

        Ok(SessionTransaction::new(Arc::clone(&self.repo), tx, session))
    }

    /// Resolve and renew a session, committing immediately.
    pub async fn resolve_session(&self, token: &str) -> Result<Session, DomainError> {
        let tx = self.authenticate(token).await?;
        let session = tx.session().clone();
        tx.commit().await?;
        Ok(session)
    }

    /// Delete every expired session in a transaction of its own.
    pub async fn sweep_expired(&self) -> Result<u64, DomainError> {
        let mut tx = self.repo.begin().await?;
        let swept = self
            .repo
            .delete_expired_sessions(&mut tx, self.clock.now_nanos())
            .await?;
        self.repo.commit(tx).await?;

        debug!(swept, "Periodic session sweep");
        Ok(swept)
    }

    async fn issue_session(
        &self,
        tx: &mut R::Tx,
        username: &str,
        user_agent: &str,
    ) -> Result<Session, DomainError> {
        let now = self.clock.now_nanos();
        let session = Session::new(&self.ids, username, user_agent, now, self.policy.initial_ttl)?;
        session_store::insert(self.repo.as_ref(), tx, &session, now).await?;
        Ok(session)
    }
}
