// ============================================================================
// Auth Infrastructure - SQL Auth Repository
// File: crates/auth-infrastructure/src/database/sql/auth_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::{Any, AnyPool, FromRow, Transaction};
use tracing::{error, info};

use auth_core::domain::{InviteToken, Session, User};
use auth_core::error::DomainError;
use auth_core::repositories::AuthRepository;

use super::{is_unique_violation, SqlxResultExt};
use crate::database::{connection, schema};

/// [`AuthRepository`] over a sqlx `AnyPool` (SQLite or PostgreSQL).
#[derive(Clone)]
pub struct SqlAuthRepository {
    pool: AnyPool,
}

impl SqlAuthRepository {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Connect and create the schema if it is missing.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DomainError> {
        let pool = connection::create_pool(url, max_connections)
            .await
            .db_context("Failed to connect to database")?;
        schema::initialize(&pool)
            .await
            .db_context("Failed to initialize schema")?;
        Ok(Self::new(pool))
    }

    /// Private in-memory SQLite database, for tests and local runs.
    pub async fn in_memory() -> Result<Self, DomainError> {
        let url = format!("sqlite:file:mem_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
        Self::connect(&url, 1).await
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct SessionRow {
    id: i64,
    username: String,
    authtoken: String,
    deadline: i64,
    useragent: String,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: row.id,
            username: row.username,
            auth_token: row.authtoken,
            deadline: row.deadline,
            user_agent: row.useragent,
        }
    }
}

#[async_trait]
impl AuthRepository for SqlAuthRepository {
    type Tx = Transaction<'static, Any>;

    async fn begin(&self) -> Result<Self::Tx, DomainError> {
        self.pool.begin().await.db_context("Failed to begin transaction")
    }

    async fn commit(&self, tx: Self::Tx) -> Result<(), DomainError> {
        tx.commit().await.db_context("Failed to commit transaction")
    }

    async fn renew_session(
        &self,
        tx: &mut Self::Tx,
        token: &str,
        now: i64,
        deadline: i64,
    ) -> Result<Option<Session>, DomainError> {
        let row: Option<SessionRow> = sqlx::query_as(
            "UPDATE sessions SET deadline = $1
             WHERE authtoken = $2 AND deadline >= $3
             RETURNING id, username, authtoken, deadline, useragent",
        )
        .bind(deadline)
        .bind(token)
        .bind(now)
        .fetch_optional(&mut **tx)
        .await
        .db_context("Failed to renew token")?;

        Ok(row.map(Session::from))
    }

    async fn insert_session(&self, tx: &mut Self::Tx, session: &Session) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO sessions (id, username, authtoken, deadline, useragent)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(session.id)
        .bind(&session.username)
        .bind(&session.auth_token)
        .bind(session.deadline)
        .bind(&session.user_agent)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                // Never overwrite: a colliding id or token aborts the insert.
                error!(session_id = session.id, "Session id or token collision");
                DomainError::DatabaseError("Failed to save session: duplicate id or token".into())
            } else {
                error!("Failed to save session: {}", e);
                DomainError::DatabaseError(format!("Failed to save session: {e}"))
            }
        })?;
        Ok(())
    }

    async fn delete_expired_sessions(&self, tx: &mut Self::Tx, now: i64) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE deadline < $1")
            .bind(now)
            .execute(&mut **tx)
            .await
            .db_context("Failed to cleanup expired sessions")?;
        Ok(result.rows_affected())
    }

    async fn delete_session_by_token(&self, tx: &mut Self::Tx, token: &str) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE authtoken = $1")
            .bind(token)
            .execute(&mut **tx)
            .await
            .db_context("Failed to delete token")?;
        Ok(result.rows_affected())
    }

    async fn delete_session_by_id(
        &self,
        tx: &mut Self::Tx,
        id: i64,
        username: &str,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1 AND username = $2")
            .bind(id)
            .bind(username)
            .execute(&mut **tx)
            .await
            .db_context("Failed to delete token with ID")?;
        Ok(result.rows_affected())
    }

    async fn list_sessions(&self, tx: &mut Self::Tx, username: &str) -> Result<Vec<Session>, DomainError> {
        let rows: Vec<SessionRow> = sqlx::query_as(
            "SELECT id, username, authtoken, deadline, useragent
             FROM sessions
             WHERE username = $1",
        )
        .bind(username)
        .fetch_all(&mut **tx)
        .await
        .db_context("Failed to query for sessions")?;

        Ok(rows.into_iter().map(Session::from).collect())
    }

    async fn find_passhash(&self, tx: &mut Self::Tx, username: &str) -> Result<Option<String>, DomainError> {
        sqlx::query_scalar::<_, String>("SELECT passhash FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&mut **tx)
            .await
            .db_context("Failed to scan for password")
    }

    async fn create_user(&self, tx: &mut Self::Tx, user: &User) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO users (username, passhash, permission) VALUES ($1, $2, $3)")
            .bind(&user.username)
            .bind(&user.passhash)
            .bind(user.permission.as_i64())
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::UsernameTaken
                } else {
                    error!("Failed to create user: {}", e);
                    DomainError::DatabaseError(format!("Failed to create user: {e}"))
                }
            })?;

        info!(username = %user.username, permission = %user.permission, "User created");
        Ok(())
    }

    async fn consume_invite(&self, tx: &mut Self::Tx, token: &str, now: i64) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE invite_tokens
             SET remaining = CASE WHEN remaining < 0 THEN remaining ELSE remaining - 1 END
             WHERE token = $1
               AND remaining <> 0
               AND (deadline IS NULL OR deadline >= $2)",
        )
        .bind(token)
        .bind(now)
        .execute(&mut **tx)
        .await
        .db_context("Failed to use invite token")?;

        if result.rows_affected() == 0 {
            return Err(DomainError::InvalidToken);
        }

        sqlx::query("DELETE FROM invite_tokens WHERE token = $1 AND remaining = 0")
            .bind(token)
            .execute(&mut **tx)
            .await
            .db_context("Failed to remove exhausted invite token")?;
        Ok(())
    }

    async fn insert_invite(&self, tx: &mut Self::Tx, invite: &InviteToken) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO invite_tokens (token, creator, remaining, deadline)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&invite.token)
        .bind(&invite.creator)
        .bind(invite.remaining)
        .bind(invite.deadline)
        .execute(&mut **tx)
        .await
        .db_context("Failed to save invite token")?;
        Ok(())
    }
}
