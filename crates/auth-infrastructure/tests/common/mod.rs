#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use auth_core::{AuthPolicy, AuthRepository, AuthService, InviteToken, ManualClock, Session};
use auth_infrastructure::SqlAuthRepository;
use auth_security::SnowflakeGenerator;

pub const HOUR: Duration = Duration::from_secs(3600);
pub const PASSWORD: &str = "password123";

pub struct Harness {
    pub service: Arc<AuthService<SqlAuthRepository>>,
    pub repo: Arc<SqlAuthRepository>,
    pub clock: Arc<ManualClock>,
    _db_file: Option<TempDbFile>,
}

/// SQLite file removed, with its journal files, when the harness drops.
struct TempDbFile(PathBuf);

impl Drop for TempDbFile {
    fn drop(&mut self) {
        for suffix in ["", "-journal", "-wal", "-shm"] {
            let mut path = self.0.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

const DEFAULT_POLICY: AuthPolicy = AuthPolicy {
    initial_ttl: HOUR,
    renew_ttl: HOUR,
};

/// In-memory store on a single connection.
pub async fn harness() -> Harness {
    harness_with(DEFAULT_POLICY).await
}

pub async fn harness_with(policy: AuthPolicy) -> Harness {
    let repo = SqlAuthRepository::in_memory().await.unwrap();
    build(repo, policy, None)
}

/// File-backed store behind a pool of several connections, so concurrent
/// transactions really overlap.
pub async fn file_harness() -> Harness {
    let path = std::env::temp_dir().join(format!("auth-test-{}.db", uuid::Uuid::new_v4()));
    let file = TempDbFile(path.clone());
    let url = format!("sqlite:{}?mode=rwc", path.display());
    let repo = SqlAuthRepository::connect(&url, 5).await.unwrap();
    build(repo, DEFAULT_POLICY, Some(file))
}

fn build(repo: SqlAuthRepository, policy: AuthPolicy, db_file: Option<TempDbFile>) -> Harness {
    let repo = Arc::new(repo);
    let clock = Arc::new(ManualClock::starting_now());
    let service = Arc::new(AuthService::new(
        repo.clone(),
        SnowflakeGenerator::new(1).unwrap(),
        clock.clone(),
        policy,
    ));
    Harness {
        service,
        repo,
        clock,
        _db_file: db_file,
    }
}

impl Harness {
    pub async fn seed_invite(&self, token: &str, remaining: i64, deadline: Option<i64>) {
        let mut tx = self.repo.begin().await.unwrap();
        self.repo
            .insert_invite(
                &mut tx,
                &InviteToken {
                    token: token.to_string(),
                    creator: "owner".to_string(),
                    remaining,
                    deadline,
                },
            )
            .await
            .unwrap();
        self.repo.commit(tx).await.unwrap();
    }

    /// Sign up `username` with a fresh single-use invite.
    pub async fn signup(&self, username: &str) -> Session {
        let invite = format!("invite-{username}");
        self.seed_invite(&invite, 1, None).await;
        self.service
            .signup(username, PASSWORD, &invite, "test-agent")
            .await
            .unwrap()
    }

    pub async fn count(&self, sql: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(sql)
            .fetch_one(self.repo.pool())
            .await
            .unwrap()
    }

    pub async fn stored_deadline(&self, token: &str) -> Option<i64> {
        sqlx::query_scalar::<_, i64>("SELECT deadline FROM sessions WHERE authtoken = $1")
            .bind(token)
            .fetch_optional(self.repo.pool())
            .await
            .unwrap()
    }

    pub async fn invite_remaining(&self, token: &str) -> Option<i64> {
        sqlx::query_scalar::<_, i64>("SELECT remaining FROM invite_tokens WHERE token = $1")
            .bind(token)
            .fetch_optional(self.repo.pool())
            .await
            .unwrap()
    }
}

pub fn nanos(d: Duration) -> i64 {
    d.as_nanos() as i64
}
