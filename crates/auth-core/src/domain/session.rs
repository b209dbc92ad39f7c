//! Session domain entity

use std::fmt;
use std::time::Duration;

use auth_security::{generate_token, SnowflakeGenerator};

use crate::error::DomainError;

/// One authenticated device of one user.
///
/// `auth_token` is the bearer credential. It is redacted from `Debug` output
/// and must never be logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Snowflake id, used for per-session operations such as delete-by-id.
    pub id: i64,
    pub username: String,
    pub auth_token: String,
    /// Absolute expiry, nanoseconds since the Unix epoch.
    pub deadline: i64,
    /// Captured once at signin/signup, shown when listing sessions.
    pub user_agent: String,
}

impl Session {
    /// Issue a new session for `username` that expires `ttl` after `now`.
    pub fn new(
        ids: &SnowflakeGenerator,
        username: &str,
        user_agent: &str,
        now: i64,
        ttl: Duration,
    ) -> Result<Self, DomainError> {
        let auth_token = generate_token()?;

        Ok(Self {
            id: ids.generate(),
            username: username.to_string(),
            auth_token,
            deadline: deadline_after(now, ttl),
            user_agent: user_agent.to_string(),
        })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("auth_token", &"[REDACTED]")
            .field("deadline", &self.deadline)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

pub(crate) fn duration_nanos(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_nanos()).unwrap_or(i64::MAX)
}

pub fn deadline_after(now: i64, ttl: Duration) -> i64 {
    now.saturating_add(duration_nanos(ttl))
}
