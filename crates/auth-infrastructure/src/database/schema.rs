//! SQL schema
//!
//! Portable between SQLite and PostgreSQL. Deadlines are BIGINT nanoseconds
//! since the Unix epoch.

use sqlx::AnyPool;

pub const CREATE_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        username TEXT PRIMARY KEY NOT NULL,
        passhash TEXT NOT NULL,
        permission BIGINT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS sessions (
        id BIGINT PRIMARY KEY NOT NULL,
        username TEXT NOT NULL REFERENCES users (username) ON DELETE CASCADE,
        authtoken TEXT NOT NULL UNIQUE,
        deadline BIGINT NOT NULL,
        useragent TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS sessions_username_idx ON sessions (username)",
    "CREATE INDEX IF NOT EXISTS sessions_deadline_idx ON sessions (deadline)",
    // remaining < 0 means unlimited uses
    "CREATE TABLE IF NOT EXISTS invite_tokens (
        token TEXT PRIMARY KEY NOT NULL,
        creator TEXT NOT NULL,
        remaining BIGINT NOT NULL,
        deadline BIGINT
    )",
];

/// Create any missing tables and indexes.
pub async fn initialize(pool: &AnyPool) -> Result<(), sqlx::Error> {
    for statement in CREATE_TABLES {
        sqlx::query(*statement).execute(pool).await?;
    }
    Ok(())
}
