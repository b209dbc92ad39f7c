//! Database connection pool

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use std::time::Duration;

/// Connect to SQLite or PostgreSQL, picked by the URL scheme.
///
/// An in-memory SQLite database lives only as long as its connections, so
/// for `mode=memory` URLs the pool keeps exactly one connection open forever.
pub async fn create_pool(url: &str, max_connections: u32) -> Result<AnyPool, sqlx::Error> {
    sqlx::any::install_default_drivers();

    let options = if is_sqlite_memory(url) {
        AnyPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        AnyPoolOptions::new().max_connections(max_connections)
    };

    options
        .acquire_timeout(Duration::from_secs(3))
        .connect(url)
        .await
}

fn is_sqlite_memory(url: &str) -> bool {
    url.starts_with("sqlite:") && (url.contains(":memory:") || url.contains("mode=memory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_sqlite_memory() {
        assert!(is_sqlite_memory("sqlite::memory:"));
        assert!(is_sqlite_memory("sqlite:file:mem_1?mode=memory&cache=shared"));
        assert!(!is_sqlite_memory("sqlite:auth.db?mode=rwc"));
        assert!(!is_sqlite_memory("postgres://localhost/auth"));
    }
}
