//! Application-wide constants

/// Initial lifetime of a freshly issued session: 7 days.
pub const DEFAULT_TOKEN_LIFESPAN_SECS: u64 = 7 * 24 * 60 * 60;
/// Lifetime granted on every successful validation.
pub const DEFAULT_RENEW_LIFESPAN_SECS: u64 = 7 * 24 * 60 * 60;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;
pub const SESSION_COOKIE: &str = "token";
pub const MIN_USERNAME_LENGTH: u64 = 1;
pub const MAX_USERNAME_LENGTH: u64 = 64;
pub const MIN_PASSWORD_LENGTH: u64 = 8;
pub const MAX_PASSWORD_LENGTH: u64 = 128;
