//! Password hashing with Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::LazyLock;
use thiserror::Error;

/// Verified against when an account does not exist, so unknown usernames
/// cost the same argon2 work as wrong passwords.
static DECOY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| PasswordService::hash("decoy-password-for-unknown-users").ok());

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
}

pub struct PasswordService;

impl PasswordService {
    /// Hash with a fresh random salt into a PHC string.
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    /// Constant-time check of `password` against a stored PHC hash.
    ///
    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Spend one verification on the decoy hash. Always `false`.
    pub fn verify_decoy(password: &str) -> bool {
        if let Some(hash) = DECOY_HASH.as_deref() {
            let _ = Self::verify(password, hash);
        }
        false
    }
}
