//! Bearer token generation

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, TryCryptoRng, TryRngCore};
use thiserror::Error;

/// 256 bits of entropy per token.
pub const TOKEN_BYTES: usize = 32;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Randomness unavailable: {0}")]
    RandomnessUnavailable(String),
}

/// Generate a bearer token from the operating system CSPRNG.
///
/// The result is URL-safe base64 without padding (43 characters), usable
/// as a cookie value and as a unique database key.
pub fn generate_token() -> Result<String, TokenError> {
    generate_token_with(&mut OsRng)
}

/// Generate a token from the given RNG. An RNG failure is returned as
/// [`TokenError::RandomnessUnavailable`]; there is no fallback source.
pub fn generate_token_with<R: TryCryptoRng + ?Sized>(rng: &mut R) -> Result<String, TokenError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    rng.try_fill_bytes(&mut bytes)
        .map_err(|e| TokenError::RandomnessUnavailable(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
