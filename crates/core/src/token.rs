//! Bearer token generation and hashing.
//!
//! Access and refresh tokens are opaque random strings. The access
//! token is stored raw (it is the exact-match lookup key); the refresh
//! token is stored only as its SHA-256 hex digest so a database leak
//! does not compromise active sessions.

use rand::Rng;

/// Length of a generated token in alphanumeric characters.
///
/// 48 characters at ~5.95 bits each is well above the 128-bit entropy
/// floor required for bearer credentials.
pub const TOKEN_LENGTH: usize = 48;

/// Generate a cryptographically random bearer token.
///
/// The plaintext is handed to the caller exactly once and must never
/// be logged.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Compute the SHA-256 hex digest of a token.
///
/// Used both when a refresh token is minted (to store the hash) and
/// when one is presented (to compare against the stored hash).
pub fn hash_token(token: &str) -> String {
    crate::hashing::sha256_hex(token.as_bytes())
}
