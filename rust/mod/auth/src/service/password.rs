//! Credential hashing: argon2id with a fresh random salt per call.

use std::sync::LazyLock;

use argon2::Argon2;
use password_hash::rand_core::OsRng;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::service::AuthError;

/// Stand-in hash checked when a login names no live member.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash("board-no-such-member").unwrap_or_default());

#[cfg(test)]
thread_local! {
    pub(crate) static VERIFY_CALLS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Hash a secret into a PHC string.
pub fn hash(secret: &str) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::Validation("password must not be empty".into()));
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Internal(format!("password hash failed: {}", e)))
}

/// Verify a secret against a stored hash.
///
/// Returns false on mismatch and on a hash that does not parse.
pub fn verify(secret: &str, hash: &str) -> bool {
    #[cfg(test)]
    VERIFY_CALLS.with(|calls| calls.set(calls.get() + 1));
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Run a full verify against the stand-in hash and discard the outcome.
///
/// Keeps an unknown-account login as slow as a wrong-password one.
pub fn verify_dummy(secret: &str) {
    let _ = verify(secret, &DUMMY_HASH);
}
