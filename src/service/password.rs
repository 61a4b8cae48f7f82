//! Argon2id password hashing.
//!
//! Digests are PHC strings, so the per-hash salt and parameters travel with the hash.

use crate::error::ClimbwallError;
use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use std::sync::LazyLock;

/// Hash verified against when the email is unknown, so both login failures cost the same.
static DUMMY_HASH: LazyLock<Option<String>> = LazyLock::new(|| hash_password("not-a-password").ok());

pub fn hash_password(plaintext: &str) -> Result<String, ClimbwallError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ClimbwallError::PasswordHash(e.to_string()))
}

/// Constant-time check of `plaintext` against a stored digest. Malformed digests never match.
pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}

/// Burn one verification for a login attempt whose user does not exist.
pub fn verify_dummy(plaintext: &str) {
    if let Some(digest) = DUMMY_HASH.as_deref() {
        let _ = verify_password(plaintext, digest);
    }
}
