//! Password hashing for protected short URLs.
//!
//! New hashes are Argon2id PHC strings. Snapshots written before that used
//! unsalted SHA-256 hex digests; those are still verified.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(String);

/// Hashes `password` with Argon2id and a fresh random salt.
pub fn hash(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError(e.to_string()))
}

/// Returns true iff `password` matches `stored`.
///
/// Unparseable hashes never match.
pub fn verify(password: &str, stored: &str) -> bool {
    if is_legacy_hash(stored) {
        let digest = hex::encode(Sha256::digest(password.as_bytes()));
        return digest.eq_ignore_ascii_case(stored);
    }

    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is not a valid PHC string");
            false
        }
    }
}

/// Hashes an optional password given at creation. Absent or empty means
/// the record stays open.
pub fn hash_optional(password: Option<&str>) -> Result<Option<String>, PasswordError> {
    match password {
        Some(password) if !password.is_empty() => hash(password).map(Some),
        _ => Ok(None),
    }
}

fn is_legacy_hash(stored: &str) -> bool {
    stored.len() == 64 && stored.bytes().all(|b| b.is_ascii_hexdigit())
}
