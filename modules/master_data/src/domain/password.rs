//! Argon2 hashing for user passwords. Plain text never reaches storage.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::error::DomainError;
use crate::contract::{Password, PasswordDigest};

/// Hash `plain` into a PHC string with a fresh random salt.
pub fn hash(plain: &Password) -> Result<PasswordDigest, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.expose().as_bytes(), &salt)
        .map(|h| PasswordDigest::from_stored(h.to_string()))
        .map_err(|e| DomainError::internal(format!("password hashing failed: {e}")))
}

/// Whether `plain` matches `digest`. A malformed digest never matches.
pub fn verify(plain: &str, digest: &PasswordDigest) -> bool {
    let Ok(parsed) = PasswordHash::new(digest.as_str()) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}
