//! Password hashing and verification.
//!
//! Argon2id with a fixed cost profile and a random per-call salt embedded in
//! the PHC-format digest, so two hashes of the same password never match
//! textually. The comparison inside verification is constant-time in the
//! underlying primitive; the cost profile is not caller-tunable.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};
use thiserror::Error;

/// Errors from hashing or checking a password.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password cannot be empty")]
    Empty,

    /// The password does not correspond to the digest.
    #[error("password mismatch")]
    Mismatch,

    /// The stored digest is not a parseable PHC string.
    #[error("stored digest is malformed")]
    BadDigest,

    #[error("hashing failed: {0}")]
    Hashing(String),
}

/// One-way salted password hasher with a fixed cost profile.
#[derive(Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        // Argon2id v19 with the crate's default cost parameters. The profile
        // is a module-wide constant; callers never tune it.
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hash a password under a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::Empty);
        }

        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;
        Ok(digest.to_string())
    }

    /// Check a password against a stored digest.
    pub fn verify(&self, password: &str, digest: &str) -> Result<(), PasswordError> {
        let parsed = PasswordHash::new(digest).map_err(|_| PasswordError::BadDigest)?;
        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|e| match e {
                argon2::password_hash::Error::Password => PasswordError::Mismatch,
                other => PasswordError::Hashing(other.to_string()),
            })
    }
}
