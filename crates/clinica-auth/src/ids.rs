//! Opaque external identifier generation.
//!
//! Every entity gets a ULID as its public primary key: a 48-bit millisecond
//! timestamp followed by 80 bits of randomness, encoded as 26 characters of
//! Crockford base32. IDs are lexically time-sortable, and IDs minted within
//! the same millisecond stay sorted because the random component increments
//! monotonically between calls.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use ulid::Generator;

/// Errors when minting an identifier.
#[derive(Debug, Error)]
pub enum IdError {
    /// The monotonic random component overflowed within a single millisecond.
    #[error("identifier randomness exhausted")]
    RandomnessExhausted,

    /// The generator lock was poisoned by a panicking holder.
    #[error("identifier generator lock poisoned")]
    Poisoned,
}

/// Mints unique, time-sortable external identifiers.
///
/// Clones share the same monotonic state, so a single generator handle can be
/// handed to every service in the process.
#[derive(Clone)]
pub struct IdGenerator {
    inner: Arc<Mutex<Generator>>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Generator::new())),
        }
    }

    /// Mint a fresh identifier.
    pub fn new_id(&self) -> Result<String, IdError> {
        let mut generator = self.inner.lock().map_err(|_| IdError::Poisoned)?;
        let id = generator
            .generate()
            .map_err(|_| IdError::RandomnessExhausted)?;
        Ok(id.to_string())
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
