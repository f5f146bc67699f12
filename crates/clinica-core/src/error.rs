//! Service-level error taxonomy.
//!
//! Everything a service hands back to its caller is one of these kinds; the
//! transport layer translates them into status codes. Validation and lookup
//! failures propagate untouched, nothing is retried, and no failure here is
//! fatal to the process.

use thiserror::Error;

use crate::store::StoreError;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Unknown username or wrong password; deliberately indistinguishable to
    /// the caller.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A unique field collided with an existing record.
    #[error("{0} already taken")]
    AlreadyExists(String),

    /// A structural or business rule was violated; carries which rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced entity does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// Malformed, expired, or badly signed token; collapsed to one kind for
    /// callers, with the distinction logged where it is detected.
    #[error("invalid token")]
    InvalidToken,

    /// Hashing, identifier, or storage failure not attributable to caller
    /// input.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict { field } => ServiceError::AlreadyExists(field),
            StoreError::NotFound(what) => ServiceError::NotFound(what),
            StoreError::Backend(message) => ServiceError::Internal(message),
        }
    }
}
