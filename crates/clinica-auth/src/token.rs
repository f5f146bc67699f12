//! Bearer token issuance and verification.
//!
//! Tokens are compact HS256 JWTs binding a subject identity to an absolute
//! expiry 72 hours after issuance. Verification accepts HS256 and nothing
//! else: a token whose header claims any other algorithm is rejected as
//! malformed instead of being dispatched to its claimed scheme. There is no
//! revocation; a token stays valid until it expires.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token lifetime from issuance to expiry.
const TOKEN_TTL_HOURS: i64 = 72;

/// Errors from issuing or verifying a token.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token subject cannot be empty")]
    EmptySubject,

    /// The MAC does not validate against the supplied secret.
    #[error("token signature does not validate")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    /// Unparseable structure, or a header claiming a non-HS256 algorithm.
    #[error("token is malformed")]
    Malformed,

    #[error("token signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Issue a signed token for `subject`, expiring 72 hours from now.
pub fn issue(subject: &str, secret: &str) -> Result<String, TokenError> {
    if subject.is_empty() {
        return Err(TokenError::EmptySubject);
    }

    let claims = Claims {
        sub: subject.to_string(),
        exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verify a token against `secret` and return its subject.
pub fn verify(token: &str, secret: &str) -> Result<String, TokenError> {
    // Restricting the accepted algorithm set to HS256 is what rejects
    // algorithm-substitution tokens before any key material is touched.
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;
    Ok(data.claims.sub)
}
