//! Practitioner credentials.

/// A practitioner login credential.
///
/// The password is held only as a salted one-way digest; the plaintext never
/// reaches storage. Credentials are created at registration and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// External identifier, assigned once at creation
    pub id: String,
    /// Unique login name
    pub username: String,
    /// PHC-format password digest
    pub password_hash: String,
}
