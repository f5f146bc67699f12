//! Identity service: practitioner registration and login.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use clinica_auth::password::PasswordError;
use clinica_auth::{token, IdGenerator, PasswordHasher};

use crate::error::ServiceError;
use crate::models::Credential;
use crate::store::CredentialStore;
use crate::validation::ValidationError;

/// Orchestrates credential creation and login token issuance.
///
/// The signing secret is fixed at construction and never re-read from the
/// environment.
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn CredentialStore>,
    ids: IdGenerator,
    hasher: PasswordHasher,
    token_secret: String,
}

impl IdentityService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        ids: IdGenerator,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            store,
            ids,
            hasher: PasswordHasher::new(),
            token_secret: token_secret.into(),
        }
    }

    /// Register a new practitioner and return the stored credential.
    ///
    /// The username existence check and the insert are not atomic: a
    /// concurrent registration can pass the check and lose the insert, in
    /// which case the store's uniqueness constraint reports the collision
    /// and it surfaces as [`ServiceError::AlreadyExists`] all the same.
    #[instrument(skip(self, password))]
    pub fn register(&self, username: &str, password: &str) -> Result<Credential, ServiceError> {
        if self.store.find_credential_by_username(username)?.is_some() {
            warn!("registration rejected: username already taken");
            return Err(ServiceError::AlreadyExists("username".to_string()));
        }

        let password_hash = self.hasher.hash(password).map_err(|e| match e {
            PasswordError::Empty => ServiceError::Validation(ValidationError::EmptyPassword),
            other => {
                error!(error = %other, "password hashing failed");
                ServiceError::Internal(other.to_string())
            }
        })?;

        let id = self.ids.new_id().map_err(|e| {
            error!(error = %e, "identifier generation failed");
            ServiceError::Internal(e.to_string())
        })?;

        let credential = Credential {
            id,
            username: username.to_string(),
            password_hash,
        };
        self.store.insert_credential(&credential)?;

        info!(credential_id = %credential.id, "practitioner registered");
        Ok(credential)
    }

    /// Log a practitioner in, returning a bearer token.
    ///
    /// An unknown username and a wrong password are indistinguishable to the
    /// caller; the distinction exists only in the logs.
    #[instrument(skip(self, password))]
    pub fn login(&self, username: &str, password: &str) -> Result<String, ServiceError> {
        let credential = match self.store.find_credential_by_username(username)? {
            Some(credential) => credential,
            None => {
                warn!("login failed: unknown username");
                return Err(ServiceError::InvalidCredentials);
            }
        };

        if let Err(e) = self.hasher.verify(password, &credential.password_hash) {
            match e {
                PasswordError::Mismatch => warn!("login failed: wrong password"),
                other => warn!(error = %other, "login failed: digest check errored"),
            }
            return Err(ServiceError::InvalidCredentials);
        }

        let token = token::issue(&credential.id, &self.token_secret).map_err(|e| {
            error!(error = %e, "token issuance failed");
            ServiceError::Internal(e.to_string())
        })?;

        info!(credential_id = %credential.id, "login succeeded");
        Ok(token)
    }

    /// Validate a bearer token and return the subject credential ID.
    ///
    /// Expired, badly signed, and malformed tokens all collapse to
    /// [`ServiceError::InvalidToken`] for the caller; the specific cause is
    /// logged here.
    pub fn validate_token(&self, token: &str) -> Result<String, ServiceError> {
        token::verify(token, &self.token_secret).map_err(|e| {
            warn!(error = %e, "token rejected");
            ServiceError::InvalidToken
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    const SECRET: &str = "unit-test-secret";

    fn service() -> IdentityService {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        IdentityService::new(store, IdGenerator::new(), SECRET)
    }

    #[test]
    fn test_register_returns_credential_with_id() {
        let identity = service();
        let credential = identity.register("doc", "password").unwrap();

        assert!(!credential.id.is_empty());
        assert_eq!(credential.username, "doc");
        // The digest is not the plaintext and carries its own salt.
        assert_ne!(credential.password_hash, "password");
    }

    #[test]
    fn test_register_duplicate_username() {
        let identity = service();
        identity.register("doc", "password").unwrap();

        let err = identity.register("doc", "other-password").unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyExists(field) if field == "username"));
    }

    #[test]
    fn test_register_rejects_empty_password() {
        let identity = service();
        let err = identity.register("doc", "").unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::EmptyPassword)
        ));
    }

    #[test]
    fn test_login_token_binds_subject() {
        let identity = service();
        let credential = identity.register("doc", "password").unwrap();

        let token = identity.login("doc", "password").unwrap();
        assert!(!token.is_empty());

        let subject = identity.validate_token(&token).unwrap();
        assert_eq!(subject, credential.id);
    }

    #[test]
    fn test_login_failures_collapse_to_invalid_credentials() {
        let identity = service();
        identity.register("doc", "password").unwrap();

        let wrong_password = identity.login("doc", "wrong").unwrap_err();
        let unknown_user = identity.login("nobody", "password").unwrap_err();

        assert!(matches!(wrong_password, ServiceError::InvalidCredentials));
        assert!(matches!(unknown_user, ServiceError::InvalidCredentials));
    }

    #[test]
    fn test_validate_token_rejects_garbage() {
        let identity = service();
        let err = identity.validate_token("not-a-token").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidToken));
    }

    #[test]
    fn test_validate_token_rejects_foreign_secret() {
        let identity = service();
        identity.register("doc", "password").unwrap();
        let token = identity.login("doc", "password").unwrap();

        let other = {
            let store = Arc::new(SqliteStore::open_in_memory().unwrap());
            IdentityService::new(store, IdGenerator::new(), "another-secret")
        };
        let err = other.validate_token(&token).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidToken));
    }
}
