//! Credential store operations.

use rusqlite::{params, OptionalExtension};

use super::SqliteStore;
use crate::models::Credential;
use crate::store::{CredentialStore, StoreResult};

impl CredentialStore for SqliteStore {
    fn insert_credential(&self, credential: &Credential) -> StoreResult<()> {
        self.lock()?.execute(
            r#"
            INSERT INTO credentials (public_id, username, password_hash)
            VALUES (?1, ?2, ?3)
            "#,
            params![credential.id, credential.username, credential.password_hash],
        )?;
        Ok(())
    }

    fn find_credential_by_username(&self, username: &str) -> StoreResult<Option<Credential>> {
        self.lock()?
            .query_row(
                r#"
                SELECT public_id, username, password_hash
                FROM credentials
                WHERE username = ?
                "#,
                [username],
                |row| {
                    Ok(Credential {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }
}
