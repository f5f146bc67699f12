//! SQLite implementation of the store contract.
//!
//! Each table keeps an internal `INTEGER PRIMARY KEY` surrogate alongside a
//! unique external `public_id`. Surrogates are translated to external IDs on
//! read and back on write inside this module, and never leave it.

mod credentials;
mod records;
mod schema;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use super::{StoreError, StoreResult};
use schema::SCHEMA;

/// SQLite-backed store.
///
/// The connection sits behind a mutex so a single store can be shared across
/// services as `Arc<SqliteStore>`.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a store at `path`, creating the schema if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Initialize schema.
    fn initialize(&self) -> StoreResult<()> {
        self.lock()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub(crate) fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Backend(format!("connection lock poisoned: {e}")))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, Some(message)) = &e {
            if code.code == rusqlite::ErrorCode::ConstraintViolation
                && message.starts_with("UNIQUE")
            {
                return StoreError::Conflict {
                    field: unique_field(message),
                };
            }
        }
        StoreError::Backend(e.to_string())
    }
}

/// Pull the offending column out of a violation message such as
/// `UNIQUE constraint failed: patients.dni`.
fn unique_field(message: &str) -> String {
    message
        .rsplit(':')
        .next()
        .and_then(|qualified| qualified.trim().split('.').nth(1))
        .map(str::to_string)
        .unwrap_or_else(|| "record".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        assert!(SqliteStore::open_in_memory().is_ok());
    }

    #[test]
    fn test_open_on_disk_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinica.db");

        let store = SqliteStore::open(&path).unwrap();
        drop(store);

        // Schema creation is idempotent across reopens.
        assert!(SqliteStore::open(&path).is_ok());
    }

    #[test]
    fn test_unique_field_extraction() {
        assert_eq!(unique_field("UNIQUE constraint failed: patients.dni"), "dni");
        assert_eq!(
            unique_field("UNIQUE constraint failed: credentials.username"),
            "username"
        );
        assert_eq!(unique_field("something unexpected"), "record");
    }
}
