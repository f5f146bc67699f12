//! Persistence contract for the clinic core.
//!
//! Services talk to storage through these narrow traits; the SQLite adapter
//! in [`sqlite`] is the bundled implementation. Every identifier in these
//! signatures is an external ID; internal storage surrogate keys never
//! cross this boundary.

pub mod sqlite;

pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Credential, Diagnosis, Patient};

/// Storage failures, already translated out of backend-specific error
/// spaces.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique field collided with an existing row.
    #[error("{field} already exists")]
    Conflict { field: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations for practitioner credentials.
pub trait CredentialStore: Send + Sync {
    /// Persist a new credential. Username collisions surface as
    /// [`StoreError::Conflict`].
    fn insert_credential(&self, credential: &Credential) -> StoreResult<()>;

    fn find_credential_by_username(&self, username: &str) -> StoreResult<Option<Credential>>;
}

/// Persistence operations for patients and diagnoses.
pub trait RecordStore: Send + Sync {
    /// Persist a new patient. DNI collisions surface as
    /// [`StoreError::Conflict`].
    fn insert_patient(&self, patient: &Patient) -> StoreResult<()>;

    fn find_patient_by_id(&self, id: &str) -> StoreResult<Option<Patient>>;

    fn find_patient_by_dni(&self, dni: &str) -> StoreResult<Option<Patient>>;

    /// Persist a new diagnosis. The referenced patient must already exist.
    fn insert_diagnosis(&self, diagnosis: &Diagnosis) -> StoreResult<()>;

    fn find_diagnosis_by_id(&self, id: &str) -> StoreResult<Option<Diagnosis>>;

    /// Search diagnoses by owning-patient name substring (case-insensitive)
    /// and inclusive event-date range. Absent filters match everything.
    /// Result ordering is storage-determined and not part of the contract.
    fn search_diagnoses(
        &self,
        patient_name: Option<&str>,
        date_start: Option<DateTime<Utc>>,
        date_end: Option<DateTime<Utc>>,
    ) -> StoreResult<Vec<Diagnosis>>;
}
