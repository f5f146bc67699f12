//! Records service: patient and diagnosis management.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};

use clinica_auth::IdGenerator;

use crate::error::ServiceError;
use crate::models::{Diagnosis, NewDiagnosis, NewPatient, Patient};
use crate::store::RecordStore;
use crate::validation;

/// Orchestrates patient and diagnosis creation and diagnosis search.
#[derive(Clone)]
pub struct RecordsService {
    store: Arc<dyn RecordStore>,
    ids: IdGenerator,
}

impl RecordsService {
    pub fn new(store: Arc<dyn RecordStore>, ids: IdGenerator) -> Self {
        Self { store, ids }
    }

    /// Create a patient: assign a fresh ID, validate, persist.
    ///
    /// Validation failures come back verbatim; a DNI collision surfaces as
    /// [`ServiceError::AlreadyExists`].
    #[instrument(skip(self, draft), fields(dni = %draft.dni))]
    pub fn create_patient(&self, draft: NewPatient) -> Result<Patient, ServiceError> {
        let id = self.ids.new_id().map_err(|e| {
            error!(error = %e, "identifier generation failed");
            ServiceError::Internal(e.to_string())
        })?;
        let patient = Patient::from_draft(id, draft);

        if let Err(e) = validation::validate_patient(&patient) {
            warn!(error = %e, "patient validation failed");
            return Err(e.into());
        }

        self.store.insert_patient(&patient)?;
        info!(patient_id = %patient.id, "patient created");
        Ok(patient)
    }

    /// Record a diagnosis: assign a fresh ID, validate the draft, require
    /// the referenced patient to exist, persist.
    #[instrument(skip(self, draft), fields(patient_id = %draft.patient_id))]
    pub fn create_diagnosis(&self, draft: NewDiagnosis) -> Result<Diagnosis, ServiceError> {
        let id = self.ids.new_id().map_err(|e| {
            error!(error = %e, "identifier generation failed");
            ServiceError::Internal(e.to_string())
        })?;

        let date = match validation::validate_new_diagnosis(&draft) {
            Ok(date) => date,
            Err(e) => {
                warn!(error = %e, "diagnosis validation failed");
                return Err(e.into());
            }
        };

        if self.store.find_patient_by_id(&draft.patient_id)?.is_none() {
            warn!("diagnosis rejected: patient not found");
            return Err(ServiceError::NotFound(format!(
                "patient {}",
                draft.patient_id
            )));
        }

        let diagnosis = Diagnosis {
            id,
            patient_id: draft.patient_id,
            diagnosis: draft.diagnosis,
            prescription: draft.prescription,
            date,
            created_at: Utc::now(),
        };
        self.store.insert_diagnosis(&diagnosis)?;

        info!(diagnosis_id = %diagnosis.id, "diagnosis recorded");
        Ok(diagnosis)
    }

    /// Search diagnoses by owning-patient name substring and event-date
    /// range. Every filter is optional; with none given, the full set comes
    /// back. Result ordering is storage-determined.
    pub fn search_diagnoses(
        &self,
        patient_name: Option<&str>,
        date_start: Option<DateTime<Utc>>,
        date_end: Option<DateTime<Utc>>,
    ) -> Result<Vec<Diagnosis>, ServiceError> {
        Ok(self
            .store
            .search_diagnoses(patient_name, date_start, date_end)?)
    }

    /// Look a patient up by document number.
    pub fn get_patient(&self, dni: &str) -> Result<Patient, ServiceError> {
        self.store
            .find_patient_by_dni(dni)?
            .ok_or_else(|| ServiceError::NotFound(format!("patient with DNI {dni}")))
    }
}
