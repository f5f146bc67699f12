//! Domain validation rules.
//!
//! Pure, synchronous checks that gate every write: the DNI checksum, a
//! permissive email shape, and the per-entity rule chains. Entity checks
//! short-circuit on the first violated rule and never aggregate errors.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::{NewDiagnosis, Patient};

/// Checksum alphabet for DNI numbers, indexed by `digits mod 23`.
const DNI_LETTERS: &[u8; 23] = b"TRWAGMYFPDXBNJZSQVHLCKE";

static DNI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{8}[TRWAGMYFPDXBNJZSQVHLCKE]$").expect("DNI pattern compiles"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

/// A violated validation rule. One variant per rule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("patient ID cannot be empty")]
    EmptyPatientId,
    #[error("patient name cannot be empty")]
    EmptyName,
    #[error("patient DNI cannot be empty")]
    EmptyDni,
    #[error("invalid DNI format")]
    InvalidDni,
    #[error("patient email cannot be empty")]
    EmptyEmail,
    #[error("invalid email format")]
    InvalidEmail,
    #[error("patient ID is required for diagnosis")]
    MissingPatientRef,
    #[error("diagnosis text cannot be empty")]
    EmptyDiagnosisText,
    #[error("diagnosis date is required")]
    MissingDate,
    #[error("password cannot be empty")]
    EmptyPassword,
}

/// Check that a DNI is mathematically consistent.
///
/// The value is trimmed and uppercased, then must be exactly eight digits
/// followed by the letter `DNI_LETTERS[digits % 23]`. This only rejects
/// inconsistent values; it cannot tell whether a document was actually
/// issued.
pub fn validate_dni(value: &str) -> Result<(), ValidationError> {
    let dni = value.trim().to_uppercase();
    if !DNI_RE.is_match(&dni) {
        return Err(ValidationError::InvalidDni);
    }

    let digits: u32 = dni[..8].parse().map_err(|_| ValidationError::InvalidDni)?;
    let expected = DNI_LETTERS[(digits % 23) as usize];
    if dni.as_bytes()[8] != expected {
        return Err(ValidationError::InvalidDni);
    }
    Ok(())
}

/// Permissive email shape check: local part, `@`, and a domain with at least
/// one dot. Deliberately not RFC-5322-complete.
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Check a patient entity. The first violated rule wins, in order: empty ID,
/// empty name, empty or malformed DNI, empty or malformed email.
pub fn validate_patient(patient: &Patient) -> Result<(), ValidationError> {
    if patient.id.is_empty() {
        return Err(ValidationError::EmptyPatientId);
    }
    if patient.name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if patient.dni.is_empty() {
        return Err(ValidationError::EmptyDni);
    }
    validate_dni(&patient.dni)?;
    if patient.email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    validate_email(&patient.email)
}

/// Check a diagnosis draft and return its event date. The first violated
/// rule wins, in order: missing patient reference, empty diagnosis text,
/// absent event date.
pub fn validate_new_diagnosis(draft: &NewDiagnosis) -> Result<DateTime<Utc>, ValidationError> {
    if draft.patient_id.is_empty() {
        return Err(ValidationError::MissingPatientRef);
    }
    if draft.diagnosis.is_empty() {
        return Err(ValidationError::EmptyDiagnosisText);
    }
    draft.date.ok_or(ValidationError::MissingDate)
}
