//! Diagnosis records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded diagnosis for a patient.
///
/// `date` is the clinical event date and is distinct from `created_at`, the
/// moment the record entered the system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagnosis {
    /// External identifier, assigned once at creation
    pub id: String,
    /// External ID of the owning patient
    pub patient_id: String,
    /// Free-text diagnosis
    pub diagnosis: String,
    /// Free-text prescription
    pub prescription: String,
    /// Clinical event date
    pub date: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied diagnosis fields, before an identifier is assigned.
///
/// The event date is required but arrives unvalidated, so it stays an
/// `Option` here; a constructed [`Diagnosis`] always carries a real date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDiagnosis {
    pub patient_id: String,
    pub diagnosis: String,
    #[serde(default)]
    pub prescription: String,
    pub date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_wire_field_names() {
        let diagnosis = Diagnosis {
            id: "01ARZ3NDEKTSV4RRFFQ69G5FAV".into(),
            patient_id: "01ARZ3NDEKTSV4RRFFQ69G5FAW".into(),
            diagnosis: "Fever".into(),
            prescription: "Rest and fluids".into(),
            date: Utc.with_ymd_and_hms(2023, 11, 1, 10, 0, 0).unwrap(),
            created_at: Utc.with_ymd_and_hms(2023, 11, 1, 10, 5, 0).unwrap(),
        };

        let value = serde_json::to_value(&diagnosis).unwrap();
        for key in ["id", "patient_id", "diagnosis", "prescription", "date", "created_at"] {
            assert!(value.get(key).is_some(), "missing wire field {key}");
        }
    }
}
