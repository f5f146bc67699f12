//! Patient records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// External identifier, assigned once at creation
    pub id: String,
    /// Full name
    pub name: String,
    /// National identity document number (unique, checksummed)
    pub dni: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Postal address
    pub address: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied patient fields, before an identifier is assigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub dni: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl Patient {
    /// Build a patient from a draft with a freshly assigned identifier.
    pub fn from_draft(id: String, draft: NewPatient) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: draft.name,
            dni: draft.dni,
            email: draft.email,
            phone: draft.phone,
            address: draft.address,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_draft() {
        let patient = Patient::from_draft(
            "01ARZ3NDEKTSV4RRFFQ69G5FAV".into(),
            NewPatient {
                name: "Jane Doe".into(),
                dni: "11111111H".into(),
                email: "jane@example.com".into(),
                ..Default::default()
            },
        );

        assert_eq!(patient.id, "01ARZ3NDEKTSV4RRFFQ69G5FAV");
        assert_eq!(patient.name, "Jane Doe");
        assert_eq!(patient.created_at, patient.updated_at);
    }
}
