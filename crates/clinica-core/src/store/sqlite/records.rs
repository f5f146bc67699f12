//! Patient and diagnosis store operations.
//!
//! Diagnosis rows reference their patient by internal surrogate key; the
//! translation to and from external IDs happens here, on every read and
//! write.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};

use super::SqliteStore;
use crate::models::{Diagnosis, Patient};
use crate::store::{RecordStore, StoreError, StoreResult};

const PATIENT_COLUMNS: &str = "public_id, name, dni, email, phone, address, created_at, updated_at";

const DIAGNOSIS_COLUMNS: &str =
    "d.public_id, p.public_id, d.diagnosis, d.prescription, d.date, d.created_at";

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        dni: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        address: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn diagnosis_from_row(row: &Row<'_>) -> rusqlite::Result<Diagnosis> {
    Ok(Diagnosis {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        diagnosis: row.get(2)?,
        prescription: row.get(3)?,
        date: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Resolve a patient's surrogate key from its external ID.
fn patient_surrogate(conn: &Connection, public_id: &str) -> StoreResult<Option<i64>> {
    conn.query_row(
        "SELECT id FROM patients WHERE public_id = ?",
        [public_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}

impl RecordStore for SqliteStore {
    fn insert_patient(&self, patient: &Patient) -> StoreResult<()> {
        self.lock()?.execute(
            r#"
            INSERT INTO patients (
                public_id, name, dni, email, phone, address, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                patient.id,
                patient.name,
                patient.dni,
                patient.email,
                patient.phone,
                patient.address,
                patient.created_at,
                patient.updated_at,
            ],
        )?;
        Ok(())
    }

    fn find_patient_by_id(&self, id: &str) -> StoreResult<Option<Patient>> {
        self.lock()?
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE public_id = ?"),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    fn find_patient_by_dni(&self, dni: &str) -> StoreResult<Option<Patient>> {
        self.lock()?
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE dni = ?"),
                [dni],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    fn insert_diagnosis(&self, diagnosis: &Diagnosis) -> StoreResult<()> {
        let conn = self.lock()?;
        let patient_key = patient_surrogate(&conn, &diagnosis.patient_id)?.ok_or_else(|| {
            StoreError::NotFound(format!("patient {}", diagnosis.patient_id))
        })?;

        conn.execute(
            r#"
            INSERT INTO diagnoses (
                public_id, patient_id, diagnosis, prescription, date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                diagnosis.id,
                patient_key,
                diagnosis.diagnosis,
                diagnosis.prescription,
                diagnosis.date,
                diagnosis.created_at,
            ],
        )?;
        Ok(())
    }

    fn find_diagnosis_by_id(&self, id: &str) -> StoreResult<Option<Diagnosis>> {
        self.lock()?
            .query_row(
                &format!(
                    "SELECT {DIAGNOSIS_COLUMNS} FROM diagnoses d \
                     JOIN patients p ON p.id = d.patient_id \
                     WHERE d.public_id = ?"
                ),
                [id],
                diagnosis_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    fn search_diagnoses(
        &self,
        patient_name: Option<&str>,
        date_start: Option<DateTime<Utc>>,
        date_end: Option<DateTime<Utc>>,
    ) -> StoreResult<Vec<Diagnosis>> {
        let mut sql = format!(
            "SELECT {DIAGNOSIS_COLUMNS} FROM diagnoses d \
             JOIN patients p ON p.id = d.patient_id"
        );

        let name_pattern = patient_name.map(|name| format!("%{}%", name.to_lowercase()));

        let mut clauses: Vec<&str> = Vec::new();
        let mut args: Vec<&dyn ToSql> = Vec::new();
        if let Some(ref pattern) = name_pattern {
            clauses.push("lower(p.name) LIKE ?");
            args.push(pattern);
        }
        if let Some(ref start) = date_start {
            clauses.push("d.date >= ?");
            args.push(start);
        }
        if let Some(ref end) = date_end {
            clauses.push("d.date <= ?");
            args.push(end);
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(args.as_slice(), diagnosis_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
