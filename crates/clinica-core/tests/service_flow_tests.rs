//! End-to-end service flow tests against an in-memory SQLite store.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use clinica_auth::IdGenerator;
use clinica_core::{
    IdentityService, NewDiagnosis, NewPatient, RecordsService, ServiceError, SqliteStore,
};

const SECRET: &str = "integration-test-secret";

fn setup() -> (IdentityService, RecordsService) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();

    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let ids = IdGenerator::new();
    let identity = IdentityService::new(store.clone(), ids.clone(), SECRET);
    let records = RecordsService::new(store, ids);
    (identity, records)
}

fn jane_doe() -> NewPatient {
    NewPatient {
        name: "Jane Doe".into(),
        dni: "11111111H".into(),
        email: "jane@example.com".into(),
        phone: "600123123".into(),
        address: "Calle Mayor 1, Madrid".into(),
    }
}

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 11, d, 10, 0, 0).unwrap()
}

#[test]
fn test_register_login_and_record_flow() {
    let (identity, records) = setup();

    let credential = identity.register("doc", "password").unwrap();
    assert!(!credential.id.is_empty());

    // A second registration under the same username collides.
    let err = identity.register("doc", "password").unwrap_err();
    assert!(matches!(err, ServiceError::AlreadyExists(_)));

    let token = identity.login("doc", "password").unwrap();
    assert!(!token.is_empty());

    // The token binds the registered credential's identity.
    let subject = identity.validate_token(&token).unwrap();
    assert_eq!(subject, credential.id);

    let patient = records.create_patient(jane_doe()).unwrap();
    assert!(!patient.id.is_empty());

    let diagnosis = records
        .create_diagnosis(NewDiagnosis {
            patient_id: patient.id.clone(),
            diagnosis: "Fever".into(),
            prescription: "Paracetamol 1g".into(),
            date: Some(day(1)),
        })
        .unwrap();
    assert_eq!(diagnosis.patient_id, patient.id);

    // Referencing an unused ID fails; nothing is persisted for it.
    let err = records
        .create_diagnosis(NewDiagnosis {
            patient_id: "01ARZ3NDEKTSV4RRFFQ69G5FAV".into(),
            diagnosis: "Fever".into(),
            prescription: String::new(),
            date: Some(day(1)),
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));

    let found = records.search_diagnoses(Some("Jane"), None, None).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, diagnosis.id);
}

#[test]
fn test_login_failures_are_indistinguishable() {
    let (identity, _) = setup();
    identity.register("doc", "password").unwrap();

    let wrong_password = identity.login("doc", "nope").unwrap_err();
    let unknown_user = identity.login("nobody", "password").unwrap_err();

    assert!(matches!(wrong_password, ServiceError::InvalidCredentials));
    assert!(matches!(unknown_user, ServiceError::InvalidCredentials));
}

#[test]
fn test_duplicate_dni_across_service_calls() {
    let (_, records) = setup();
    records.create_patient(jane_doe()).unwrap();

    let err = records
        .create_patient(NewPatient {
            name: "John Roe".into(),
            email: "john@example.com".into(),
            ..jane_doe()
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::AlreadyExists(field) if field == "dni"));
}

#[test]
fn test_search_filters_compose() {
    let (_, records) = setup();

    let jane = records.create_patient(jane_doe()).unwrap();
    let john = records
        .create_patient(NewPatient {
            name: "John Roe".into(),
            dni: "22222222J".into(),
            email: "john@example.com".into(),
            ..Default::default()
        })
        .unwrap();

    for (patient_id, d) in [(&jane.id, 1), (&jane.id, 15), (&john.id, 15)] {
        records
            .create_diagnosis(NewDiagnosis {
                patient_id: patient_id.to_string(),
                diagnosis: "Checkup".into(),
                prescription: String::new(),
                date: Some(day(d)),
            })
            .unwrap();
    }

    // No filters: everything.
    assert_eq!(records.search_diagnoses(None, None, None).unwrap().len(), 3);

    // Name only, case-insensitive substring.
    assert_eq!(
        records.search_diagnoses(Some("jane"), None, None).unwrap().len(),
        2
    );

    // Inclusive date window.
    assert_eq!(
        records
            .search_diagnoses(None, Some(day(2)), Some(day(15)))
            .unwrap()
            .len(),
        2
    );

    // Name and date combined narrow to one.
    let found = records
        .search_diagnoses(Some("Jane"), Some(day(2)), None)
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].patient_id, jane.id);
}

#[test]
fn test_ids_are_unique_and_time_sortable_across_entities() {
    let (identity, records) = setup();

    let credential = identity.register("doc", "password").unwrap();
    let patient = records.create_patient(jane_doe()).unwrap();
    let diagnosis = records
        .create_diagnosis(NewDiagnosis {
            patient_id: patient.id.clone(),
            diagnosis: "Fever".into(),
            prescription: String::new(),
            date: Some(day(1)),
        })
        .unwrap();

    // One shared generator: creation order is reflected in sort order.
    let minted = [credential.id, patient.id, diagnosis.id];
    let mut sorted = minted.clone();
    sorted.sort();
    assert_eq!(minted, sorted);
    assert_eq!(minted.iter().collect::<std::collections::HashSet<_>>().len(), 3);
}
