//! Domain types for the clinic core.

mod credential;
mod diagnosis;
mod patient;

pub use credential::Credential;
pub use diagnosis::{Diagnosis, NewDiagnosis};
pub use patient::{NewPatient, Patient};
