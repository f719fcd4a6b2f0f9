//! Roster state transitions and lookups.
//!
//! The engine never mutates roster records. Every transition returns the
//! updated record and leaves persisting it to the caller.

mod filters;

pub use filters::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DocumentKind, Donor, Patient};

/// Registry errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    #[error("Donor not found: {0}")]
    DonorNotFound(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// A document received for a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUpload {
    pub patient_id: String,
    pub document: DocumentKind,
}

impl DocumentUpload {
    pub fn new(patient_id: impl Into<String>, document: DocumentKind) -> Self {
        Self {
            patient_id: patient_id.into(),
            document,
        }
    }
}

/// Apply a document upload to the roster, returning the updated patient.
///
/// Uploading an already-present document is a no-op transition.
pub fn apply_document_upload(patients: &[Patient], upload: &DocumentUpload) -> RegistryResult<Patient> {
    let patient = find_patient(patients, &upload.patient_id)?;
    Ok(patient.with_document(upload.document))
}

/// Look up a patient by id.
pub fn find_patient<'a>(patients: &'a [Patient], id: &str) -> RegistryResult<&'a Patient> {
    patients
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| RegistryError::PatientNotFound(id.to_string()))
}

/// Look up a donor by id.
pub fn find_donor<'a>(donors: &'a [Donor], id: &str) -> RegistryResult<&'a Donor> {
    donors
        .iter()
        .find(|d| d.donor_id == id)
        .ok_or_else(|| RegistryError::DonorNotFound(id.to_string()))
}

/// Replace the patient with the same id, returning the new roster.
pub fn replace_patient(patients: &[Patient], updated: Patient) -> RegistryResult<Vec<Patient>> {
    find_patient(patients, &updated.id)?;
    Ok(patients
        .iter()
        .map(|p| if p.id == updated.id { updated.clone() } else { p.clone() })
        .collect())
}
