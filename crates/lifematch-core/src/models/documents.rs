//! Patient document checklist.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The five documents required before a patient can be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    IdProof,
    BloodHlaReport,
    MedicalReport,
    InsuranceProof,
    SignedConsent,
}

impl DocumentKind {
    /// Checklist order as shown to coordinators.
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::IdProof,
        DocumentKind::MedicalReport,
        DocumentKind::BloodHlaReport,
        DocumentKind::InsuranceProof,
        DocumentKind::SignedConsent,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentKind::IdProof => "Identification Proof",
            DocumentKind::MedicalReport => "Medical History Report",
            DocumentKind::BloodHlaReport => "Blood & HLA Typing Report",
            DocumentKind::InsuranceProof => "Insurance Verification",
            DocumentKind::SignedConsent => "Consent Form",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DocumentKind::IdProof => "Government issued photo ID or passport",
            DocumentKind::MedicalReport => {
                "Comprehensive medical background and condition assessment"
            }
            DocumentKind::BloodHlaReport => {
                "Lab results with blood group and Human Leukocyte Antigen typing"
            }
            DocumentKind::InsuranceProof => "Insurance card and policy coverage details",
            DocumentKind::SignedConsent => "Signed patient consent for transplantation procedures",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Upload state of each required document.
///
/// This is the single source of truth for the administrative flags
/// (consent signed, insurance verified, medical history uploaded).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDocuments {
    #[serde(default)]
    pub id_proof: bool,
    #[serde(default)]
    pub blood_hla_report: bool,
    #[serde(default)]
    pub medical_report: bool,
    #[serde(default)]
    pub insurance_proof: bool,
    #[serde(default)]
    pub signed_consent: bool,
}

impl PatientDocuments {
    pub fn has(&self, kind: DocumentKind) -> bool {
        match kind {
            DocumentKind::IdProof => self.id_proof,
            DocumentKind::BloodHlaReport => self.blood_hla_report,
            DocumentKind::MedicalReport => self.medical_report,
            DocumentKind::InsuranceProof => self.insurance_proof,
            DocumentKind::SignedConsent => self.signed_consent,
        }
    }

    /// Copy with `kind` marked as uploaded.
    pub fn with(mut self, kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::IdProof => self.id_proof = true,
            DocumentKind::BloodHlaReport => self.blood_hla_report = true,
            DocumentKind::MedicalReport => self.medical_report = true,
            DocumentKind::InsuranceProof => self.insurance_proof = true,
            DocumentKind::SignedConsent => self.signed_consent = true,
        }
        self
    }

    pub fn completed_count(&self) -> usize {
        DocumentKind::ALL.iter().filter(|kind| self.has(**kind)).count()
    }

    /// Completion as a rounded percentage (0-100).
    pub fn completion_percent(&self) -> u8 {
        let total = DocumentKind::ALL.len();
        ((self.completed_count() * 100 + total / 2) / total) as u8
    }

    pub fn is_complete(&self) -> bool {
        self.completed_count() == DocumentKind::ALL.len()
    }

    /// Documents still outstanding, in checklist order.
    pub fn missing(&self) -> Vec<DocumentKind> {
        DocumentKind::ALL
            .into_iter()
            .filter(|kind| !self.has(*kind))
            .collect()
    }
}
