//! LifeMatch Core Library
//!
//! Donor-patient matching and organ viability engine for transplant
//! coordination dashboards.
//!
//! # Architecture
//!
//! ```text
//!   Donor registry        Waiting list
//!         │                     │
//!         └──────────┬──────────┘
//!                    ▼
//!             Organ filter
//!                    │
//!           Blood-type gate  ── incompatible pairs dropped
//!                    │
//!        ┌───────────┴───────────┐
//!        ▼                       ▼
//!   DonorFirst score       PatientFirst score
//!   (additive)             (subtractive + distance)
//!        └───────────┬───────────┘
//!                    ▼
//!        Threshold → Stable rank ──► Viability annotation
//!                    │
//!                    ▼
//!          Match report (JSON / CSV)
//! ```
//!
//! # Core Principle
//!
//! **The engine decides nothing.** It ranks candidates and reports organ
//! viability; allocation stays with the transplant coordinator.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Donor, Patient, MatchResult, etc.)
//! - [`matching`]: Compatibility rules, viability, scoring and orchestration
//! - [`registry`]: Document uploads and roster filters
//! - [`export`]: Match report export
//! - [`config`]: TOML-loadable engine tuning

pub mod config;
pub mod export;
pub mod matching;
pub mod models;
pub mod registry;

// Re-export commonly used types
pub use config::{ConfigError, EngineConfig};
pub use export::{MatchOutcome, MatchReport, ReportAnchor};
pub use matching::{
    compute_viability, find_matches, potential_recipients, score_match, BloodType,
    DistancePenalty, FixedDistancePenalty, MatchQuery, Matcher, NoDistancePenalty,
    RandomDistancePenalty,
};
pub use models::{
    DocumentKind, Donor, MatchPolicy, MatchResult, Organ, OrganCondition, Patient,
    PatientDocuments, ScoreBreakdown, TransplantStatus, UrgencyLevel, ViabilitySnapshot,
};
pub use registry::{apply_document_upload, DocumentUpload, RegistryError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use models::dates;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum LifeMatchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<ConfigError> for LifeMatchError {
    fn from(e: ConfigError) -> Self {
        LifeMatchError::ConfigError(e.to_string())
    }
}

impl From<RegistryError> for LifeMatchError {
    fn from(e: RegistryError) -> Self {
        LifeMatchError::NotFound(e.to_string())
    }
}

impl From<serde_json::Error> for LifeMatchError {
    fn from(e: serde_json::Error) -> Self {
        LifeMatchError::SerializationError(e.to_string())
    }
}

impl From<models::StatusParseError> for LifeMatchError {
    fn from(e: models::StatusParseError) -> Self {
        LifeMatchError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for LifeMatchError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        LifeMatchError::InternalError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create an engine with the default configuration.
///
/// A seed makes distance penalties reproducible; without one the RNG is
/// seeded from entropy.
#[uniffi::export]
pub fn create_engine(seed: Option<u64>) -> Arc<LifeMatchEngine> {
    Arc::new(LifeMatchEngine::new(EngineConfig::default(), seed))
}

/// Create an engine from a TOML configuration document.
#[uniffi::export]
pub fn create_engine_with_config(
    config_toml: String,
    seed: Option<u64>,
) -> Result<Arc<LifeMatchEngine>, LifeMatchError> {
    let config = EngineConfig::from_toml_str(&config_toml)?;
    Ok(Arc::new(LifeMatchEngine::new(config, seed)))
}

/// Whether a donor blood type can be given to a recipient blood type.
#[uniffi::export]
pub fn is_blood_type_compatible(donor_blood_type: String, recipient_blood_type: String) -> bool {
    matching::is_blood_type_compatible(&donor_blood_type, &recipient_blood_type)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe matching engine for FFI.
#[derive(uniffi::Object)]
pub struct LifeMatchEngine {
    config: EngineConfig,
    rng: Mutex<ChaCha8Rng>,
}

impl LifeMatchEngine {
    pub fn new(config: EngineConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn search(
        &self,
        query: MatchQuery<'_>,
        policy: MatchPolicy,
        now: DateTime<Utc>,
    ) -> Result<Vec<MatchResult>, LifeMatchError> {
        let mut rng = self.rng.lock()?;
        let mut distance = RandomDistancePenalty::new(&mut *rng);
        Ok(Matcher::new(&self.config, now).find_matches(query, policy, &mut distance))
    }

    fn build_report(&self, request: FfiReportRequest) -> Result<MatchReport, LifeMatchError> {
        let now = parse_now(request.now)?;
        let patients = convert_all::<_, Patient>(request.patients)?;
        let donors = convert_all::<_, Donor>(request.donors)?;

        let query = match request.direction {
            FfiSearchDirection::DonorsForPatient => MatchQuery::DonorsFor {
                patient: registry::find_patient(&patients, &request.anchor_id)?,
                pool: &donors,
            },
            FfiSearchDirection::PatientsForDonor => MatchQuery::PatientsFor {
                donor: registry::find_donor(&donors, &request.anchor_id)?,
                pool: &patients,
            },
        };
        let policy = query.canonical_policy();
        let results = self.search(query, policy, now)?;
        Ok(MatchReport::from_matches(
            ReportAnchor::from(&query),
            policy,
            &results,
            now,
        ))
    }
}

#[uniffi::export]
impl LifeMatchEngine {
    // =========================================================================
    // Viability
    // =========================================================================

    /// Remaining viability of a donor organ at `now` (defaults to the current time).
    pub fn compute_viability(
        &self,
        donor: FfiDonor,
        now: Option<String>,
    ) -> Result<FfiViability, LifeMatchError> {
        let now = parse_now(now)?;
        let donor = Donor::try_from(donor)?;
        Ok(self.config.viability.compute(&donor, now).into())
    }

    // =========================================================================
    // Scoring
    // =========================================================================

    /// Score one pair under a policy.
    pub fn score_match(
        &self,
        donor: FfiDonor,
        patient: FfiPatient,
        policy: FfiMatchPolicy,
        now: Option<String>,
    ) -> Result<u8, LifeMatchError> {
        let now = parse_now(now)?;
        let donor = Donor::try_from(donor)?;
        let patient = Patient::try_from(patient)?;

        let mut rng = self.rng.lock()?;
        let mut distance = RandomDistancePenalty::new(&mut *rng);
        let breakdown = matching::Scorer::new(&self.config.scoring, now).score(
            &donor,
            &patient,
            policy.into(),
            &mut distance,
        );
        Ok(breakdown.total())
    }

    // =========================================================================
    // Matching
    // =========================================================================

    /// Rank donors for a patient (patient-first policy).
    pub fn find_donors_for_patient(
        &self,
        patient: FfiPatient,
        donors: Vec<FfiDonor>,
        now: Option<String>,
    ) -> Result<Vec<FfiMatchResult>, LifeMatchError> {
        let now = parse_now(now)?;
        let patient = Patient::try_from(patient)?;
        let donors = convert_all::<_, Donor>(donors)?;

        let query = MatchQuery::DonorsFor {
            patient: &patient,
            pool: &donors,
        };
        let results = self.search(query, MatchPolicy::PatientFirst, now)?;
        Ok(results.into_iter().map(|r| r.into()).collect())
    }

    /// Rank patients for a donor (donor-first policy).
    pub fn find_patients_for_donor(
        &self,
        donor: FfiDonor,
        patients: Vec<FfiPatient>,
        now: Option<String>,
    ) -> Result<Vec<FfiMatchResult>, LifeMatchError> {
        let now = parse_now(now)?;
        let donor = Donor::try_from(donor)?;
        let patients = convert_all::<_, Patient>(patients)?;

        let query = MatchQuery::PatientsFor {
            donor: &donor,
            pool: &patients,
        };
        let results = self.search(query, MatchPolicy::DonorFirst, now)?;
        Ok(results.into_iter().map(|r| r.into()).collect())
    }

    // =========================================================================
    // Registry
    // =========================================================================

    /// Mark a document as uploaded, returning the updated patient.
    pub fn apply_document_upload(
        &self,
        patients: Vec<FfiPatient>,
        patient_id: String,
        document: FfiDocumentKind,
    ) -> Result<FfiPatient, LifeMatchError> {
        let patients = convert_all::<_, Patient>(patients)?;
        let upload = DocumentUpload::new(patient_id, document.into());
        let updated = registry::apply_document_upload(&patients, &upload)?;
        Ok(updated.into())
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Run a search and export the report as JSON.
    pub fn export_report_json(&self, request: FfiReportRequest) -> Result<String, LifeMatchError> {
        let report = self.build_report(request)?;
        Ok(report.to_json()?)
    }

    /// Run a search and export the report as CSV.
    pub fn export_report_csv(&self, request: FfiReportRequest) -> Result<String, LifeMatchError> {
        let report = self.build_report(request)?;
        Ok(report.to_csv())
    }
}

fn parse_now(now: Option<String>) -> Result<DateTime<Utc>, LifeMatchError> {
    match now {
        None => Ok(Utc::now()),
        Some(raw) => dates::parse_instant(&raw)
            .ok_or_else(|| LifeMatchError::InvalidInput(format!("Invalid timestamp: {}", raw))),
    }
}

fn convert_all<F, T>(items: Vec<F>) -> Result<Vec<T>, LifeMatchError>
where
    T: TryFrom<F, Error = LifeMatchError>,
{
    items.into_iter().map(T::try_from).collect()
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe scoring policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiMatchPolicy {
    DonorFirst,
    PatientFirst,
}

impl From<FfiMatchPolicy> for MatchPolicy {
    fn from(policy: FfiMatchPolicy) -> Self {
        match policy {
            FfiMatchPolicy::DonorFirst => MatchPolicy::DonorFirst,
            FfiMatchPolicy::PatientFirst => MatchPolicy::PatientFirst,
        }
    }
}

impl From<MatchPolicy> for FfiMatchPolicy {
    fn from(policy: MatchPolicy) -> Self {
        match policy {
            MatchPolicy::DonorFirst => FfiMatchPolicy::DonorFirst,
            MatchPolicy::PatientFirst => FfiMatchPolicy::PatientFirst,
        }
    }
}

/// FFI-safe search direction for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiSearchDirection {
    DonorsForPatient,
    PatientsForDonor,
}

/// FFI-safe document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiDocumentKind {
    IdProof,
    BloodHlaReport,
    MedicalReport,
    InsuranceProof,
    SignedConsent,
}

impl From<FfiDocumentKind> for DocumentKind {
    fn from(kind: FfiDocumentKind) -> Self {
        match kind {
            FfiDocumentKind::IdProof => DocumentKind::IdProof,
            FfiDocumentKind::BloodHlaReport => DocumentKind::BloodHlaReport,
            FfiDocumentKind::MedicalReport => DocumentKind::MedicalReport,
            FfiDocumentKind::InsuranceProof => DocumentKind::InsuranceProof,
            FfiDocumentKind::SignedConsent => DocumentKind::SignedConsent,
        }
    }
}

/// FFI-safe donor. `donation_date` is RFC 3339 or `YYYY-MM-DD`.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDonor {
    pub donor_id: String,
    pub blood_type: String,
    pub organ_available: String,
    pub location: String,
    pub hospital: String,
    pub tissue_type: String,
    pub age: u32,
    pub donation_date: String,
    pub organ_condition: String,
}

impl From<Donor> for FfiDonor {
    fn from(donor: Donor) -> Self {
        Self {
            donor_id: donor.donor_id,
            blood_type: donor.blood_type,
            organ_available: donor.organ_available,
            location: donor.location,
            hospital: donor.hospital,
            tissue_type: donor.tissue_type,
            age: donor.age,
            donation_date: donor.donation_date.to_rfc3339(),
            organ_condition: donor.organ_condition,
        }
    }
}

impl TryFrom<FfiDonor> for Donor {
    type Error = LifeMatchError;

    fn try_from(donor: FfiDonor) -> Result<Self, Self::Error> {
        let donation_date = dates::parse_instant(&donor.donation_date).ok_or_else(|| {
            LifeMatchError::InvalidInput(format!(
                "Donor {}: invalid donation date {}",
                donor.donor_id, donor.donation_date
            ))
        })?;
        Ok(Donor {
            donor_id: donor.donor_id,
            blood_type: donor.blood_type,
            organ_available: donor.organ_available,
            location: donor.location,
            hospital: donor.hospital,
            tissue_type: donor.tissue_type,
            age: donor.age,
            donation_date,
            organ_condition: donor.organ_condition,
        })
    }
}

/// FFI-safe document checklist.
#[derive(Debug, Clone, Copy, Default, uniffi::Record)]
pub struct FfiDocuments {
    pub id_proof: bool,
    pub blood_hla_report: bool,
    pub medical_report: bool,
    pub insurance_proof: bool,
    pub signed_consent: bool,
}

impl From<PatientDocuments> for FfiDocuments {
    fn from(docs: PatientDocuments) -> Self {
        Self {
            id_proof: docs.id_proof,
            blood_hla_report: docs.blood_hla_report,
            medical_report: docs.medical_report,
            insurance_proof: docs.insurance_proof,
            signed_consent: docs.signed_consent,
        }
    }
}

impl From<FfiDocuments> for PatientDocuments {
    fn from(docs: FfiDocuments) -> Self {
        PatientDocuments {
            id_proof: docs.id_proof,
            blood_hla_report: docs.blood_hla_report,
            medical_report: docs.medical_report,
            insurance_proof: docs.insurance_proof,
            signed_consent: docs.signed_consent,
        }
    }
}

/// FFI-safe patient.
///
/// The three administrative flags are filled from `documents` on output and
/// ignored on input.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub full_name: String,
    pub dob: String,
    pub organ_needed: String,
    pub blood_type: String,
    pub hla_typing: Option<String>,
    pub transplant_status: String,
    pub last_review_date: Option<String>,
    pub documents: FfiDocuments,
    pub medical_history_uploaded: bool,
    pub insurance_verified: bool,
    pub consent_signed: bool,
    pub justification: Option<String>,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            medical_history_uploaded: patient.medical_history_uploaded(),
            insurance_verified: patient.insurance_verified(),
            consent_signed: patient.consent_signed(),
            id: patient.id,
            full_name: patient.full_name,
            dob: patient.dob.format("%Y-%m-%d").to_string(),
            organ_needed: patient.organ_needed,
            blood_type: patient.blood_type,
            hla_typing: patient.hla_typing,
            transplant_status: patient.transplant_status.to_string(),
            last_review_date: patient
                .last_review_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
            documents: patient.documents.into(),
            justification: patient.justification,
        }
    }
}

impl TryFrom<FfiPatient> for Patient {
    type Error = LifeMatchError;

    fn try_from(patient: FfiPatient) -> Result<Self, Self::Error> {
        let dob = dates::parse_calendar_date(&patient.dob).ok_or_else(|| {
            LifeMatchError::InvalidInput(format!(
                "Patient {}: invalid date of birth {}",
                patient.id, patient.dob
            ))
        })?;
        let last_review_date = match patient.last_review_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(dates::parse_calendar_date(raw).ok_or_else(|| {
                LifeMatchError::InvalidInput(format!(
                    "Patient {}: invalid review date {}",
                    patient.id, raw
                ))
            })?),
        };
        Ok(Patient {
            transplant_status: patient.transplant_status.parse()?,
            id: patient.id,
            full_name: patient.full_name,
            dob,
            organ_needed: patient.organ_needed,
            blood_type: patient.blood_type,
            hla_typing: patient.hla_typing,
            last_review_date,
            documents: patient.documents.into(),
            justification: patient.justification,
        })
    }
}

/// FFI-safe viability snapshot.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiViability {
    pub days_since_donation: i64,
    pub max_days: u32,
    pub days_remaining: u32,
    pub hours_remaining: u32,
    pub percent_remaining: u8,
    pub is_urgent: bool,
    pub urgency_level: String,
}

impl From<ViabilitySnapshot> for FfiViability {
    fn from(v: ViabilitySnapshot) -> Self {
        Self {
            days_since_donation: v.days_since_donation,
            max_days: v.max_days,
            days_remaining: v.days_remaining,
            hours_remaining: v.hours_remaining,
            percent_remaining: v.percent_remaining,
            is_urgent: v.is_urgent,
            urgency_level: v.urgency_level.to_string(),
        }
    }
}

/// FFI-safe match result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMatchResult {
    pub patient: FfiPatient,
    pub donor: FfiDonor,
    pub compatibility_score: u8,
    pub tier: String,
    pub policy: FfiMatchPolicy,
    pub viability: Option<FfiViability>,
}

impl From<MatchResult> for FfiMatchResult {
    fn from(result: MatchResult) -> Self {
        Self {
            tier: result.tier().to_string(),
            compatibility_score: result.compatibility_score,
            policy: result.policy.into(),
            viability: result.viability.map(|v| v.into()),
            patient: result.patient.into(),
            donor: result.donor.into(),
        }
    }
}

/// FFI-safe report request: the anchor record, both rosters and the instant.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReportRequest {
    pub anchor_id: String,
    pub direction: FfiSearchDirection,
    pub patients: Vec<FfiPatient>,
    pub donors: Vec<FfiDonor>,
    pub now: Option<String>,
}
