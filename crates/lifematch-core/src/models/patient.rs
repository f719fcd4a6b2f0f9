//! Patient models.

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize, Serializer};

use super::dates;
use super::documents::{DocumentKind, PatientDocuments};
use super::status::TransplantStatus;

/// A transplant candidate on the waiting list.
///
/// Field names follow the dashboard's camelCase JSON. The administrative
/// flags the dashboard also sends are derived from `documents`: ignored on
/// input, recomputed on output.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Registry identifier (e.g., "P-20250312-001")
    pub id: String,
    /// Full legal name
    pub full_name: String,
    /// Date of birth
    #[serde(deserialize_with = "dates::deserialize_date")]
    pub dob: NaiveDate,
    /// Organ the patient is waiting for
    pub organ_needed: String,
    /// ABO/Rh blood type
    pub blood_type: String,
    /// HLA typing (e.g., "HLA-A1, HLA-B8"); absent until the lab report arrives
    #[serde(default)]
    pub hla_typing: Option<String>,
    /// Waiting-list status
    pub transplant_status: TransplantStatus,
    /// Last coordinator review
    #[serde(default, deserialize_with = "dates::deserialize_optional_date")]
    pub last_review_date: Option<NaiveDate>,
    /// Document checklist
    #[serde(default)]
    pub documents: PatientDocuments,
    /// Advisor justification, when this patient was recommended
    #[serde(default)]
    pub justification: Option<String>,
}

/// Serialized form of a patient, with the derived document flags.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PatientJson<'a> {
    id: &'a str,
    full_name: &'a str,
    dob: NaiveDate,
    organ_needed: &'a str,
    blood_type: &'a str,
    hla_typing: Option<&'a str>,
    transplant_status: TransplantStatus,
    last_review_date: Option<NaiveDate>,
    documents: PatientDocuments,
    consent_signed: bool,
    insurance_verified: bool,
    medical_history_uploaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    justification: Option<&'a str>,
}

impl Serialize for Patient {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PatientJson {
            id: &self.id,
            full_name: &self.full_name,
            dob: self.dob,
            organ_needed: &self.organ_needed,
            blood_type: &self.blood_type,
            hla_typing: self.hla_typing.as_deref(),
            transplant_status: self.transplant_status,
            last_review_date: self.last_review_date,
            documents: self.documents,
            consent_signed: self.consent_signed(),
            insurance_verified: self.insurance_verified(),
            medical_history_uploaded: self.medical_history_uploaded(),
            justification: self.justification.as_deref(),
        }
        .serialize(serializer)
    }
}

impl Patient {
    /// Register a new patient: inactive, no documents, freshly generated id.
    pub fn register<R: Rng + ?Sized>(
        full_name: String,
        dob: NaiveDate,
        organ_needed: String,
        blood_type: String,
        hla_typing: Option<String>,
        today: NaiveDate,
        rng: &mut R,
    ) -> Self {
        Self {
            id: generate_patient_id(today, rng),
            full_name,
            dob,
            organ_needed,
            blood_type,
            hla_typing,
            transplant_status: TransplantStatus::Inactive,
            last_review_date: Some(today),
            documents: PatientDocuments::default(),
            justification: None,
        }
    }

    /// Copy of this patient with `kind` marked as uploaded.
    pub fn with_document(&self, kind: DocumentKind) -> Self {
        Self {
            documents: self.documents.with(kind),
            ..self.clone()
        }
    }

    pub fn consent_signed(&self) -> bool {
        self.documents.signed_consent
    }

    pub fn insurance_verified(&self) -> bool {
        self.documents.insurance_proof
    }

    pub fn medical_history_uploaded(&self) -> bool {
        self.documents.medical_report
    }

    /// Age as the difference of calendar years, matching the waiting-list
    /// convention used for donor age comparisons.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        today.year() - self.dob.year()
    }

    /// HLA typing, treating an empty string as absent.
    pub fn hla(&self) -> Option<&str> {
        self.hla_typing
            .as_deref()
            .map(str::trim)
            .filter(|hla| !hla.is_empty())
    }
}

/// Generate a registry id of the form `P-YYYYMMDD-NNN`.
pub fn generate_patient_id<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> String {
    format!("P-{}-{:03}", today.format("%Y%m%d"), rng.gen_range(0..1000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_register_patient() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let patient = Patient::register(
            "John Doe".into(),
            date(1980, 12, 8),
            "Kidney".into(),
            "O+".into(),
            Some("HLA-A1, HLA-B8".into()),
            date(2025, 3, 12),
            &mut rng,
        );

        assert!(patient.id.starts_with("P-20250312-"));
        assert_eq!(patient.id.len(), "P-20250312-001".len());
        assert_eq!(patient.transplant_status, TransplantStatus::Inactive);
        assert_eq!(patient.documents.completed_count(), 0);
        assert_eq!(patient.last_review_date, Some(date(2025, 3, 12)));
    }

    #[test]
    fn test_derived_flags_follow_documents() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let patient = Patient::register(
            "Jane Smith".into(),
            date(1975, 5, 22),
            "Liver".into(),
            "A-".into(),
            None,
            date(2025, 3, 10),
            &mut rng,
        );
        assert!(!patient.consent_signed());

        let patient = patient.with_document(DocumentKind::SignedConsent);
        assert!(patient.consent_signed());
        assert!(!patient.insurance_verified());

        let patient = patient
            .with_document(DocumentKind::InsuranceProof)
            .with_document(DocumentKind::MedicalReport);
        assert!(patient.insurance_verified());
        assert!(patient.medical_history_uploaded());
    }

    #[test]
    fn test_deserialize_dashboard_record() {
        let json = r#"{
            "id": "P-20250312-001",
            "fullName": "John Doe",
            "dob": "12/08/1980",
            "organNeeded": "Kidney",
            "bloodType": "O+",
            "hlaTyping": "HLA-A1, HLA-B8",
            "medicalHistoryUploaded": false,
            "insuranceVerified": true,
            "transplantStatus": "Active - Rank #24",
            "consentSigned": true,
            "lastReviewDate": "03/15/2025",
            "documents": {
                "idProof": true,
                "bloodHlaReport": true,
                "medicalReport": true,
                "insuranceProof": true,
                "signedConsent": true
            }
        }"#;

        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.dob, date(1980, 12, 8));
        assert_eq!(patient.transplant_status.rank(), Some(24));
        // Stale stored flag is ignored in favour of the documents
        assert!(patient.medical_history_uploaded());
        assert_eq!(patient.last_review_date, Some(date(2025, 3, 15)));
    }

    #[test]
    fn test_serialize_emits_derived_flags() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let patient = Patient::register(
            "John Doe".into(),
            date(1980, 12, 8),
            "Kidney".into(),
            "O+".into(),
            None,
            date(2025, 3, 12),
            &mut rng,
        )
        .with_document(DocumentKind::SignedConsent)
        .with_document(DocumentKind::MedicalReport);

        let value = serde_json::to_value(&patient).unwrap();
        assert_eq!(value["consentSigned"], true);
        assert_eq!(value["insuranceVerified"], false);
        assert_eq!(value["medicalHistoryUploaded"], true);
        assert_eq!(value["fullName"], "John Doe");
        assert_eq!(value["dob"], "1980-12-08");
        assert!(value.get("justification").is_none());

        let back: Patient = serde_json::from_value(value).unwrap();
        assert_eq!(back, patient);
    }

    #[test]
    fn test_age_and_hla() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut patient = Patient::register(
            "Max Mustermann".into(),
            date(1980, 12, 8),
            "Heart".into(),
            "B+".into(),
            Some("  ".into()),
            date(2025, 1, 1),
            &mut rng,
        );
        assert_eq!(patient.age_on(date(2025, 1, 1)), 45);
        assert!(patient.hla().is_none());

        patient.hla_typing = Some("HLA-B7".into());
        assert_eq!(patient.hla(), Some("HLA-B7"));
    }
}
