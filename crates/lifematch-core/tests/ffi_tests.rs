//! Integration tests for the exported engine object.

use lifematch_core::{
    create_engine, create_engine_with_config, is_blood_type_compatible, FfiDocumentKind,
    FfiDocuments, FfiDonor, FfiMatchPolicy, FfiPatient, FfiReportRequest, FfiSearchDirection,
    LifeMatchError,
};

const NOW: &str = "2025-03-20T00:00:00Z";

fn make_donor(id: &str, blood: &str, tissue: &str, condition: &str, age: u32) -> FfiDonor {
    FfiDonor {
        donor_id: id.to_string(),
        blood_type: blood.to_string(),
        organ_available: "Kidney".to_string(),
        location: "Boston".to_string(),
        hospital: "General Hospital".to_string(),
        tissue_type: tissue.to_string(),
        age,
        donation_date: "2025-03-15".to_string(),
        organ_condition: condition.to_string(),
    }
}

fn make_patient(id: &str, blood: &str, hla: &str) -> FfiPatient {
    FfiPatient {
        id: id.to_string(),
        full_name: format!("Patient {}", id),
        dob: "12/08/1980".to_string(),
        organ_needed: "Kidney".to_string(),
        blood_type: blood.to_string(),
        hla_typing: Some(hla.to_string()),
        transplant_status: "Active - Rank #3".to_string(),
        last_review_date: None,
        documents: FfiDocuments::default(),
        medical_history_uploaded: true,
        insurance_verified: false,
        consent_signed: false,
        justification: None,
    }
}

#[test]
fn test_blood_type_export() {
    assert!(is_blood_type_compatible("O-".into(), "AB+".into()));
    assert!(!is_blood_type_compatible("A+".into(), "B+".into()));
}

#[test]
fn test_compute_viability() {
    let engine = create_engine(Some(1));
    let viability = engine
        .compute_viability(make_donor("D1", "O-", "HLA-A2", "Excellent", 40), Some(NOW.into()))
        .unwrap();

    assert_eq!(viability.max_days, 30);
    assert_eq!(viability.days_since_donation, 5);
    assert_eq!(viability.days_remaining, 25);
    assert_eq!(viability.hours_remaining, 600);
    assert_eq!(viability.percent_remaining, 83);
    assert_eq!(viability.urgency_level, "Low");
    assert!(!viability.is_urgent);
}

#[test]
fn test_invalid_timestamp_rejected() {
    let engine = create_engine(None);
    let result = engine.compute_viability(
        make_donor("D1", "O-", "HLA-A2", "Excellent", 40),
        Some("yesterday".into()),
    );
    assert!(matches!(result, Err(LifeMatchError::InvalidInput(_))));
}

#[test]
fn test_score_match_policies() {
    let engine = create_engine(Some(7));
    let donor = make_donor("D1", "O-", "HLA-A2", "Excellent", 44);
    let patient = make_patient("P1", "AB+", "HLA-A2");

    let donor_first = engine
        .score_match(donor.clone(), patient.clone(), FfiMatchPolicy::DonorFirst, Some(NOW.into()))
        .unwrap();
    assert_eq!(donor_first, 85);

    let patient_first = engine
        .score_match(donor, patient, FfiMatchPolicy::PatientFirst, Some(NOW.into()))
        .unwrap();
    // Only the simulated distance penalty applies
    assert!((86..=100).contains(&patient_first));
}

#[test]
fn test_seeded_engines_agree() {
    let donors: Vec<FfiDonor> = (0..6)
        .map(|i| make_donor(&format!("D{}", i), "O-", "HLA-A2", "Excellent", 40 + i))
        .collect();
    let patient = make_patient("P1", "A+", "HLA-A2");

    let a = create_engine(Some(42))
        .find_donors_for_patient(patient.clone(), donors.clone(), Some(NOW.into()))
        .unwrap();
    let b = create_engine(Some(42))
        .find_donors_for_patient(patient, donors, Some(NOW.into()))
        .unwrap();

    let scores_a: Vec<(String, u8)> = a.iter().map(|r| (r.donor.donor_id.clone(), r.compatibility_score)).collect();
    let scores_b: Vec<(String, u8)> = b.iter().map(|r| (r.donor.donor_id.clone(), r.compatibility_score)).collect();
    assert_eq!(scores_a, scores_b);
    assert_eq!(a.len(), 6);
}

#[test]
fn test_find_patients_for_donor() {
    let engine = create_engine(Some(3));
    let patients = vec![
        make_patient("P1", "A+", "HLA-B7"),
        make_patient("P2", "AB+", "HLA-A2"),
        make_patient("P3", "B+", "HLA-A2"),
    ];
    let results = engine
        .find_patients_for_donor(make_donor("D1", "A+", "HLA-A2", "Good", 40), patients, Some(NOW.into()))
        .unwrap();

    let ids: Vec<&str> = results.iter().map(|r| r.patient.id.as_str()).collect();
    assert_eq!(ids, vec!["P2", "P1"]);
    assert_eq!(results[0].compatibility_score, 80);
    assert_eq!(results[0].tier, "Strong");
    assert_eq!(results[0].policy, FfiMatchPolicy::DonorFirst);
    // Derived flags come from the documents, not the incoming record
    assert!(!results[0].patient.medical_history_uploaded);
}

#[test]
fn test_apply_document_upload() {
    let engine = create_engine(None);
    let patients = vec![make_patient("P1", "O+", "HLA-A2"), make_patient("P2", "A+", "HLA-B7")];

    let updated = engine
        .apply_document_upload(patients.clone(), "P2".into(), FfiDocumentKind::SignedConsent)
        .unwrap();
    assert_eq!(updated.id, "P2");
    assert!(updated.consent_signed);
    assert!(updated.documents.signed_consent);
    assert_eq!(updated.dob, "1980-12-08");
    assert_eq!(updated.transplant_status, "Active - Rank #3");

    let missing = engine.apply_document_upload(patients, "P9".into(), FfiDocumentKind::IdProof);
    assert!(matches!(missing, Err(LifeMatchError::NotFound(_))));
}

#[test]
fn test_export_reports() {
    let engine = create_engine(Some(11));
    let request = FfiReportRequest {
        anchor_id: "D1".into(),
        direction: FfiSearchDirection::PatientsForDonor,
        patients: vec![make_patient("P1", "AB+", "HLA-A2"), make_patient("P2", "O+", "HLA-A2")],
        donors: vec![make_donor("D1", "A+", "HLA-A2", "Excellent", 40)],
        now: Some(NOW.into()),
    };

    let json = engine.export_report_json(request.clone()).unwrap();
    assert!(json.contains("\"outcome\": \"Matched\""));
    assert!(json.contains("\"match_count\": 1"));

    let csv = engine.export_report_csv(request.clone()).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.lines().nth(1).unwrap().starts_with("D1,donor-first,1,P1,"));

    let unknown = FfiReportRequest {
        anchor_id: "D404".into(),
        ..request
    };
    assert!(matches!(
        engine.export_report_json(unknown),
        Err(LifeMatchError::NotFound(_))
    ));
}

#[test]
fn test_engine_with_config() {
    let engine = create_engine_with_config(
        "[scoring.donor_first]\ntissue_bonus = 30\n".into(),
        Some(1),
    )
    .unwrap();
    let score = engine
        .score_match(
            make_donor("D1", "O-", "HLA-A2", "Excellent", 40),
            make_patient("P1", "O-", "HLA-A2"),
            FfiMatchPolicy::DonorFirst,
            Some(NOW.into()),
        )
        .unwrap();
    assert_eq!(score, 95);

    let invalid = create_engine_with_config("[viability]\ndefault_max_days = 0\n".into(), None);
    assert!(matches!(invalid, Err(LifeMatchError::ConfigError(_))));
}
