//! Tests running the `lifematch-report` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const DONORS_CSV: &str = "\
donor_id;blood_type;organ_available;location;hospital;tissue_type;age;donation_date;organ_condition
D0003;O-;Kidney;Berlin;Charite;HLA-A2;44;2025-03-15;Excellent
";

const PATIENTS_JSON: &str = r#"[
  {
    "id": "P-20250312-001",
    "fullName": "John Doe",
    "dob": "12/08/1980",
    "organNeeded": "Kidney",
    "bloodType": "AB+",
    "hlaTyping": "HLA-A2",
    "transplantStatus": "Active - Rank #24"
  }
]"#;

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lifematch-report"))
        .arg("--donors")
        .arg(dir.join("donors.csv"))
        .arg("--patients")
        .arg(dir.join("patients.json"))
        .args(["--now", "2025-03-20", "--seed", "7"])
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn rosters() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("donors.csv"), DONORS_CSV).unwrap();
    fs::write(dir.path().join("patients.json"), PATIENTS_JSON).unwrap();
    dir
}

#[test]
fn test_report_for_donor_as_json() {
    let dir = rosters();
    let output = run(dir.path(), &["--donor", "D0003"]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["metadata"]["anchor"]["id"], "D0003");
    assert_eq!(report["lines"][0]["patient_id"], "P-20250312-001");
    assert_eq!(report["lines"][0]["compatibility_score"], 85);
}

#[test]
fn test_report_for_patient_as_csv() {
    let dir = rosters();
    let output = run(dir.path(), &["--patient", "P-20250312-001", "--format", "csv"]);
    assert!(output.status.success());

    let csv = String::from_utf8(output.stdout).unwrap();
    assert!(csv.starts_with("anchor_id,policy,rank,"));
    assert!(csv.contains("P-20250312-001"));
    assert!(csv.contains("D0003"));
}

#[test]
fn test_unknown_anchor_fails() {
    let dir = rosters();
    let output = run(dir.path(), &["--patient", "P-404"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("P-404"));
}

#[test]
fn test_patient_and_donor_conflict() {
    let dir = rosters();
    let output = run(dir.path(), &["--patient", "P-20250312-001", "--donor", "D0003"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_anchor_required() {
    let dir = rosters();
    let output = run(dir.path(), &[]);
    assert!(!output.status.success());
}
