//! Donor and patient record ingestion.
//!
//! Registries deliver either JSON arrays (the dashboard's own format) or
//! delimited text exports with a header row, semicolon-separated by default.
//! Table headers are matched loosely: `fullName`, `full_name` and
//! `Full Name` all name the same column.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use log::{debug, info};
use rand::Rng;

use lifematch_core::models::{dates, Donor, Patient, PatientDocuments, TransplantStatus};

use crate::error::{IntakeError, IntakeResult};

/// Default delimiter of registry table exports.
pub const DEFAULT_DELIMITER: char = ';';

/// One table row keyed by header.
pub type TableRecord = HashMap<String, String>;

/// A parsed table row with its line number in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// 1-based line in the source, header included
    pub line: usize,
    pub fields: TableRecord,
}

impl TableRow {
    fn lookup(&self, column: &str) -> Option<&str> {
        let wanted = normalize_header(column);
        self.fields
            .iter()
            .find(|(key, _)| normalize_header(key) == wanted)
            .map(|(_, value)| value.trim())
    }

    /// Non-empty value of a column.
    pub fn optional(&self, column: &str) -> Option<&str> {
        self.lookup(column).filter(|value| !value.is_empty())
    }

    /// Value of a column that must be present and non-empty.
    pub fn required(&self, column: &str) -> IntakeResult<&str> {
        self.optional(column).ok_or_else(|| IntakeError::MissingColumn {
            line: self.line,
            column: column.to_string(),
        })
    }

    fn number(&self, column: &str) -> IntakeResult<u32> {
        let raw = self.required(column)?;
        raw.parse().map_err(|_| IntakeError::InvalidNumber {
            line: self.line,
            column: column.to_string(),
            value: raw.to_string(),
        })
    }

    fn date(&self, column: &str) -> IntakeResult<NaiveDate> {
        let raw = self.required(column)?;
        self.parse_date(column, raw)
    }

    fn optional_date(&self, column: &str) -> IntakeResult<Option<NaiveDate>> {
        self.optional(column)
            .map(|raw| self.parse_date(column, raw))
            .transpose()
    }

    fn parse_date(&self, column: &str, raw: &str) -> IntakeResult<NaiveDate> {
        dates::parse_calendar_date(raw).ok_or_else(|| IntakeError::InvalidDate {
            line: self.line,
            column: column.to_string(),
            value: raw.to_string(),
        })
    }
}

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| !matches!(c, '_' | ' ' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split delimited text into rows keyed by the header row.
///
/// Blank lines are skipped. Rows shorter than the header simply lack the
/// trailing columns; extra cells are dropped.
pub fn parse_delimited(text: &str, delimiter: char) -> IntakeResult<Vec<TableRow>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header_line) = lines.next().ok_or(IntakeError::EmptyTable)?;
    let headers: Vec<String> = header_line
        .split(delimiter)
        .map(|h| h.trim().to_string())
        .collect();

    let rows: Vec<TableRow> = lines
        .map(|(line, text)| TableRow {
            line,
            fields: headers
                .iter()
                .cloned()
                .zip(text.split(delimiter).map(|v| v.trim().to_string()))
                .collect(),
        })
        .collect();

    debug!("Parsed {} table rows with {} columns", rows.len(), headers.len());
    Ok(rows)
}

/// Convert table rows to donors.
///
/// `location` and `hospital` are optional; every other donor field is required.
pub fn donors_from_table(rows: &[TableRow]) -> IntakeResult<Vec<Donor>> {
    rows.iter()
        .map(|row| -> IntakeResult<Donor> {
            let raw_date = row.required("donation_date")?;
            let donation_date =
                dates::parse_instant(raw_date).ok_or_else(|| IntakeError::InvalidDate {
                    line: row.line,
                    column: "donation_date".into(),
                    value: raw_date.to_string(),
                })?;
            Ok(Donor {
                donor_id: row.required("donor_id")?.to_string(),
                blood_type: row.required("blood_type")?.to_string(),
                organ_available: row.required("organ_available")?.to_string(),
                location: row.optional("location").unwrap_or_default().to_string(),
                hospital: row.optional("hospital").unwrap_or_default().to_string(),
                tissue_type: row.required("tissue_type")?.to_string(),
                age: row.number("age")?,
                donation_date,
                organ_condition: row.required("organ_condition")?.to_string(),
            })
        })
        .collect()
}

/// Convert table rows to patients.
///
/// Rows without an `id` are new registrations: they get a generated id and
/// start inactive with no documents, whatever the row says about status.
pub fn patients_from_table<R: Rng + ?Sized>(
    rows: &[TableRow],
    today: NaiveDate,
    rng: &mut R,
) -> IntakeResult<Vec<Patient>> {
    rows.iter()
        .map(|row| -> IntakeResult<Patient> {
            let full_name = row.required("fullName")?.to_string();
            let dob = row.date("dob")?;
            let organ_needed = row.required("organNeeded")?.to_string();
            let blood_type = row.required("bloodType")?.to_string();
            let hla_typing = row.optional("hlaTyping").map(str::to_string);

            let Some(id) = row.optional("id") else {
                let patient = Patient::register(
                    full_name,
                    dob,
                    organ_needed,
                    blood_type,
                    hla_typing,
                    today,
                    &mut *rng,
                );
                debug!("Line {}: registered new patient {}", row.line, patient.id);
                return Ok(patient);
            };

            let transplant_status = match row.optional("transplantStatus") {
                Some(label) => label
                    .parse::<TransplantStatus>()
                    .map_err(|source| IntakeError::InvalidStatus {
                        line: row.line,
                        source,
                    })?,
                None => TransplantStatus::Inactive,
            };

            Ok(Patient {
                id: id.to_string(),
                full_name,
                dob,
                organ_needed,
                blood_type,
                hla_typing,
                transplant_status,
                last_review_date: row.optional_date("lastReviewDate")?,
                documents: PatientDocuments::default(),
                justification: None,
            })
        })
        .collect()
}

/// Parse a JSON array of donors (snake_case fields).
pub fn parse_donors_json(json: &str) -> IntakeResult<Vec<Donor>> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a JSON array of patients (camelCase fields).
pub fn parse_patients_json(json: &str) -> IntakeResult<Vec<Patient>> {
    Ok(serde_json::from_str(json)?)
}

fn read_file(path: &Path) -> IntakeResult<String> {
    fs::read_to_string(path).map_err(|source| IntakeError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn is_table_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("txt"))
        .unwrap_or(false)
}

/// Load donors from a `.csv`/`.txt` semicolon table or a JSON file.
pub fn load_donors_file<P: AsRef<Path>>(path: P) -> IntakeResult<Vec<Donor>> {
    let path = path.as_ref();
    let text = read_file(path)?;
    let donors = if is_table_file(path) {
        donors_from_table(&parse_delimited(&text, DEFAULT_DELIMITER)?)?
    } else {
        parse_donors_json(&text)?
    };
    info!("Loaded {} donors from {:?}", donors.len(), path);
    Ok(donors)
}

/// Load patients from a `.csv`/`.txt` semicolon table or a JSON file.
pub fn load_patients_file<P: AsRef<Path>, R: Rng + ?Sized>(
    path: P,
    today: NaiveDate,
    rng: &mut R,
) -> IntakeResult<Vec<Patient>> {
    let path = path.as_ref();
    let text = read_file(path)?;
    let patients = if is_table_file(path) {
        patients_from_table(&parse_delimited(&text, DEFAULT_DELIMITER)?, today, rng)?
    } else {
        parse_patients_json(&text)?
    };
    info!("Loaded {} patients from {:?}", patients.len(), path);
    Ok(patients)
}
