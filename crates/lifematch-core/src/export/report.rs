//! Match report export for coordinators and downstream systems.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::MatchQuery;
use crate::models::{MatchPolicy, MatchResult};

/// Record a search was anchored on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ReportAnchor {
    Patient(String),
    Donor(String),
}

impl ReportAnchor {
    pub fn id(&self) -> &str {
        match self {
            ReportAnchor::Patient(id) | ReportAnchor::Donor(id) => id,
        }
    }
}

impl From<&MatchQuery<'_>> for ReportAnchor {
    fn from(query: &MatchQuery<'_>) -> Self {
        match query {
            MatchQuery::DonorsFor { .. } => ReportAnchor::Patient(query.anchor_id().to_string()),
            MatchQuery::PatientsFor { .. } => ReportAnchor::Donor(query.anchor_id().to_string()),
        }
    }
}

/// Whether the search produced a usable match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Matched,
    ContinueSearching,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::Matched => f.write_str("Matched"),
            MatchOutcome::ContinueSearching => f.write_str("Continue searching"),
        }
    }
}

/// Match report for a single search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Ranked lines, best first
    pub lines: Vec<MatchReportLine>,
}

/// Match report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub anchor: ReportAnchor,
    pub policy: MatchPolicy,
    /// Instant the search was evaluated at
    pub generated_at: String,
    pub outcome: MatchOutcome,
    pub match_count: usize,
}

/// One ranked pairing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReportLine {
    /// 1-based position in the ranking
    pub rank: usize,
    pub patient_id: String,
    pub patient_name: String,
    pub patient_blood_type: String,
    pub donor_id: String,
    pub donor_blood_type: String,
    pub organ: String,
    pub compatibility_score: u8,
    pub tier: String,
    pub days_remaining: Option<u32>,
    pub percent_remaining: Option<u8>,
    pub urgency: Option<String>,
    pub hospital: String,
}

impl MatchReport {
    /// Build a report from ranked results.
    pub fn from_matches(
        anchor: ReportAnchor,
        policy: MatchPolicy,
        results: &[MatchResult],
        generated_at: DateTime<Utc>,
    ) -> Self {
        let lines: Vec<MatchReportLine> = results
            .iter()
            .enumerate()
            .map(|(i, result)| MatchReportLine {
                rank: i + 1,
                patient_id: result.patient.id.clone(),
                patient_name: result.patient.full_name.clone(),
                patient_blood_type: result.patient.blood_type.clone(),
                donor_id: result.donor.donor_id.clone(),
                donor_blood_type: result.donor.blood_type.clone(),
                organ: result.donor.organ_available.clone(),
                compatibility_score: result.compatibility_score,
                tier: result.tier().to_string(),
                days_remaining: result.viability.map(|v| v.days_remaining),
                percent_remaining: result.viability.map(|v| v.percent_remaining),
                urgency: result.viability.map(|v| v.urgency_level.to_string()),
                hospital: result.donor.hospital.clone(),
            })
            .collect();

        let outcome = if lines.is_empty() {
            MatchOutcome::ContinueSearching
        } else {
            MatchOutcome::Matched
        };

        Self {
            metadata: ReportMetadata {
                anchor,
                policy,
                generated_at: generated_at.to_rfc3339(),
                outcome,
                match_count: lines.len(),
            },
            lines,
        }
    }

    /// Best-ranked line, if any.
    pub fn best(&self) -> Option<&MatchReportLine> {
        self.lines.first()
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export to CSV format.
    ///
    /// A search without matches still yields the header row.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        csv.push_str("anchor_id,policy,rank,patient_id,patient_name,patient_blood_type,donor_id,donor_blood_type,organ,score,tier,days_remaining,percent_remaining,urgency,hospital,generated_at\n");

        for line in &self.lines {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
                escape_csv(self.metadata.anchor.id()),
                self.metadata.policy,
                line.rank,
                escape_csv(&line.patient_id),
                escape_csv(&line.patient_name),
                escape_csv(&line.patient_blood_type),
                escape_csv(&line.donor_id),
                escape_csv(&line.donor_blood_type),
                escape_csv(&line.organ),
                line.compatibility_score,
                line.tier,
                optional(line.days_remaining),
                optional(line.percent_remaining),
                line.urgency.as_deref().unwrap_or(""),
                escape_csv(&line.hospital),
                escape_csv(&self.metadata.generated_at),
            ));
        }

        csv
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Escape a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
