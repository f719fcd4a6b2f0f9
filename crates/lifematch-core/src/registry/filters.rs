//! Roster search filters used by the dashboard tables.

use serde::{Deserialize, Serialize};

use crate::models::{same_organ, Donor, Patient, StatusFilter};

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn normalized_query(query: &str) -> Option<String> {
    let query = query.trim();
    (!query.is_empty()).then(|| query.to_lowercase())
}

/// Patient table filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientFilter {
    /// Case-insensitive substring of the name or id
    pub query: String,
    pub status: StatusFilter,
    /// Organ needed; empty or "all" for any
    pub organ: String,
}

impl PatientFilter {
    pub fn matches(&self, patient: &Patient) -> bool {
        if let Some(query) = normalized_query(&self.query) {
            if !contains_ignore_case(&patient.full_name, &query)
                && !contains_ignore_case(&patient.id, &query)
            {
                return false;
            }
        }
        if !self.status.matches(&patient.transplant_status) {
            return false;
        }
        organ_matches(&self.organ, &patient.organ_needed)
    }

    /// Patients passing the filter, in roster order.
    pub fn apply<'a>(&self, patients: &'a [Patient]) -> Vec<&'a Patient> {
        patients.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Donor table filter. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DonorFilter {
    /// Case-insensitive substring of the donor id, hospital or location
    pub query: String,
    pub organ: String,
}

impl DonorFilter {
    pub fn matches(&self, donor: &Donor) -> bool {
        if let Some(query) = normalized_query(&self.query) {
            let hit = [&donor.donor_id, &donor.hospital, &donor.location]
                .iter()
                .any(|field| contains_ignore_case(field, &query));
            if !hit {
                return false;
            }
        }
        organ_matches(&self.organ, &donor.organ_available)
    }

    pub fn apply<'a>(&self, donors: &'a [Donor]) -> Vec<&'a Donor> {
        donors.iter().filter(|d| self.matches(d)).collect()
    }
}

fn organ_matches(filter: &str, organ: &str) -> bool {
    let filter = filter.trim();
    filter.is_empty() || filter.eq_ignore_ascii_case("all") || same_organ(filter, organ)
}
