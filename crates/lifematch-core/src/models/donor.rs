//! Donor models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dates;
use super::organ::{Organ, OrganCondition};

/// An organ donor record as supplied by the donor registry.
///
/// Clinical labels stay as free text so that records with unrecognized
/// values still load; the engine degrades them instead of rejecting them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Donor {
    /// Registry identifier (e.g., "D0003")
    pub donor_id: String,
    /// ABO/Rh blood type (e.g., "O-", "AB+")
    pub blood_type: String,
    /// Offered organ (e.g., "Kidney")
    pub organ_available: String,
    /// City of the procuring hospital
    pub location: String,
    /// Procuring hospital
    pub hospital: String,
    /// Tissue/HLA token (e.g., "HLA-A2")
    pub tissue_type: String,
    /// Donor age in years
    pub age: u32,
    /// Procurement instant, start of the viability clock
    #[serde(deserialize_with = "dates::deserialize_instant")]
    pub donation_date: DateTime<Utc>,
    /// Organ condition label (Excellent, Good, Fair, Poor)
    pub organ_condition: String,
}

impl Donor {
    /// Create a donor with the fields the matching engine reads.
    pub fn new(
        donor_id: String,
        blood_type: String,
        organ_available: String,
        tissue_type: String,
        organ_condition: String,
        donation_date: DateTime<Utc>,
    ) -> Self {
        Self {
            donor_id,
            blood_type,
            organ_available,
            location: String::new(),
            hospital: String::new(),
            tissue_type,
            age: 0,
            donation_date,
            organ_condition,
        }
    }

    /// Typed organ, if the label is recognized.
    pub fn organ(&self) -> Option<Organ> {
        Organ::parse(&self.organ_available)
    }

    /// Typed condition, if the label is recognized.
    pub fn condition(&self) -> Option<OrganCondition> {
        OrganCondition::parse(&self.organ_condition)
    }
}
