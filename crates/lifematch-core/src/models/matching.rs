//! Match and viability result models.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::donor::Donor;
use super::patient::Patient;

/// Scoring policy, tied to the direction of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// One donor, ranking candidate patients (additive, base 50)
    DonorFirst,
    /// One patient, ranking candidate donors (subtractive, start 100)
    PatientFirst,
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::DonorFirst => f.write_str("donor-first"),
            MatchPolicy::PatientFirst => f.write_str("patient-first"),
        }
    }
}

/// Breakdown of how a pair was scored.
///
/// Bonuses are positive and penalties negative; factors a policy does not
/// use stay at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Blood-type gate result; when false the score is 0
    pub blood_compatible: bool,
    /// Starting score of the policy
    pub base: i32,
    /// Tissue/HLA bonus or mismatch penalty
    pub tissue: i32,
    /// Organ condition bonus or penalty
    pub condition: i32,
    /// Donor/patient age gap penalty
    pub age: i32,
    /// Geographic distance penalty
    pub distance: i32,
}

impl ScoreBreakdown {
    /// Breakdown for a pair that failed the blood-type gate.
    pub fn incompatible() -> Self {
        Self::default()
    }

    /// Final score clamped to 0-100.
    pub fn total(&self) -> u8 {
        if !self.blood_compatible {
            return 0;
        }
        let sum = self.base + self.tissue + self.condition + self.age + self.distance;
        sum.clamp(0, 100) as u8
    }
}

/// Urgency band derived from the remaining viability percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UrgencyLevel {
    High,
    Medium,
    Low,
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrgencyLevel::High => f.write_str("High"),
            UrgencyLevel::Medium => f.write_str("Medium"),
            UrgencyLevel::Low => f.write_str("Low"),
        }
    }
}

/// Remaining viability of a donor organ at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViabilitySnapshot {
    /// Whole days since procurement (negative for future-dated records)
    pub days_since_donation: i64,
    /// Viability window for this organ and condition
    pub max_days: u32,
    pub days_remaining: u32,
    pub hours_remaining: u32,
    /// Share of the window left (0-100)
    pub percent_remaining: u8,
    pub is_urgent: bool,
    pub urgency_level: UrgencyLevel,
}

/// Display tier for a compatibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreTier {
    /// 90 and above
    Excellent,
    /// 70-89
    Strong,
    /// 50-69
    Fair,
    /// Below 50
    Weak,
}

impl ScoreTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => ScoreTier::Excellent,
            70..=89 => ScoreTier::Strong,
            50..=69 => ScoreTier::Fair,
            _ => ScoreTier::Weak,
        }
    }
}

impl fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreTier::Excellent => f.write_str("Excellent"),
            ScoreTier::Strong => f.write_str("Strong"),
            ScoreTier::Fair => f.write_str("Fair"),
            ScoreTier::Weak => f.write_str("Weak"),
        }
    }
}

/// A scored donor-patient pairing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchResult {
    pub patient: Patient,
    pub donor: Donor,
    /// Compatibility score (0-100)
    pub compatibility_score: u8,
    /// Factors behind the score
    pub breakdown: ScoreBreakdown,
    /// Policy that produced the score
    pub policy: MatchPolicy,
    /// Donor organ viability at match time
    pub viability: Option<ViabilitySnapshot>,
}

impl MatchResult {
    pub fn tier(&self) -> ScoreTier {
        ScoreTier::from_score(self.compatibility_score)
    }

    /// Whether the donor organ is close to the end of its window.
    pub fn is_urgent(&self) -> bool {
        self.viability.map(|v| v.is_urgent).unwrap_or(false)
    }
}
