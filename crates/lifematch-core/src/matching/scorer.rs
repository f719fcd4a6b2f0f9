//! Donor-patient match scoring.
//!
//! Two independent policies share one interface:
//!
//! - **Donor-first** (ranking patients for one donor): base 50, +20 tissue
//!   token found in the patient's HLA typing, +15/+10/+5/+0 for
//!   Excellent/Good/Fair/Poor, capped at 100. Kept when > 0.
//! - **Patient-first** (ranking donors for one patient): start 100, -20 for
//!   an age gap over 20 years (-10 over 10), -30 unless tissue and HLA typing
//!   are identical, minus a distance penalty in [0, 15), -20 unless the organ
//!   is Excellent. Kept when > 50.
//!
//! Both policies short-circuit to 0 when the blood types are incompatible.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::compatibility::is_blood_type_compatible;
use super::distance::DistancePenalty;
use crate::models::{Donor, MatchPolicy, OrganCondition, Patient, ScoreBreakdown};

/// How a donor tissue token is compared with a patient's HLA typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TissueRule {
    /// Patient HLA typing contains the donor token
    Containment,
    /// Patient HLA typing equals the donor token
    Exact,
}

impl TissueRule {
    /// Empty tokens and absent typing never match.
    pub fn matches(&self, tissue_type: &str, hla_typing: Option<&str>) -> bool {
        let tissue = tissue_type.trim();
        let Some(hla) = hla_typing.map(str::trim) else {
            return false;
        };
        if tissue.is_empty() || hla.is_empty() {
            return false;
        }
        match self {
            TissueRule::Containment => hla.contains(tissue),
            TissueRule::Exact => hla == tissue,
        }
    }
}

/// Weights for the donor-first policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DonorFirstWeights {
    pub base_score: i32,
    pub tissue_bonus: i32,
    pub excellent_bonus: i32,
    pub good_bonus: i32,
    pub fair_bonus: i32,
    pub poor_bonus: i32,
    pub tissue_rule: TissueRule,
    /// Results must score strictly above this
    pub min_score_exclusive: u8,
}

impl Default for DonorFirstWeights {
    fn default() -> Self {
        Self {
            base_score: 50,
            tissue_bonus: 20,
            excellent_bonus: 15,
            good_bonus: 10,
            fair_bonus: 5,
            poor_bonus: 0,
            tissue_rule: TissueRule::Containment,
            min_score_exclusive: 0,
        }
    }
}

impl DonorFirstWeights {
    fn condition_bonus(&self, condition: Option<OrganCondition>) -> i32 {
        match condition {
            Some(OrganCondition::Excellent) => self.excellent_bonus,
            Some(OrganCondition::Good) => self.good_bonus,
            Some(OrganCondition::Fair) => self.fair_bonus,
            Some(OrganCondition::Poor) => self.poor_bonus,
            None => 0,
        }
    }
}

/// Weights for the patient-first policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientFirstWeights {
    pub start_score: i32,
    pub major_age_gap_years: i32,
    pub major_age_gap_penalty: i32,
    pub minor_age_gap_years: i32,
    pub minor_age_gap_penalty: i32,
    pub tissue_mismatch_penalty: i32,
    /// Distance penalty is drawn from [0, this)
    pub max_distance_penalty: u32,
    pub non_excellent_penalty: i32,
    pub tissue_rule: TissueRule,
    /// Results must score strictly above this
    pub min_score_exclusive: u8,
}

impl Default for PatientFirstWeights {
    fn default() -> Self {
        Self {
            start_score: 100,
            major_age_gap_years: 20,
            major_age_gap_penalty: 20,
            minor_age_gap_years: 10,
            minor_age_gap_penalty: 10,
            tissue_mismatch_penalty: 30,
            max_distance_penalty: 15,
            non_excellent_penalty: 20,
            tissue_rule: TissueRule::Exact,
            min_score_exclusive: 50,
        }
    }
}

/// Per-policy scoring configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub donor_first: DonorFirstWeights,
    pub patient_first: PatientFirstWeights,
}

impl ScoringConfig {
    /// Score a result must exceed to be kept under `policy`.
    pub fn threshold(&self, policy: MatchPolicy) -> u8 {
        match policy {
            MatchPolicy::DonorFirst => self.donor_first.min_score_exclusive,
            MatchPolicy::PatientFirst => self.patient_first.min_score_exclusive,
        }
    }
}

/// Scores donor-patient pairs at a fixed instant.
pub struct Scorer<'a> {
    config: &'a ScoringConfig,
    now: DateTime<Utc>,
}

impl<'a> Scorer<'a> {
    pub fn new(config: &'a ScoringConfig, now: DateTime<Utc>) -> Self {
        Self { config, now }
    }

    /// Score a pair under `policy`.
    pub fn score<P: DistancePenalty + ?Sized>(
        &self,
        donor: &Donor,
        patient: &Patient,
        policy: MatchPolicy,
        distance: &mut P,
    ) -> ScoreBreakdown {
        match policy {
            MatchPolicy::DonorFirst => self.score_donor_first(donor, patient),
            MatchPolicy::PatientFirst => self.score_patient_first(donor, patient, distance),
        }
    }

    /// Additive scoring used when ranking patients for a donor.
    pub fn score_donor_first(&self, donor: &Donor, patient: &Patient) -> ScoreBreakdown {
        if !is_blood_type_compatible(&donor.blood_type, &patient.blood_type) {
            return ScoreBreakdown::incompatible();
        }
        let weights = &self.config.donor_first;

        let tissue = if weights
            .tissue_rule
            .matches(&donor.tissue_type, patient.hla())
        {
            weights.tissue_bonus
        } else {
            0
        };

        ScoreBreakdown {
            blood_compatible: true,
            base: weights.base_score,
            tissue,
            condition: weights.condition_bonus(donor.condition()),
            ..Default::default()
        }
    }

    /// Subtractive scoring used when ranking donors for a patient.
    pub fn score_patient_first<P: DistancePenalty + ?Sized>(
        &self,
        donor: &Donor,
        patient: &Patient,
        distance: &mut P,
    ) -> ScoreBreakdown {
        if !is_blood_type_compatible(&donor.blood_type, &patient.blood_type) {
            return ScoreBreakdown::incompatible();
        }
        let weights = &self.config.patient_first;

        let patient_age = patient.age_on(self.now.date_naive());
        let age_gap = (i64::from(donor.age) - i64::from(patient_age)).abs();
        let age = if age_gap > i64::from(weights.major_age_gap_years) {
            -weights.major_age_gap_penalty
        } else if age_gap > i64::from(weights.minor_age_gap_years) {
            -weights.minor_age_gap_penalty
        } else {
            0
        };

        let tissue = if weights
            .tissue_rule
            .matches(&donor.tissue_type, patient.hla())
        {
            0
        } else {
            -weights.tissue_mismatch_penalty
        };

        let distance_penalty = distance.penalty(donor, patient, weights.max_distance_penalty);

        let condition = match donor.condition() {
            Some(OrganCondition::Excellent) => 0,
            _ => -weights.non_excellent_penalty,
        };

        ScoreBreakdown {
            blood_compatible: true,
            base: weights.start_score,
            tissue,
            condition,
            age,
            distance: -(distance_penalty as i32),
        }
    }
}

/// Score a pair with the default weights.
pub fn score_match<P: DistancePenalty + ?Sized>(
    donor: &Donor,
    patient: &Patient,
    policy: MatchPolicy,
    now: DateTime<Utc>,
    distance: &mut P,
) -> u8 {
    let config = ScoringConfig::default();
    Scorer::new(&config, now)
        .score(donor, patient, policy, distance)
        .total()
}
