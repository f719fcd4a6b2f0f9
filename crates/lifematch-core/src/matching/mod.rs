//! Donor-patient matching engine.
//!
//! Pipeline: Organ filter → Blood-type gate → Policy scoring → Threshold → Stable rank
//!
//! Viability is computed for every donor that survives, so consumers can
//! flag organs close to the end of their window.

mod compatibility;
mod distance;
mod scorer;
mod viability;

pub use compatibility::*;
pub use distance::*;
pub use scorer::*;
pub use viability::*;

use chrono::{DateTime, Utc};
use log::{debug, trace, warn};

use crate::config::EngineConfig;
use crate::models::{same_organ, Donor, MatchPolicy, MatchResult, Patient};

/// The anchor record of a search and the pool it is matched against.
#[derive(Debug, Clone, Copy)]
pub enum MatchQuery<'a> {
    /// Rank donors for one patient
    DonorsFor {
        patient: &'a Patient,
        pool: &'a [Donor],
    },
    /// Rank patients for one donor
    PatientsFor {
        donor: &'a Donor,
        pool: &'a [Patient],
    },
}

impl<'a> MatchQuery<'a> {
    /// Policy used for this search direction unless overridden.
    pub fn canonical_policy(&self) -> MatchPolicy {
        match self {
            MatchQuery::DonorsFor { .. } => MatchPolicy::PatientFirst,
            MatchQuery::PatientsFor { .. } => MatchPolicy::DonorFirst,
        }
    }

    /// Identifier of the anchor record.
    pub fn anchor_id(&self) -> &'a str {
        match *self {
            MatchQuery::DonorsFor { patient, .. } => &patient.id,
            MatchQuery::PatientsFor { donor, .. } => &donor.donor_id,
        }
    }

    /// Candidate (donor, patient) pairs in pool order.
    fn pairs(&self) -> Vec<(&'a Donor, &'a Patient)> {
        match *self {
            MatchQuery::DonorsFor { patient, pool } => {
                pool.iter().map(|donor| (donor, patient)).collect()
            }
            MatchQuery::PatientsFor { donor, pool } => {
                pool.iter().map(|patient| (donor, patient)).collect()
            }
        }
    }
}

/// Matching orchestrator bound to a configuration and an instant.
pub struct Matcher<'a> {
    config: &'a EngineConfig,
    now: DateTime<Utc>,
}

impl<'a> Matcher<'a> {
    /// Create a matcher evaluating everything at `now`.
    pub fn new(config: &'a EngineConfig, now: DateTime<Utc>) -> Self {
        Self { config, now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Run a search under an explicit policy.
    ///
    /// Returns results sorted by descending score; ties keep pool order.
    /// An empty result is the normal "keep searching" outcome.
    pub fn find_matches<P: DistancePenalty + ?Sized>(
        &self,
        query: MatchQuery<'_>,
        policy: MatchPolicy,
        distance: &mut P,
    ) -> Vec<MatchResult> {
        let scorer = Scorer::new(&self.config.scoring, self.now);
        let threshold = self.config.scoring.threshold(policy);
        let pairs = query.pairs();
        let pool_size = pairs.len();

        let mut results: Vec<MatchResult> = pairs
            .into_iter()
            // 1. Same organ
            .filter(|(donor, patient)| same_organ(&donor.organ_available, &patient.organ_needed))
            // 2. Blood-type gate
            .filter(|(donor, patient)| {
                let compatible = is_blood_type_compatible(&donor.blood_type, &patient.blood_type);
                if !compatible {
                    trace!(
                        "Excluding {} -> {}: blood types {} -> {} incompatible",
                        donor.donor_id,
                        patient.id,
                        donor.blood_type,
                        patient.blood_type
                    );
                }
                compatible
            })
            // 3. Score and 4. threshold
            .filter_map(|(donor, patient)| {
                let breakdown = scorer.score(donor, patient, policy, &mut *distance);
                let score = breakdown.total();
                if score <= threshold {
                    trace!(
                        "Excluding {} -> {}: score {} not above {}",
                        donor.donor_id,
                        patient.id,
                        score,
                        threshold
                    );
                    return None;
                }
                Some(MatchResult {
                    patient: patient.clone(),
                    donor: donor.clone(),
                    compatibility_score: score,
                    breakdown,
                    policy,
                    viability: Some(self.config.viability.compute(donor, self.now)),
                })
            })
            .collect();

        // 5. Stable sort keeps pool order for equal scores
        results.sort_by(|a, b| b.compatibility_score.cmp(&a.compatibility_score));

        debug!(
            "{} search for {}: {} of {} candidates matched",
            policy,
            query.anchor_id(),
            results.len(),
            pool_size
        );

        results
    }

    /// Rank patients for a donor with the donor-first policy.
    pub fn find_patients_for_donor(&self, donor: &Donor, patients: &[Patient]) -> Vec<MatchResult> {
        self.find_matches(
            MatchQuery::PatientsFor {
                donor,
                pool: patients,
            },
            MatchPolicy::DonorFirst,
            &mut NoDistancePenalty,
        )
    }

    /// Rank donors for a patient with the patient-first policy.
    pub fn find_donors_for_patient<P: DistancePenalty + ?Sized>(
        &self,
        patient: &Patient,
        donors: &[Donor],
        distance: &mut P,
    ) -> Vec<MatchResult> {
        self.find_matches(
            MatchQuery::DonorsFor {
                patient,
                pool: donors,
            },
            MatchPolicy::PatientFirst,
            distance,
        )
    }
}

/// Patients needing the donor's organ whose blood type can receive it, unscored.
pub fn potential_recipients<'p>(donor: &Donor, patients: &'p [Patient]) -> Vec<&'p Patient> {
    if compatibility::BloodType::parse(&donor.blood_type).is_none() {
        warn!(
            "Donor {} has unrecognized blood type {:?}; no recipients possible",
            donor.donor_id, donor.blood_type
        );
    }
    patients
        .iter()
        .filter(|patient| same_organ(&donor.organ_available, &patient.organ_needed))
        .filter(|patient| is_blood_type_compatible(&donor.blood_type, &patient.blood_type))
        .collect()
}

/// Run a search with the default configuration.
pub fn find_matches<P: DistancePenalty + ?Sized>(
    query: MatchQuery<'_>,
    policy: MatchPolicy,
    now: DateTime<Utc>,
    distance: &mut P,
) -> Vec<MatchResult> {
    let config = EngineConfig::default();
    Matcher::new(&config, now).find_matches(query, policy, distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PatientDocuments, TransplantStatus};
    use chrono::{Duration, NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 12, 12, 0, 0).unwrap()
    }

    fn donor(id: &str, blood: &str, organ: &str, tissue: &str, condition: &str) -> Donor {
        let mut d = Donor::new(
            id.into(),
            blood.into(),
            organ.into(),
            tissue.into(),
            condition.into(),
            now() - Duration::days(2),
        );
        d.age = 40;
        d
    }

    fn patient(id: &str, blood: &str, organ: &str, hla: &str) -> Patient {
        Patient {
            id: id.into(),
            full_name: format!("Patient {}", id),
            dob: NaiveDate::from_ymd_opt(1985, 1, 1).unwrap(),
            organ_needed: organ.into(),
            blood_type: blood.into(),
            hla_typing: Some(hla.into()),
            transplant_status: TransplantStatus::Active { rank: None },
            last_review_date: None,
            documents: PatientDocuments::default(),
            justification: None,
        }
    }

    #[test]
    fn test_patients_for_donor_ranked() {
        let config = EngineConfig::default();
        let matcher = Matcher::new(&config, now());
        let d = donor("D1", "O-", "Kidney", "HLA-A2", "Good");
        let patients = vec![
            patient("P1", "A+", "Kidney", "HLA-B7"),  // 60
            patient("P2", "AB+", "Kidney", "HLA-A2"), // 80
            patient("P3", "O+", "Liver", "HLA-A2"),   // wrong organ
            patient("P4", "B-", "kidney", "HLA-A2, HLA-B8"), // 80
        ];

        let results = matcher.find_patients_for_donor(&d, &patients);
        let ids: Vec<&str> = results.iter().map(|r| r.patient.id.as_str()).collect();
        assert_eq!(ids, vec!["P2", "P4", "P1"]);
        assert_eq!(results[0].compatibility_score, 80);
        assert_eq!(results[2].compatibility_score, 60);
        assert!(results.iter().all(|r| r.policy == MatchPolicy::DonorFirst));
        assert!(results.iter().all(|r| r.viability.is_some()));
    }

    #[test]
    fn test_incompatible_blood_excluded() {
        let config = EngineConfig::default();
        let matcher = Matcher::new(&config, now());
        let d = donor("D1", "A+", "Kidney", "HLA-A2", "Excellent");
        let patients = vec![patient("P1", "B+", "Kidney", "HLA-A2")];
        assert!(matcher.find_patients_for_donor(&d, &patients).is_empty());
    }

    #[test]
    fn test_donors_for_patient_threshold() {
        let config = EngineConfig::default();
        let matcher = Matcher::new(&config, now());
        let p = patient("P1", "AB+", "Heart", "HLA-A2");
        let donors = vec![
            donor("D1", "O-", "Heart", "HLA-A2", "Excellent"), // 100
            donor("D2", "A+", "Heart", "HLA-B7", "Good"),      // 100-30-20 = 50, dropped
            donor("D3", "B+", "Heart", "HLA-A2", "Fair"),      // 80
            donor("D4", "O+", "Lung", "HLA-A2", "Excellent"),  // wrong organ
        ];

        let results = matcher.find_donors_for_patient(&p, &donors, &mut NoDistancePenalty);
        let ids: Vec<&str> = results.iter().map(|r| r.donor.donor_id.as_str()).collect();
        assert_eq!(ids, vec!["D1", "D3"]);
        assert!(results.iter().all(|r| r.compatibility_score > 50));
    }

    #[test]
    fn test_ties_keep_pool_order() {
        let config = EngineConfig::default();
        let matcher = Matcher::new(&config, now());
        let d = donor("D1", "O-", "Liver", "HLA-DR1", "Fair");
        let patients = vec![
            patient("P1", "A+", "Liver", "HLA-A1"),
            patient("P2", "B+", "Liver", "HLA-A3"),
            patient("P3", "O-", "Liver", "HLA-B7"),
        ];

        let results = matcher.find_patients_for_donor(&d, &patients);
        let ids: Vec<&str> = results.iter().map(|r| r.patient.id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P2", "P3"]);
    }

    #[test]
    fn test_explicit_policy_override() {
        let config = EngineConfig::default();
        let matcher = Matcher::new(&config, now());
        let p = patient("P1", "AB+", "Heart", "HLA-A2");
        let donors = vec![donor("D2", "A+", "Heart", "HLA-B7", "Good")];
        let query = MatchQuery::DonorsFor {
            patient: &p,
            pool: &donors,
        };
        assert_eq!(query.canonical_policy(), MatchPolicy::PatientFirst);

        let results = matcher.find_matches(query, MatchPolicy::DonorFirst, &mut NoDistancePenalty);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].compatibility_score, 60);
    }

    #[test]
    fn test_potential_recipients() {
        let d = donor("D1", "B-", "Pancreas", "HLA-A2", "Good");
        let patients = vec![
            patient("P1", "B+", "Pancreas", ""),
            patient("P2", "A+", "Pancreas", ""),
            patient("P3", "AB-", "pancreas", ""),
            patient("P4", "B-", "Kidney", ""),
        ];
        let ids: Vec<&str> = potential_recipients(&d, &patients)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["P1", "P3"]);
    }

    #[test]
    fn test_empty_pool() {
        let d = donor("D1", "O-", "Kidney", "HLA-A2", "Good");
        let results = find_matches(
            MatchQuery::PatientsFor { donor: &d, pool: &[] },
            MatchPolicy::DonorFirst,
            now(),
            &mut NoDistancePenalty,
        );
        assert!(results.is_empty());
    }
}
