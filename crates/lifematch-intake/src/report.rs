//! Rosters-to-report pipeline behind the `lifematch-report` command.

use chrono::{DateTime, Utc};
use log::info;
use rand::Rng;

use lifematch_core::matching::{MatchQuery, Matcher, RandomDistancePenalty};
use lifematch_core::models::{Donor, Patient};
use lifematch_core::registry::{find_donor, find_patient};
use lifematch_core::{EngineConfig, MatchReport, ReportAnchor};

use crate::error::IntakeResult;

/// Rank the pool against `anchor` under its canonical policy and build the
/// report. Distance penalties are drawn from `rng`.
pub fn build_report<R: Rng>(
    donors: &[Donor],
    patients: &[Patient],
    anchor: &ReportAnchor,
    config: &EngineConfig,
    now: DateTime<Utc>,
    rng: R,
) -> IntakeResult<MatchReport> {
    let query = match anchor {
        ReportAnchor::Patient(id) => MatchQuery::DonorsFor {
            patient: find_patient(patients, id)?,
            pool: donors,
        },
        ReportAnchor::Donor(id) => MatchQuery::PatientsFor {
            donor: find_donor(donors, id)?,
            pool: patients,
        },
    };

    let policy = query.canonical_policy();
    let mut distance = RandomDistancePenalty::new(rng);
    let results = Matcher::new(config, now).find_matches(query, policy, &mut distance);
    info!(
        "{} match(es) for {} under {} policy",
        results.len(),
        query.anchor_id(),
        policy
    );

    Ok(MatchReport::from_matches(
        ReportAnchor::from(&query),
        policy,
        &results,
        now,
    ))
}
