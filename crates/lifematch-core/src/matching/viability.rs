//! Organ viability calculator.
//!
//! Remaining viability is a pure function of the donor record and the
//! current instant, which callers pass in explicitly.

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::models::{Donor, Organ, OrganCondition, UrgencyLevel, ViabilitySnapshot};

/// Below this share of the window left, an organ is urgent.
const HIGH_URGENCY_BELOW_PERCENT: u8 = 25;

/// Below this share of the window left, urgency is medium.
const MEDIUM_URGENCY_BELOW_PERCENT: u8 = 50;

/// Viability window in days for each condition of one organ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionDays {
    pub excellent: u32,
    pub good: u32,
    pub fair: u32,
    pub poor: u32,
}

impl ConditionDays {
    pub const fn new(excellent: u32, good: u32, fair: u32, poor: u32) -> Self {
        Self {
            excellent,
            good,
            fair,
            poor,
        }
    }

    pub fn get(&self, condition: OrganCondition) -> u32 {
        match condition {
            OrganCondition::Excellent => self.excellent,
            OrganCondition::Good => self.good,
            OrganCondition::Fair => self.fair,
            OrganCondition::Poor => self.poor,
        }
    }

    fn values(&self) -> [u32; 4] {
        [self.excellent, self.good, self.fair, self.poor]
    }
}

/// Maximum viability days per organ and condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViabilityTable {
    pub heart: ConditionDays,
    pub lung: ConditionDays,
    pub liver: ConditionDays,
    pub kidney: ConditionDays,
    pub pancreas: ConditionDays,
    /// Window used when the organ or condition is not recognized
    pub default_max_days: u32,
}

impl Default for ViabilityTable {
    fn default() -> Self {
        Self {
            heart: ConditionDays::new(4, 3, 2, 1),
            lung: ConditionDays::new(5, 3, 2, 1),
            liver: ConditionDays::new(12, 8, 6, 3),
            kidney: ConditionDays::new(30, 20, 15, 7),
            pancreas: ConditionDays::new(12, 8, 5, 2),
            default_max_days: 5,
        }
    }
}

impl ViabilityTable {
    pub fn for_organ(&self, organ: Organ) -> &ConditionDays {
        match organ {
            Organ::Heart => &self.heart,
            Organ::Lung => &self.lung,
            Organ::Liver => &self.liver,
            Organ::Kidney => &self.kidney,
            Organ::Pancreas => &self.pancreas,
        }
    }

    /// Window for an organ/condition pair, falling back to the default.
    pub fn max_days(&self, organ: Option<Organ>, condition: Option<OrganCondition>) -> u32 {
        match (organ, condition) {
            (Some(organ), Some(condition)) => self.for_organ(organ).get(condition),
            _ => self.default_max_days,
        }
    }

    /// Every configured window, for validation.
    pub(crate) fn all_days(&self) -> impl Iterator<Item = u32> + '_ {
        Organ::ALL
            .into_iter()
            .flat_map(move |organ| self.for_organ(organ).values())
            .chain(std::iter::once(self.default_max_days))
    }

    /// Remaining viability of `donor`'s organ at `now`.
    pub fn compute(&self, donor: &Donor, now: DateTime<Utc>) -> ViabilitySnapshot {
        let organ = donor.organ();
        let condition = donor.condition();
        if organ.is_none() || condition.is_none() {
            warn!(
                "Donor {}: no viability entry for {} / {}, using default of {} days",
                donor.donor_id, donor.organ_available, donor.organ_condition, self.default_max_days
            );
        }

        let max_days = self.max_days(organ, condition);
        let days_since_donation = days_since(donor.donation_date, now);

        // Future-dated records would otherwise report more than the full window
        let remaining = (i64::from(max_days) - days_since_donation).clamp(0, i64::from(max_days));
        let days_remaining = remaining as u32;

        let percent_remaining = (u64::from(days_remaining) * 100)
            .checked_div(u64::from(max_days))
            .unwrap_or(0)
            .min(100) as u8;

        ViabilitySnapshot {
            days_since_donation,
            max_days,
            days_remaining,
            hours_remaining: days_remaining.saturating_mul(24),
            percent_remaining,
            is_urgent: percent_remaining < HIGH_URGENCY_BELOW_PERCENT,
            urgency_level: urgency_for(percent_remaining),
        }
    }
}

/// Whole days elapsed between `donation` and `now`, truncated toward zero.
pub fn days_since(donation: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(donation).num_days()
}

fn urgency_for(percent_remaining: u8) -> UrgencyLevel {
    if percent_remaining < HIGH_URGENCY_BELOW_PERCENT {
        UrgencyLevel::High
    } else if percent_remaining < MEDIUM_URGENCY_BELOW_PERCENT {
        UrgencyLevel::Medium
    } else {
        UrgencyLevel::Low
    }
}

/// Remaining viability using the default table.
pub fn compute_viability(donor: &Donor, now: DateTime<Utc>) -> ViabilitySnapshot {
    ViabilityTable::default().compute(donor, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 12, 9, 0, 0).unwrap()
    }

    fn donor(organ: &str, condition: &str, donated: DateTime<Utc>) -> Donor {
        Donor::new(
            "D0001".into(),
            "O-".into(),
            organ.into(),
            "HLA-A2".into(),
            condition.into(),
            donated,
        )
    }

    #[test]
    fn test_kidney_excellent_five_days() {
        let d = donor("Kidney", "Excellent", now() - Duration::days(5));
        let v = compute_viability(&d, now());

        assert_eq!(v.max_days, 30);
        assert_eq!(v.days_since_donation, 5);
        assert_eq!(v.days_remaining, 25);
        assert_eq!(v.hours_remaining, 600);
        assert_eq!(v.percent_remaining, 83);
        assert_eq!(v.urgency_level, UrgencyLevel::Low);
        assert!(!v.is_urgent);
    }

    #[test]
    fn test_heart_poor_expired() {
        let d = donor("Heart", "Poor", now() - Duration::days(2));
        let v = compute_viability(&d, now());

        assert_eq!(v.max_days, 1);
        assert_eq!(v.days_since_donation, 2);
        assert_eq!(v.days_remaining, 0);
        assert_eq!(v.percent_remaining, 0);
        assert_eq!(v.urgency_level, UrgencyLevel::High);
        assert!(v.is_urgent);
    }

    #[test]
    fn test_partial_days_truncate() {
        let d = donor("Liver", "Good", now() - Duration::hours(47));
        let v = compute_viability(&d, now());
        assert_eq!(v.days_since_donation, 1);
        assert_eq!(v.days_remaining, 7);
        assert_eq!(v.percent_remaining, 87);
    }

    #[test]
    fn test_medium_urgency_band() {
        // Liver Good: 8 days, 5 elapsed -> 3/8 = 37%
        let d = donor("Liver", "Good", now() - Duration::days(5));
        let v = compute_viability(&d, now());
        assert_eq!(v.percent_remaining, 37);
        assert_eq!(v.urgency_level, UrgencyLevel::Medium);
        assert!(!v.is_urgent);
    }

    #[test]
    fn test_unknown_organ_uses_default() {
        let d = donor("Cornea", "Excellent", now() - Duration::days(1));
        let v = compute_viability(&d, now());
        assert_eq!(v.max_days, 5);
        assert_eq!(v.days_remaining, 4);
        assert_eq!(v.percent_remaining, 80);

        let d = donor("Kidney", "Critical", now());
        assert_eq!(compute_viability(&d, now()).max_days, 5);
    }

    #[test]
    fn test_future_donation_capped_at_full_window() {
        let d = donor("Heart", "Excellent", now() + Duration::days(3));
        let v = compute_viability(&d, now());
        assert_eq!(v.days_since_donation, -3);
        assert_eq!(v.days_remaining, 4);
        assert_eq!(v.percent_remaining, 100);
    }

    #[test]
    fn test_huge_window_does_not_overflow() {
        let table = ViabilityTable {
            kidney: ConditionDays::new(50_000_000, 20, 15, 7),
            default_max_days: u32::MAX,
            ..ViabilityTable::default()
        };

        let d = donor("Kidney", "Excellent", now() - Duration::days(10));
        let v = table.compute(&d, now());
        assert_eq!(v.days_remaining, 49_999_990);
        assert_eq!(v.hours_remaining, 1_199_999_760);
        assert_eq!(v.percent_remaining, 99);

        let d = donor("Cornea", "Good", now());
        let v = table.compute(&d, now());
        assert_eq!(v.days_remaining, u32::MAX);
        assert_eq!(v.hours_remaining, u32::MAX);
        assert_eq!(v.percent_remaining, 100);
        assert_eq!(v.urgency_level, UrgencyLevel::Low);
    }

    #[test]
    fn test_zero_window_does_not_divide_by_zero() {
        let table = ViabilityTable {
            default_max_days: 0,
            ..ViabilityTable::default()
        };
        let d = donor("Cornea", "Good", now());
        let v = table.compute(&d, now());
        assert_eq!(v.percent_remaining, 0);
        assert_eq!(v.urgency_level, UrgencyLevel::High);
    }
}
