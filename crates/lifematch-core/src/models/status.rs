//! Transplant waiting-list status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Waiting-list status of a patient.
///
/// Serialized as the dashboard's display label ("Active - Rank #24").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TransplantStatus {
    /// On the active list, optionally with a rank
    Active { rank: Option<u32> },
    /// Temporarily held
    OnHold,
    /// Registered but not listed
    Inactive,
}

/// Label did not name a known status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unrecognized transplant status: {0}")]
pub struct StatusParseError(pub String);

impl TransplantStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, TransplantStatus::Active { .. })
    }

    pub fn rank(&self) -> Option<u32> {
        match self {
            TransplantStatus::Active { rank } => *rank,
            _ => None,
        }
    }
}

impl FromStr for TransplantStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();

        // "inactive" contains "active", check it first
        if lower.starts_with("inactive") {
            return Ok(TransplantStatus::Inactive);
        }
        if lower.starts_with("on hold") || lower.starts_with("on-hold") || lower == "onhold" {
            return Ok(TransplantStatus::OnHold);
        }
        if lower.starts_with("active") {
            return Ok(TransplantStatus::Active {
                rank: parse_rank(&lower),
            });
        }

        Err(StatusParseError(s.to_string()))
    }
}

/// Extract the digits following the first '#'.
fn parse_rank(label: &str) -> Option<u32> {
    let (_, tail) = label.split_once('#')?;
    let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

impl fmt::Display for TransplantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransplantStatus::Active { rank: Some(rank) } => write!(f, "Active - Rank #{}", rank),
            TransplantStatus::Active { rank: None } => f.write_str("Active"),
            TransplantStatus::OnHold => f.write_str("On Hold"),
            TransplantStatus::Inactive => f.write_str("Inactive"),
        }
    }
}

impl TryFrom<String> for TransplantStatus {
    type Error = StatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransplantStatus> for String {
    fn from(status: TransplantStatus) -> Self {
        status.to_string()
    }
}

/// Status selector used by roster filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    OnHold,
    Inactive,
}

impl StatusFilter {
    pub fn matches(&self, status: &TransplantStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status.is_active(),
            StatusFilter::OnHold => matches!(status, TransplantStatus::OnHold),
            StatusFilter::Inactive => matches!(status, TransplantStatus::Inactive),
        }
    }
}
