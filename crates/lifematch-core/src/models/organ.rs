//! Organ types and procurement conditions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Transplantable organ types known to the viability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Organ {
    Heart,
    Lung,
    Liver,
    Kidney,
    Pancreas,
}

impl Organ {
    pub const ALL: [Organ; 5] = [
        Organ::Heart,
        Organ::Lung,
        Organ::Liver,
        Organ::Kidney,
        Organ::Pancreas,
    ];

    /// Parse an organ name (case-insensitive). Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|organ| organ.as_str().to_lowercase() == lower)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Organ::Heart => "Heart",
            Organ::Lung => "Lung",
            Organ::Liver => "Liver",
            Organ::Kidney => "Kidney",
            Organ::Pancreas => "Pancreas",
        }
    }
}

impl fmt::Display for Organ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clinical condition of a procured organ, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrganCondition {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl OrganCondition {
    pub const ALL: [OrganCondition; 4] = [
        OrganCondition::Excellent,
        OrganCondition::Good,
        OrganCondition::Fair,
        OrganCondition::Poor,
    ];

    /// Parse a condition label (case-insensitive). Unknown labels yield `None`.
    pub fn parse(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|condition| condition.as_str().to_lowercase() == lower)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrganCondition::Excellent => "Excellent",
            OrganCondition::Good => "Good",
            OrganCondition::Fair => "Fair",
            OrganCondition::Poor => "Poor",
        }
    }
}

impl fmt::Display for OrganCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare two free-text organ names the way the matching filter does.
pub fn same_organ(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_organ_case_insensitive() {
        assert_eq!(Organ::parse("kidney"), Some(Organ::Kidney));
        assert_eq!(Organ::parse(" Heart "), Some(Organ::Heart));
        assert_eq!(Organ::parse("Cornea"), None);
    }

    #[test]
    fn test_condition_ordering_best_first() {
        assert!(OrganCondition::Excellent < OrganCondition::Good);
        assert!(OrganCondition::Fair < OrganCondition::Poor);
        assert_eq!(OrganCondition::parse("FAIR"), Some(OrganCondition::Fair));
        assert_eq!(OrganCondition::parse("Critical"), None);
    }

    #[test]
    fn test_same_organ() {
        assert!(same_organ("Kidney", "kidney "));
        assert!(!same_organ("Kidney", "Liver"));
    }
}
