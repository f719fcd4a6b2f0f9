//! ABO/Rh blood-type compatibility.
//!
//! Donor-centric table following standard transfusion rules:
//! O- is the universal donor, AB+ the universal recipient.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The eight ABO/Rh blood types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    ONeg,
    OPos,
    ANeg,
    APos,
    BNeg,
    BPos,
    AbNeg,
    AbPos,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::ONeg,
        BloodType::OPos,
        BloodType::ANeg,
        BloodType::APos,
        BloodType::BNeg,
        BloodType::BPos,
        BloodType::AbNeg,
        BloodType::AbPos,
    ];

    /// Parse a blood type label such as "AB+" or "O−".
    ///
    /// Accepts ASCII '-' and the Unicode minus sign, ignores case and
    /// surrounding whitespace. Anything else yields `None`.
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = label.trim().replace('\u{2212}', "-").to_uppercase();
        match normalized.as_str() {
            "O-" => Some(BloodType::ONeg),
            "O+" => Some(BloodType::OPos),
            "A-" => Some(BloodType::ANeg),
            "A+" => Some(BloodType::APos),
            "B-" => Some(BloodType::BNeg),
            "B+" => Some(BloodType::BPos),
            "AB-" => Some(BloodType::AbNeg),
            "AB+" => Some(BloodType::AbPos),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::ONeg => "O-",
            BloodType::OPos => "O+",
            BloodType::ANeg => "A-",
            BloodType::APos => "A+",
            BloodType::BNeg => "B-",
            BloodType::BPos => "B+",
            BloodType::AbNeg => "AB-",
            BloodType::AbPos => "AB+",
        }
    }

    /// Recipient types that can safely receive from this donor type.
    pub fn eligible_recipients(&self) -> &'static [BloodType] {
        use BloodType::*;
        match self {
            ONeg => &[ONeg, OPos, ANeg, APos, BNeg, BPos, AbNeg, AbPos],
            OPos => &[OPos, APos, BPos, AbPos],
            ANeg => &[ANeg, APos, AbNeg, AbPos],
            APos => &[APos, AbPos],
            BNeg => &[BNeg, BPos, AbNeg, AbPos],
            BPos => &[BPos, AbPos],
            AbNeg => &[AbNeg, AbPos],
            AbPos => &[AbPos],
        }
    }

    /// Donor types this recipient type can safely receive from.
    pub fn eligible_donors(&self) -> Vec<BloodType> {
        Self::ALL
            .into_iter()
            .filter(|donor| donor.can_donate_to(*self))
            .collect()
    }

    pub fn can_donate_to(&self, recipient: BloodType) -> bool {
        self.eligible_recipients().contains(&recipient)
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a recipient of `recipient_blood_type` can receive from a donor of
/// `donor_blood_type`. Unrecognized types on either side are never compatible.
pub fn is_blood_type_compatible(donor_blood_type: &str, recipient_blood_type: &str) -> bool {
    match (
        BloodType::parse(donor_blood_type),
        BloodType::parse(recipient_blood_type),
    ) {
        (Some(donor), Some(recipient)) => donor.can_donate_to(recipient),
        _ => false,
    }
}
