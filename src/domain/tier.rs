//! Loyalty tiers and the benefits attached to each.
//!
//! Both mappings are total and static: a points balance always resolves to
//! exactly one tier, and a tier always resolves to the same benefit list.

use serde::{Deserialize, Serialize};

pub const SILVER_THRESHOLD: u64 = 2_000;
pub const GOLD_THRESHOLD: u64 = 5_000;
pub const PLATINUM_THRESHOLD: u64 = 10_000;

/// Membership level, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BenefitKind {
    Discount,
    Welcome,
    LateCheckout,
    Breakfast,
    Upgrade,
}

/// A named perk attached to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Benefit {
    #[serde(rename = "type")]
    pub kind: BenefitKind,
    pub description: &'static str,
    pub active: bool,
}

const fn benefit(kind: BenefitKind, description: &'static str) -> Benefit {
    Benefit {
        kind,
        description,
        active: true,
    }
}

const BRONZE_BENEFITS: [Benefit; 2] = [
    benefit(BenefitKind::Discount, "5% off on room rates"),
    benefit(BenefitKind::Welcome, "Welcome drink on arrival"),
];

const SILVER_BENEFITS: [Benefit; 3] = [
    benefit(BenefitKind::Discount, "10% off on room rates"),
    benefit(BenefitKind::Welcome, "Welcome drink on arrival"),
    benefit(BenefitKind::LateCheckout, "Late checkout until 2 PM"),
];

const GOLD_BENEFITS: [Benefit; 4] = [
    benefit(BenefitKind::Discount, "15% off on room rates"),
    benefit(BenefitKind::Welcome, "Welcome drink on arrival"),
    benefit(BenefitKind::LateCheckout, "Late checkout until 4 PM"),
    benefit(BenefitKind::Breakfast, "Complimentary breakfast"),
];

const PLATINUM_BENEFITS: [Benefit; 5] = [
    benefit(BenefitKind::Discount, "20% off on room rates"),
    benefit(BenefitKind::Welcome, "Welcome drink on arrival"),
    benefit(BenefitKind::LateCheckout, "Late checkout until 6 PM"),
    benefit(BenefitKind::Breakfast, "Complimentary breakfast"),
    benefit(BenefitKind::Upgrade, "Room upgrade subject to availability"),
];

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Bronze, Tier::Silver, Tier::Gold, Tier::Platinum];

    /// Resolves a points balance to its tier. Lower bounds are inclusive.
    pub fn for_points(points: u64) -> Self {
        if points >= PLATINUM_THRESHOLD {
            Tier::Platinum
        } else if points >= GOLD_THRESHOLD {
            Tier::Gold
        } else if points >= SILVER_THRESHOLD {
            Tier::Silver
        } else {
            Tier::Bronze
        }
    }

    /// Resolves a stored tier label. Unknown labels fall back to bronze.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "silver" => Tier::Silver,
            "gold" => Tier::Gold,
            "platinum" => Tier::Platinum,
            _ => Tier::Bronze,
        }
    }

    pub fn benefits(self) -> &'static [Benefit] {
        match self {
            Tier::Bronze => &BRONZE_BENEFITS,
            Tier::Silver => &SILVER_BENEFITS,
            Tier::Gold => &GOLD_BENEFITS,
            Tier::Platinum => &PLATINUM_BENEFITS,
        }
    }

    /// Room-rate discount percentage granted by this tier.
    pub fn discount_percent(self) -> u8 {
        match self {
            Tier::Bronze => 5,
            Tier::Silver => 10,
            Tier::Gold => 15,
            Tier::Platinum => 20,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Platinum => "platinum",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn tier_for(points: u64) -> Tier {
    Tier::for_points(points)
}

pub fn benefits_for(tier: Tier) -> &'static [Benefit] {
    tier.benefits()
}
