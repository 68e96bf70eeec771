use super::ports::Document;
use super::tier::{Benefit, Tier};
use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Earned,
    Redeemed,
}

/// One history record of points earned or redeemed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub amount: u64,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<String>,
}

/// A loyalty program member.
///
/// The tier and benefit list are never stored; they are derived from
/// `points` on every read, so they cannot drift from the balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyMember {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    points: u64,
    history: Vec<LedgerEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    version: u64,
}

impl LoyaltyMember {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            phone: None,
            points: 0,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn tier(&self) -> Tier {
        Tier::for_points(self.points)
    }

    pub fn benefits(&self) -> &'static [Benefit] {
        self.tier().benefits()
    }

    pub fn history(&self) -> &[LedgerEntry] {
        &self.history
    }

    /// Credits `amount` points and records the entry.
    pub fn earn(&mut self, amount: u64, booking_id: Option<String>) -> Result<Tier, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::invalid("points to earn must be positive"));
        }
        let points = self
            .points
            .checked_add(amount)
            .ok_or_else(|| LedgerError::invalid("points balance would overflow"))?;

        let now = Utc::now();
        self.points = points;
        self.history.push(LedgerEntry {
            kind: EntryKind::Earned,
            amount,
            date: now,
            booking_id,
            reward: None,
        });
        self.updated_at = now;
        Ok(self.tier())
    }

    /// Debits `amount` points against `reward`. Leaves the member untouched on failure.
    pub fn redeem(&mut self, amount: u64, reward: impl Into<String>) -> Result<Tier, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::invalid("points to redeem must be positive"));
        }
        if amount > self.points {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available: self.points,
            });
        }

        let now = Utc::now();
        self.points -= amount;
        self.history.push(LedgerEntry {
            kind: EntryKind::Redeemed,
            amount,
            date: now,
            booking_id: None,
            reward: Some(reward.into()),
        });
        self.updated_at = now;
        Ok(self.tier())
    }
}

impl Document for LoyaltyMember {
    const COLLECTION: &'static str = "loyalty";
    const ENTITY: &'static str = "loyalty member";

    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_member_is_bronze() {
        let member = LoyaltyMember::new("m1", "Ada");
        assert_eq!(member.points(), 0);
        assert_eq!(member.tier(), Tier::Bronze);
        assert_eq!(member.benefits(), Tier::Bronze.benefits());
        assert!(member.history().is_empty());
    }

    #[test]
    fn test_earn_promotes_tier() {
        let mut member = LoyaltyMember::new("m1", "Ada");
        let tier = member.earn(2_000, Some("B-7".to_string())).unwrap();

        assert_eq!(tier, Tier::Silver);
        assert_eq!(member.points(), 2_000);
        assert_eq!(member.benefits().len(), 3);

        let entry = &member.history()[0];
        assert_eq!(entry.kind, EntryKind::Earned);
        assert_eq!(entry.amount, 2_000);
        assert_eq!(entry.booking_id.as_deref(), Some("B-7"));
    }

    #[test]
    fn test_earn_rejects_zero() {
        let mut member = LoyaltyMember::new("m1", "Ada");
        assert!(matches!(
            member.earn(0, None),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(member.history().is_empty());
    }

    #[test]
    fn test_earn_overflow() {
        let mut member = LoyaltyMember::new("m1", "Ada");
        member.earn(u64::MAX, None).unwrap();
        assert!(member.earn(1, None).is_err());
        assert_eq!(member.points(), u64::MAX);
        assert_eq!(member.history().len(), 1);
    }

    #[test]
    fn test_redeem_insufficient_leaves_member_unchanged() {
        let mut member = LoyaltyMember::new("m1", "Ada");
        member.earn(100, None).unwrap();
        let before = member.clone();

        let result = member.redeem(101, "spa");
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance {
                requested: 101,
                available: 100
            })
        ));
        assert_eq!(member, before);
    }

    #[test]
    fn test_earn_then_redeem_restores_tier() {
        let mut member = LoyaltyMember::new("m1", "Ada");
        member.earn(4_500, None).unwrap();
        let tier_before = member.tier();

        member.earn(600, None).unwrap();
        assert_eq!(member.tier(), Tier::Gold);

        let tier = member.redeem(600, "x").unwrap();
        assert_eq!(member.points(), 4_500);
        assert_eq!(tier, tier_before);
        assert_eq!(member.history()[2].reward.as_deref(), Some("x"));
    }

    #[test]
    fn test_history_serializes_type_tag() {
        let mut member = LoyaltyMember::new("m1", "Ada");
        member.earn(10, None).unwrap();
        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["history"][0]["type"], "earned");
        assert!(json["history"][0].get("reward").is_none());
    }
}
