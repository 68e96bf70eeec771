use super::{new_id, update_with_retry};
use crate::domain::loyalty::LoyaltyMember;
use crate::domain::ports::{Document, MemberStoreBox};
use crate::domain::tier::Tier;
use crate::error::{LedgerError, Result};
use tracing::debug;

/// Fields accepted when enrolling a member.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMember {
    pub id: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Balance and tier after a points movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointsOutcome {
    pub member_id: String,
    pub new_points: u64,
    pub new_tier: Tier,
}

pub struct LoyaltyProgram {
    members: MemberStoreBox,
    max_write_attempts: u32,
}

impl LoyaltyProgram {
    pub fn new(members: MemberStoreBox, max_write_attempts: u32) -> Self {
        Self {
            members,
            max_write_attempts,
        }
    }

    /// Enrolls a member with zero points at bronze.
    pub async fn create_member(&self, new: NewMember) -> Result<LoyaltyMember> {
        if new.name.trim().is_empty() {
            return Err(LedgerError::invalid("member name must not be empty"));
        }

        let mut member = LoyaltyMember::new(new.id.unwrap_or_else(new_id), new.name);
        member.email = new.email;
        member.phone = new.phone;

        self.members.insert(member.clone()).await?;
        debug!(member = %member.id, "loyalty member enrolled");
        Ok(member)
    }

    pub async fn get_member(&self, id: &str) -> Result<LoyaltyMember> {
        self.members
            .get(id)
            .await?
            .ok_or_else(|| LedgerError::not_found(LoyaltyMember::ENTITY, id))
    }

    /// All members, highest balance first.
    pub async fn list_members(&self) -> Result<Vec<LoyaltyMember>> {
        let mut members = self.members.all().await?;
        members.sort_by(|a, b| b.points().cmp(&a.points()).then_with(|| a.id.cmp(&b.id)));
        Ok(members)
    }

    pub async fn earn_points(
        &self,
        member_id: &str,
        amount: u64,
        booking_id: Option<String>,
    ) -> Result<PointsOutcome> {
        if amount == 0 {
            return Err(LedgerError::invalid("points to earn must be positive"));
        }

        let (member, new_tier) = update_with_retry(
            self.members.as_ref(),
            member_id,
            self.max_write_attempts,
            |member| member.earn(amount, booking_id.clone()),
        )
        .await?;

        debug!(
            member = member_id,
            amount,
            points = member.points(),
            tier = %new_tier,
            "points earned"
        );
        let new_points = member.points();
        Ok(PointsOutcome {
            member_id: member.id,
            new_points,
            new_tier,
        })
    }

    pub async fn redeem_points(
        &self,
        member_id: &str,
        amount: u64,
        reward: &str,
    ) -> Result<PointsOutcome> {
        if amount == 0 {
            return Err(LedgerError::invalid("points to redeem must be positive"));
        }

        let (member, new_tier) = update_with_retry(
            self.members.as_ref(),
            member_id,
            self.max_write_attempts,
            |member| member.redeem(amount, reward),
        )
        .await?;

        debug!(
            member = member_id,
            amount,
            reward,
            points = member.points(),
            tier = %new_tier,
            "points redeemed"
        );
        let new_points = member.points();
        Ok(PointsOutcome {
            member_id: member.id,
            new_points,
            new_tier,
        })
    }
}
