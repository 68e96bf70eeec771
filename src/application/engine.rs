use super::billing::{BillingLedger, NewBill, NewPayment};
use super::loyalty::{LoyaltyProgram, NewMember};
use crate::domain::bill::{Bill, RevenueBreakdown};
use crate::domain::command::{Command, JournalEntry};
use crate::domain::food_order::{FoodOrder, OrderFilter, OrderStats};
use crate::domain::identity::require_caller;
use crate::domain::loyalty::LoyaltyMember;
use crate::domain::ports::{BillStoreBox, FoodOrderStoreBox, MemberStoreBox};
use crate::error::Result;

/// The store ports the engine runs against.
pub struct Stores {
    pub members: MemberStoreBox,
    pub bills: BillStoreBox,
    pub orders: FoodOrderStoreBox,
}

/// Final state of every collection after a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSnapshot {
    pub bills: Vec<Bill>,
    pub members: Vec<LoyaltyMember>,
    pub orders: Vec<FoodOrder>,
    pub order_stats: OrderStats,
    pub revenue: RevenueBreakdown,
}

/// The main entry point for replaying back-office commands.
///
/// `LedgerEngine` checks the caller's identity and routes each command to the
/// loyalty program or the billing ledger. Commands are applied one at a time,
/// each awaiting its store writes before the next starts.
pub struct LedgerEngine {
    loyalty: LoyaltyProgram,
    billing: BillingLedger,
}

impl LedgerEngine {
    /// Creates a new `LedgerEngine` over `stores`.
    ///
    /// `max_write_attempts` bounds how often a contended update is re-run.
    pub fn new(stores: Stores, max_write_attempts: u32) -> Self {
        Self {
            loyalty: LoyaltyProgram::new(stores.members, max_write_attempts),
            billing: BillingLedger::new(stores.bills, stores.orders, max_write_attempts),
        }
    }

    pub fn loyalty(&self) -> &LoyaltyProgram {
        &self.loyalty
    }

    pub fn billing(&self) -> &BillingLedger {
        &self.billing
    }

    /// Applies one journal entry. Entries without a caller are rejected
    /// before any store is touched.
    pub async fn process_command(&self, entry: JournalEntry) -> Result<()> {
        let caller = require_caller(entry.caller.as_ref())?;

        match entry.command {
            Command::CreateMember {
                id,
                name,
                email,
                phone,
            } => {
                self.loyalty
                    .create_member(NewMember {
                        id,
                        name,
                        email,
                        phone,
                    })
                    .await?;
            }
            Command::EarnPoints {
                member,
                points,
                booking,
            } => {
                self.loyalty.earn_points(&member, points, booking).await?;
            }
            Command::RedeemPoints {
                member,
                points,
                reward,
            } => {
                self.loyalty.redeem_points(&member, points, &reward).await?;
            }
            Command::CreateBill {
                id,
                booking,
                room_charges,
                amenities_charges,
                taxes,
            } => {
                self.billing
                    .create_bill(NewBill {
                        id,
                        booking_id: booking,
                        room_charges,
                        amenities_charges,
                        taxes,
                    })
                    .await?;
            }
            Command::AddPayment {
                bill,
                amount,
                method,
                reference,
            } => {
                self.billing
                    .add_payment(
                        &bill,
                        NewPayment {
                            amount,
                            method,
                            reference,
                        },
                    )
                    .await?;
            }
            Command::DeleteBill { id } => {
                self.billing.delete_bill(&id).await?;
            }
            Command::CreateFoodOrder(order) => {
                self.billing.create_food_order(order, caller).await?;
            }
            command @ Command::UpdateFoodOrder { .. } => {
                if let Some((id, update)) = command.into_food_order_update() {
                    self.billing.update_food_order(&id, update).await?;
                }
            }
            Command::DeleteFoodOrder { id } => {
                self.billing.delete_food_order(&id).await?;
            }
            Command::ResyncBill { id } => {
                self.billing.resync_bill(&id).await?;
            }
        }
        Ok(())
    }

    /// Consumes the engine and returns the final state of all collections.
    pub async fn into_snapshot(self) -> Result<LedgerSnapshot> {
        Ok(LedgerSnapshot {
            bills: self.billing.list_bills().await?,
            members: self.loyalty.list_members().await?,
            orders: self.billing.list_food_orders(&OrderFilter::default()).await?,
            order_stats: self.billing.order_stats().await?,
            revenue: self.billing.revenue_report(None, None).await?,
        })
    }
}
