use super::food_order::{FoodOrderStatus, FoodOrderUpdate, NewFoodOrder, OrderItem};
use super::identity::Caller;
use rust_decimal::Decimal;
use serde::Deserialize;

/// One back-office operation, as recorded in a command journal.
#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    CreateMember {
        #[serde(default)]
        id: Option<String>,
        name: String,
        #[serde(default)]
        email: Option<String>,
        #[serde(default)]
        phone: Option<String>,
    },
    EarnPoints {
        member: String,
        points: u64,
        #[serde(default)]
        booking: Option<String>,
    },
    RedeemPoints {
        member: String,
        points: u64,
        reward: String,
    },
    CreateBill {
        #[serde(default)]
        id: Option<String>,
        booking: String,
        #[serde(default)]
        room_charges: Decimal,
        #[serde(default)]
        amenities_charges: Decimal,
        #[serde(default)]
        taxes: Decimal,
    },
    AddPayment {
        bill: String,
        amount: Decimal,
        #[serde(default)]
        method: Option<String>,
        #[serde(default)]
        reference: Option<String>,
    },
    DeleteBill {
        id: String,
    },
    CreateFoodOrder(NewFoodOrder),
    UpdateFoodOrder {
        id: String,
        #[serde(default)]
        status: Option<FoodOrderStatus>,
        #[serde(default)]
        items: Option<Vec<OrderItem>>,
        #[serde(default)]
        delivery_time: Option<String>,
        #[serde(default)]
        special_instructions: Option<String>,
    },
    DeleteFoodOrder {
        id: String,
    },
    ResyncBill {
        id: String,
    },
}

impl Command {
    /// Splits an `update_food_order` command into its target and edit.
    pub fn into_food_order_update(self) -> Option<(String, FoodOrderUpdate)> {
        match self {
            Command::UpdateFoodOrder {
                id,
                status,
                items,
                delivery_time,
                special_instructions,
            } => Some((
                id,
                FoodOrderUpdate {
                    status,
                    items,
                    delivery_time,
                    special_instructions,
                },
            )),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateMember { .. } => "create_member",
            Command::EarnPoints { .. } => "earn_points",
            Command::RedeemPoints { .. } => "redeem_points",
            Command::CreateBill { .. } => "create_bill",
            Command::AddPayment { .. } => "add_payment",
            Command::DeleteBill { .. } => "delete_bill",
            Command::CreateFoodOrder(_) => "create_food_order",
            Command::UpdateFoodOrder { .. } => "update_food_order",
            Command::DeleteFoodOrder { .. } => "delete_food_order",
            Command::ResyncBill { .. } => "resync_bill",
        }
    }
}

/// A journal line: the command plus whoever issued it.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct JournalEntry {
    #[serde(default)]
    pub caller: Option<Caller>,
    #[serde(flatten)]
    pub command: Command,
}
