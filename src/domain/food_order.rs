use super::money::Money;
use super::ports::Document;
use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodOrderStatus {
    #[default]
    Pending,
    Preparing,
    Delivered,
    Cancelled,
}

impl FoodOrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FoodOrderStatus::Pending => "pending",
            FoodOrderStatus::Preparing => "preparing",
            FoodOrderStatus::Delivered => "delivered",
            FoodOrderStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderKind {
    #[default]
    RoomService,
    Amenity,
}

impl OrderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderKind::RoomService => "room-service",
            OrderKind::Amenity => "amenity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub item: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl OrderItem {
    pub fn line_total(&self) -> Result<Money, LedgerError> {
        Money::new(self.price).checked_mul(self.quantity)
    }
}

/// Checks an item list and returns its total (Σ quantity × price).
pub fn priced_total(items: &[OrderItem]) -> Result<Money, LedgerError> {
    if items.is_empty() {
        return Err(LedgerError::invalid("at least one item is required"));
    }
    for item in items {
        if item.item.trim().is_empty() {
            return Err(LedgerError::invalid("item name must not be empty"));
        }
        if item.quantity == 0 {
            return Err(LedgerError::invalid(format!(
                "quantity of `{}` must be at least 1",
                item.item
            )));
        }
        Money::non_negative(item.price, "price")?;
    }
    items
        .iter()
        .try_fold(Money::ZERO, |total, item| total.checked_add(item.line_total()?))
}

/// A room-service or amenity order, optionally linked to a booking's bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodOrder {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    pub kind: OrderKind,
    items: Vec<OrderItem>,
    total: Money,
    pub status: FoodOrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub special_instructions: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    version: u64,
}

/// Fields accepted when placing an order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewFoodOrder {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "booking")]
    pub booking_id: Option<String>,
    #[serde(default, alias = "room")]
    pub room_number: Option<String>,
    #[serde(default)]
    pub kind: OrderKind,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

/// Partial edit of an existing order; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FoodOrderUpdate {
    #[serde(default)]
    pub status: Option<FoodOrderStatus>,
    #[serde(default)]
    pub items: Option<Vec<OrderItem>>,
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

impl FoodOrder {
    pub fn place(id: String, order: NewFoodOrder, created_by: &str) -> Result<Self, LedgerError> {
        if order.booking_id.is_none() && order.room_number.is_none() {
            return Err(LedgerError::invalid(
                "a food order needs a booking id or a room number",
            ));
        }
        let total = priced_total(&order.items)?;
        let now = Utc::now();

        Ok(Self {
            id,
            booking_id: order.booking_id,
            room_number: order.room_number,
            kind: order.kind,
            items: order.items,
            total,
            status: FoodOrderStatus::Pending,
            delivery_time: order.delivery_time,
            special_instructions: order.special_instructions.unwrap_or_default(),
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn total(&self) -> Money {
        self.total
    }

    /// Applies `update`. Returns true when the total changed.
    pub fn apply(&mut self, update: FoodOrderUpdate) -> Result<bool, LedgerError> {
        let repriced = match update.items {
            Some(items) => {
                let total = priced_total(&items)?;
                Some((items, total))
            }
            None => None,
        };

        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(delivery_time) = update.delivery_time {
            self.delivery_time = Some(delivery_time);
        }
        if let Some(instructions) = update.special_instructions {
            self.special_instructions = instructions;
        }

        let mut total_changed = false;
        if let Some((items, total)) = repriced {
            total_changed = total != self.total;
            self.items = items;
            self.total = total;
        }
        self.updated_at = Utc::now();
        Ok(total_changed)
    }
}

impl Document for FoodOrder {
    const COLLECTION: &'static str = "food_orders";
    const ENTITY: &'static str = "food order";

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

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderStats {
    pub pending: usize,
    pub preparing: usize,
    pub delivered: usize,
    pub cancelled: usize,
    pub total: usize,
}

impl OrderStats {
    pub fn from_orders<'a>(orders: impl IntoIterator<Item = &'a FoodOrder>) -> Self {
        let mut stats = OrderStats::default();
        for order in orders {
            match order.status {
                FoodOrderStatus::Pending => stats.pending += 1,
                FoodOrderStatus::Preparing => stats.preparing += 1,
                FoodOrderStatus::Delivered => stats.delivered += 1,
                FoodOrderStatus::Cancelled => stats.cancelled += 1,
            }
            stats.total += 1;
        }
        stats
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<FoodOrderStatus>,
    pub room_number: Option<String>,
}

impl OrderFilter {
    pub fn matches(&self, order: &FoodOrder) -> bool {
        self.status.is_none_or(|s| order.status == s)
            && self
                .room_number
                .as_deref()
                .is_none_or(|room| order.room_number.as_deref() == Some(room))
    }
}
