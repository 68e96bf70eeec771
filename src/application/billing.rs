use super::{new_id, update_with_retry};
use crate::domain::bill::{Bill, Charges, RevenueBreakdown, SettlementStatus};
use crate::domain::food_order::{FoodOrder, FoodOrderUpdate, NewFoodOrder, OrderFilter, OrderStats};
use crate::domain::identity::Caller;
use crate::domain::money::{Amount, Money};
use crate::domain::ports::{BillStoreBox, Document, FoodOrderStoreBox};
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Fields accepted when opening a bill.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewBill {
    pub id: Option<String>,
    pub booking_id: String,
    pub room_charges: Decimal,
    pub amenities_charges: Decimal,
    pub taxes: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPayment {
    pub amount: Decimal,
    pub method: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentReceipt {
    pub status: SettlementStatus,
    pub total_paid: Money,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderReceipt {
    pub order_id: String,
    pub total: Money,
}

/// Charge movement on a bill caused by a food order.
#[derive(Debug, Clone, Copy)]
enum FoodCharge {
    Post(Money),
    Reverse,
}

/// Keeps bills, their payments, and the food orders charged to them consistent.
pub struct BillingLedger {
    bills: BillStoreBox,
    orders: FoodOrderStoreBox,
    max_write_attempts: u32,
}

impl BillingLedger {
    pub fn new(bills: BillStoreBox, orders: FoodOrderStoreBox, max_write_attempts: u32) -> Self {
        Self {
            bills,
            orders,
            max_write_attempts,
        }
    }

    pub async fn create_bill(&self, new: NewBill) -> Result<Bill> {
        if new.booking_id.trim().is_empty() {
            return Err(LedgerError::invalid("bill needs a booking id"));
        }
        let charges = Charges::new(
            Money::non_negative(new.room_charges, "room charges")?,
            Money::non_negative(new.amenities_charges, "amenities charges")?,
            Money::non_negative(new.taxes, "taxes")?,
        );
        charges.checked_total()?;
        let bill = Bill::new(new.id.unwrap_or_else(new_id), new.booking_id, charges);

        self.bills.insert(bill.clone()).await?;
        debug!(bill = %bill.id, booking = %bill.booking_id, total = %bill.charges.total(), "bill opened");
        Ok(bill)
    }

    pub async fn get_bill(&self, id: &str) -> Result<Bill> {
        self.bills
            .get(id)
            .await?
            .ok_or_else(|| LedgerError::not_found(Bill::ENTITY, id))
    }

    /// All bills, newest first.
    pub async fn list_bills(&self) -> Result<Vec<Bill>> {
        let mut bills = self.bills.all().await?;
        bills.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(bills)
    }

    pub async fn delete_bill(&self, id: &str) -> Result<Bill> {
        let bill = self
            .bills
            .delete(id)
            .await?
            .ok_or_else(|| LedgerError::not_found(Bill::ENTITY, id))?;
        debug!(bill = id, "bill deleted");
        Ok(bill)
    }

    /// Appends a payment and reports the settlement status it leads to.
    pub async fn add_payment(&self, bill_id: &str, payment: NewPayment) -> Result<PaymentReceipt> {
        let amount = Amount::new(payment.amount)?;

        let (bill, status) = update_with_retry(
            self.bills.as_ref(),
            bill_id,
            self.max_write_attempts,
            |bill| bill.add_payment(amount, payment.method.clone(), payment.reference.clone()),
        )
        .await?;

        let total_paid = bill.total_paid();
        debug!(
            bill = bill_id,
            amount = %amount.value(),
            total_paid = %total_paid,
            status = status.as_str(),
            "payment recorded"
        );
        Ok(PaymentReceipt { status, total_paid })
    }

    /// Places an order and charges it to the bill of its booking, if one exists.
    ///
    /// The order is committed first. If charging the bill then fails the error
    /// is returned with the order already stored; `resync_bill` repairs it.
    pub async fn create_food_order(&self, order: NewFoodOrder, caller: &Caller) -> Result<OrderReceipt> {
        let id = order.id.clone().unwrap_or_else(new_id);
        let order = FoodOrder::place(id, order, &caller.id)?;
        let receipt = OrderReceipt {
            order_id: order.id.clone(),
            total: order.total(),
        };

        self.orders.insert(order.clone()).await?;
        debug!(order = %order.id, total = %order.total(), "food order placed");

        if let Some(booking_id) = &order.booking_id {
            self.charge_bill(booking_id, &order.id, FoodCharge::Post(order.total()))
                .await?;
        }
        Ok(receipt)
    }

    /// Edits an order. Item changes reprice it and move the bill charge with it.
    pub async fn update_food_order(&self, id: &str, update: FoodOrderUpdate) -> Result<FoodOrder> {
        let (order, total_changed) = update_with_retry(
            self.orders.as_ref(),
            id,
            self.max_write_attempts,
            |order| order.apply(update.clone()),
        )
        .await?;
        debug!(order = id, status = order.status.as_str(), total = %order.total(), "food order updated");

        if total_changed && let Some(booking_id) = &order.booking_id {
            self.charge_bill(booking_id, &order.id, FoodCharge::Post(order.total()))
                .await?;
        }
        Ok(order)
    }

    /// Removes an order and always takes its charge back off the linked bill.
    pub async fn delete_food_order(&self, id: &str) -> Result<()> {
        let order = self
            .orders
            .delete(id)
            .await?
            .ok_or_else(|| LedgerError::not_found(FoodOrder::ENTITY, id))?;
        debug!(order = id, "food order deleted");

        if let Some(booking_id) = &order.booking_id {
            self.charge_bill(booking_id, &order.id, FoodCharge::Reverse)
                .await?;
        }
        Ok(())
    }

    pub async fn get_food_order(&self, id: &str) -> Result<FoodOrder> {
        self.orders
            .get(id)
            .await?
            .ok_or_else(|| LedgerError::not_found(FoodOrder::ENTITY, id))
    }

    /// Orders matching `filter`, newest first.
    pub async fn list_food_orders(&self, filter: &OrderFilter) -> Result<Vec<FoodOrder>> {
        let mut orders = self.orders.find(&|order: &FoodOrder| filter.matches(order)).await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(orders)
    }

    pub async fn order_stats(&self) -> Result<OrderStats> {
        let orders = self.orders.all().await?;
        Ok(OrderStats::from_orders(&orders))
    }

    /// Rebuilds a bill's food charges from the orders currently on its booking.
    ///
    /// Food orders are only ever charged to the first bill opened for a
    /// booking. Resyncing any later bill of the same booking clears its food
    /// entries instead, so no order is counted on two bills.
    pub async fn resync_bill(&self, bill_id: &str) -> Result<Bill> {
        let booking_id = self.get_bill(bill_id).await?.booking_id;
        let charged_bill = self.bill_for_booking(&booking_id).await?;

        let entries: Vec<(String, Money)> = if charged_bill.is_some_and(|b| b.id == bill_id) {
            self.orders
                .find(&|order: &FoodOrder| order.booking_id.as_deref() == Some(booking_id.as_str()))
                .await?
                .iter()
                .map(|o| (o.id.clone(), o.total()))
                .collect()
        } else {
            Vec::new()
        };

        let (bill, ()) = update_with_retry(
            self.bills.as_ref(),
            bill_id,
            self.max_write_attempts,
            |bill| {
                bill.charges.replace_food_entries(entries.iter().cloned())?;
                bill.touch();
                Ok(())
            },
        )
        .await?;

        debug!(bill = bill_id, orders = entries.len(), food_charges = %bill.charges.food_charges(), "bill resynced");
        Ok(bill)
    }

    /// Sums charges over bills created within `[from, to]`; open ends are unbounded.
    pub async fn revenue_report(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<RevenueBreakdown> {
        let bills = self
            .bills
            .find(&|bill: &Bill| {
                from.is_none_or(|from| bill.created_at >= from)
                    && to.is_none_or(|to| bill.created_at <= to)
            })
            .await?;
        RevenueBreakdown::from_bills(&bills)
    }

    /// First bill opened for `booking_id`, if any.
    async fn bill_for_booking(&self, booking_id: &str) -> Result<Option<Bill>> {
        let mut bills = self
            .bills
            .find(&|bill: &Bill| bill.booking_id == booking_id)
            .await?;
        bills.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(bills.into_iter().next())
    }

    async fn charge_bill(&self, booking_id: &str, order_id: &str, charge: FoodCharge) -> Result<()> {
        let Some(bill) = self.bill_for_booking(booking_id).await? else {
            debug!(booking = booking_id, order = order_id, "no bill for booking, charge skipped");
            return Ok(());
        };

        let result = update_with_retry(
            self.bills.as_ref(),
            &bill.id,
            self.max_write_attempts,
            |bill| {
                match charge {
                    FoodCharge::Post(amount) => bill.charges.apply_food_charge(order_id, amount)?,
                    FoodCharge::Reverse => {
                        bill.charges.reverse_food_charge(order_id);
                    }
                }
                bill.touch();
                Ok(())
            },
        )
        .await;

        match result {
            Ok((bill, ())) => {
                debug!(
                    bill = %bill.id,
                    order = order_id,
                    food_charges = %bill.charges.food_charges(),
                    total = %bill.charges.total(),
                    "bill charges updated"
                );
                Ok(())
            }
            // Bill removed between lookup and update; nothing left to charge.
            Err(LedgerError::NotFound { .. }) => Ok(()),
            Err(e) => {
                warn!(
                    bill = %bill.id,
                    order = order_id,
                    error = %e,
                    "bill charge update failed; order committed, resync the bill to repair"
                );
                Err(e)
            }
        }
    }
}
