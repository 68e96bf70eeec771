use super::money::{Amount, Money};
use super::ports::Document;
use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Settlement classification of a bill, derived from payments against total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    Pending,
    Partial,
    Paid,
}

impl SettlementStatus {
    pub fn derive(total_paid: Money, total: Money) -> Self {
        if total_paid.is_zero() {
            SettlementStatus::Pending
        } else if total_paid >= total {
            SettlementStatus::Paid
        } else {
            SettlementStatus::Partial
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SettlementStatus::Pending => "pending",
            SettlementStatus::Partial => "partial",
            SettlementStatus::Paid => "paid",
        }
    }
}

/// Charge breakdown of a bill.
///
/// Food charges are kept per contributing order so that applying an order
/// twice, or reversing one, can never leave the bill off by a stale amount.
/// Every mutation keeps `checked_total` representable, so the plain
/// accessors never saturate in practice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Charges {
    pub room_charges: Money,
    pub amenities_charges: Money,
    pub taxes: Money,
    #[serde(default)]
    food_entries: BTreeMap<String, Money>,
}

impl Charges {
    pub fn new(room_charges: Money, amenities_charges: Money, taxes: Money) -> Self {
        Self {
            room_charges,
            amenities_charges,
            taxes,
            food_entries: BTreeMap::new(),
        }
    }

    pub fn food_charges(&self) -> Money {
        Money::saturating_sum(self.food_entries.values().copied())
    }

    pub fn total(&self) -> Money {
        Money::saturating_sum(self.components())
    }

    /// `total`, failing instead of saturating when out of range.
    pub fn checked_total(&self) -> Result<Money, LedgerError> {
        Money::checked_sum(self.components())
    }

    fn components(&self) -> impl Iterator<Item = Money> + '_ {
        [self.room_charges, self.amenities_charges, self.taxes]
            .into_iter()
            .chain(self.food_entries.values().copied())
    }

    pub fn food_entry(&self, order_id: &str) -> Option<Money> {
        self.food_entries.get(order_id).copied()
    }

    /// Records (or overwrites) the charge contributed by `order_id`. Leaves
    /// the charges untouched if the new total would be out of range.
    pub fn apply_food_charge(&mut self, order_id: &str, amount: Money) -> Result<(), LedgerError> {
        let previous = self.food_entries.insert(order_id.to_string(), amount);
        if let Err(e) = self.checked_total() {
            match previous {
                Some(previous) => self.food_entries.insert(order_id.to_string(), previous),
                None => self.food_entries.remove(order_id),
            };
            return Err(e);
        }
        Ok(())
    }

    /// Drops the charge contributed by `order_id`, returning it.
    pub fn reverse_food_charge(&mut self, order_id: &str) -> Option<Money> {
        self.food_entries.remove(order_id)
    }

    pub fn replace_food_entries(
        &mut self,
        entries: impl IntoIterator<Item = (String, Money)>,
    ) -> Result<(), LedgerError> {
        let previous = std::mem::replace(&mut self.food_entries, entries.into_iter().collect());
        if let Err(e) = self.checked_total() {
            self.food_entries = previous;
            return Err(e);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub date: DateTime<Utc>,
}

/// The financial record for one booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    pub booking_id: String,
    pub charges: Charges,
    payments: Vec<Payment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    version: u64,
}

impl Bill {
    pub fn new(id: impl Into<String>, booking_id: impl Into<String>, charges: Charges) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            booking_id: booking_id.into(),
            charges,
            payments: Vec::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn total_paid(&self) -> Money {
        Money::saturating_sum(self.payments.iter().map(|p| Money::from(p.amount)))
    }

    pub fn status(&self) -> SettlementStatus {
        SettlementStatus::derive(self.total_paid(), self.charges.total())
    }

    /// Appends a payment stamped with the current time. Rejects a payment
    /// that would push the paid total out of range.
    pub fn add_payment(
        &mut self,
        amount: Amount,
        method: Option<String>,
        reference: Option<String>,
    ) -> Result<SettlementStatus, LedgerError> {
        Money::checked_sum(self.payments.iter().map(|p| Money::from(p.amount)))?
            .checked_add(amount.into())?;

        let now = Utc::now();
        self.payments.push(Payment {
            amount,
            method,
            reference,
            date: now,
        });
        self.updated_at = now;
        Ok(self.status())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Document for Bill {
    const COLLECTION: &'static str = "bills";
    const ENTITY: &'static str = "bill";

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

/// Charge totals summed across a set of bills.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RevenueBreakdown {
    pub room_charges: Money,
    pub food_charges: Money,
    pub amenities_charges: Money,
    pub taxes: Money,
    pub total: Money,
}

impl RevenueBreakdown {
    pub fn add(&mut self, charges: &Charges) -> Result<(), LedgerError> {
        *self = RevenueBreakdown {
            room_charges: self.room_charges.checked_add(charges.room_charges)?,
            food_charges: self.food_charges.checked_add(charges.food_charges())?,
            amenities_charges: self.amenities_charges.checked_add(charges.amenities_charges)?,
            taxes: self.taxes.checked_add(charges.taxes)?,
            total: self.total.checked_add(charges.checked_total()?)?,
        };
        Ok(())
    }

    pub fn from_bills<'a>(bills: impl IntoIterator<Item = &'a Bill>) -> Result<Self, LedgerError> {
        let mut revenue = RevenueBreakdown::default();
        for bill in bills {
            revenue.add(&bill.charges)?;
        }
        Ok(revenue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bill_with_total(total: rust_decimal::Decimal) -> Bill {
        Bill::new(
            "bill-1",
            "B1",
            Charges::new(Money::new(total), Money::ZERO, Money::ZERO),
        )
    }

    #[test]
    fn test_new_bill_is_pending() {
        let bill = bill_with_total(dec!(100));
        assert_eq!(bill.status(), SettlementStatus::Pending);
        assert_eq!(bill.total_paid(), Money::ZERO);
    }

    #[test]
    fn test_partial_then_paid() {
        let mut bill = bill_with_total(dec!(100));

        let status = bill.add_payment(Amount::new(dec!(40)).unwrap(), None, None).unwrap();
        assert_eq!(status, SettlementStatus::Partial);
        assert_eq!(bill.total_paid(), Money::new(dec!(40)));

        let status = bill
            .add_payment(Amount::new(dec!(60)).unwrap(), Some("card".into()), None)
            .unwrap();
        assert_eq!(status, SettlementStatus::Paid);
        assert_eq!(bill.total_paid(), Money::new(dec!(100)));
        assert_eq!(bill.payments().len(), 2);
    }

    #[test]
    fn test_overpayment_is_paid() {
        let mut bill = bill_with_total(dec!(10));
        let status = bill.add_payment(Amount::new(dec!(25)).unwrap(), None, None).unwrap();
        assert_eq!(status, SettlementStatus::Paid);
    }

    #[test]
    fn test_status_derivation() {
        let zero = Money::ZERO;
        let ten = Money::new(dec!(10));
        assert_eq!(SettlementStatus::derive(zero, zero), SettlementStatus::Pending);
        assert_eq!(SettlementStatus::derive(zero, ten), SettlementStatus::Pending);
        assert_eq!(
            SettlementStatus::derive(Money::new(dec!(9.99)), ten),
            SettlementStatus::Partial
        );
        assert_eq!(SettlementStatus::derive(ten, ten), SettlementStatus::Paid);
    }

    #[test]
    fn test_food_entries_drive_totals() {
        let mut charges = Charges::new(Money::new(dec!(100)), Money::new(dec!(5)), Money::new(dec!(8)));
        charges.apply_food_charge("o1", Money::new(dec!(25))).unwrap();
        charges.apply_food_charge("o2", Money::new(dec!(12))).unwrap();

        assert_eq!(charges.food_charges(), Money::new(dec!(37)));
        assert_eq!(charges.total(), Money::new(dec!(150)));

        assert_eq!(charges.reverse_food_charge("o1"), Some(Money::new(dec!(25))));
        assert_eq!(charges.total(), Money::new(dec!(125)));
        assert_eq!(charges.reverse_food_charge("o1"), None);
    }

    #[test]
    fn test_applying_same_order_twice_does_not_double_charge() {
        let mut charges = Charges::new(Money::new(dec!(100)), Money::ZERO, Money::ZERO);
        charges.apply_food_charge("o1", Money::new(dec!(25))).unwrap();
        charges.apply_food_charge("o1", Money::new(dec!(25))).unwrap();
        assert_eq!(charges.total(), Money::new(dec!(125)));
    }

    #[test]
    fn test_revenue_breakdown() {
        let mut first = bill_with_total(dec!(100));
        first.charges.apply_food_charge("o1", Money::new(dec!(20))).unwrap();
        let second = Bill::new(
            "bill-2",
            "B2",
            Charges::new(Money::new(dec!(50)), Money::new(dec!(5)), Money::new(dec!(7))),
        );

        let revenue = RevenueBreakdown::from_bills([&first, &second]).unwrap();
        assert_eq!(revenue.room_charges, Money::new(dec!(150)));
        assert_eq!(revenue.food_charges, Money::new(dec!(20)));
        assert_eq!(revenue.amenities_charges, Money::new(dec!(5)));
        assert_eq!(revenue.taxes, Money::new(dec!(7)));
        assert_eq!(revenue.total, Money::new(dec!(182)));
    }

    #[test]
    fn test_out_of_range_food_charge_is_rejected() {
        let mut charges = Charges::new(Money::new(dec!(100)), Money::ZERO, Money::ZERO);
        charges.apply_food_charge("o1", Money::new(dec!(25))).unwrap();

        let result = charges.apply_food_charge("o1", Money::new(rust_decimal::Decimal::MAX));
        assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));
        assert_eq!(charges.food_entry("o1"), Some(Money::new(dec!(25))));

        let result = charges.apply_food_charge("o2", Money::new(rust_decimal::Decimal::MAX));
        assert!(result.is_err());
        assert_eq!(charges.food_entry("o2"), None);
        assert_eq!(charges.total(), Money::new(dec!(125)));
    }

    #[test]
    fn test_out_of_range_payment_is_rejected() {
        let mut bill = bill_with_total(dec!(10));
        let huge = Amount::new(rust_decimal::Decimal::MAX).unwrap();
        bill.add_payment(huge, None, None).unwrap();

        let result = bill.add_payment(huge, None, None);
        assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));
        assert_eq!(bill.payments().len(), 1);
    }
}
