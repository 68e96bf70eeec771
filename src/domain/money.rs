use crate::error::LedgerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary value on a bill or order.
///
/// Wraps `rust_decimal::Decimal` so charge arithmetic never goes through floats.
/// Input amounts enter through `non_negative`. Arithmetic is checked: an
/// overflowing sum or product is an `InvalidArgument`, never a panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

/// A strictly positive monetary amount, used for payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, LedgerError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(LedgerError::invalid(format!(
                "amount must be positive, got {value}"
            )))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl TryFrom<Decimal> for Money {
    type Error = LedgerError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::non_negative(value, "amount")
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl From<Amount> for Money {
    fn from(amount: Amount) -> Self {
        Self(amount.0)
    }
}

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wraps an already validated amount. Untrusted input goes through
    /// `non_negative`.
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Accepts only non-negative values; `field` names the offending input.
    pub fn non_negative(amount: Decimal, field: &str) -> Result<Self, LedgerError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            Err(LedgerError::invalid(format!(
                "{field} must not be negative, got {amount}"
            )))
        } else {
            Ok(Self(amount))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Trailing-zero-free decimal, for reports.
    pub fn normalized(&self) -> Decimal {
        self.0.normalize()
    }

    pub fn checked_add(self, rhs: Money) -> Result<Self, LedgerError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or_else(|| overflow(format!("{self} + {rhs}")))
    }

    pub fn checked_mul(self, factor: u32) -> Result<Self, LedgerError> {
        self.0
            .checked_mul(Decimal::from(factor))
            .map(Self)
            .ok_or_else(|| overflow(format!("{self} x {factor}")))
    }

    /// Adds up `values`, failing on the first overflow.
    pub fn checked_sum(values: impl IntoIterator<Item = Money>) -> Result<Self, LedgerError> {
        values
            .into_iter()
            .try_fold(Money::ZERO, |acc, value| acc.checked_add(value))
    }

    /// Sum that stops at `Decimal::MAX`. Only for reading totals whose
    /// writes already went through the checked variants.
    pub fn saturating_sum(values: impl IntoIterator<Item = Money>) -> Self {
        values
            .into_iter()
            .fold(Money::ZERO, |acc, value| Self(acc.0.saturating_add(value.0)))
    }
}

fn overflow(expression: String) -> LedgerError {
    LedgerError::invalid(format!("amount out of range: {expression}"))
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(dec!(10.0));
        let b = Money::new(dec!(5.0));
        assert_eq!(a.checked_add(b).unwrap(), Money::new(dec!(15.0)));
        assert_eq!(b.checked_mul(3).unwrap(), Money::new(dec!(15.0)));
    }

    #[test]
    fn test_money_sum() {
        let values = [Money::new(dec!(1.5)), Money::new(dec!(2.5))];
        assert_eq!(Money::checked_sum(values).unwrap(), Money::new(dec!(4.0)));
        assert_eq!(Money::saturating_sum(values), Money::new(dec!(4.0)));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let max = Money::new(Decimal::MAX);
        assert!(matches!(
            max.checked_mul(2),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            max.checked_add(Money::new(dec!(1))),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(Money::checked_sum([max, max]).is_err());
        assert_eq!(Money::saturating_sum([max, max]), max);
    }

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(0.01)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(LedgerError::InvalidArgument(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(LedgerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_non_negative() {
        assert!(Money::non_negative(dec!(0), "taxes").is_ok());
        assert!(Money::non_negative(dec!(-0.01), "taxes").is_err());
    }

    #[test]
    fn test_money_deserialization_rejects_negative() {
        let ok: Money = serde_json::from_str("\"0\"").unwrap();
        assert!(ok.is_zero());
        assert!(serde_json::from_str::<Money>("\"-0.01\"").is_err());
    }

    #[test]
    fn test_amount_deserialization_rejects_zero() {
        let ok: Amount = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(ok.value(), dec!(12.50));
        assert!(serde_json::from_str::<Amount>("\"0\"").is_err());
    }
}
