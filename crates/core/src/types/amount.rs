//! Money amounts using decimal arithmetic.
//!
//! The platform settles everything in Indian rupees and sends amounts as bare
//! JSON numbers, so an [`Amount`] carries no currency code: it is a
//! [`Decimal`] that deserializes from numbers or numeric strings, serializes
//! back to a JSON number, and renders with the rupee sign.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A rupee amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(#[serde(serialize_with = "rust_decimal::serde::float::serialize")] Decimal);

impl Amount {
    /// Zero rupees.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wrap a decimal value.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Whole rupees.
    #[must_use]
    pub fn from_rupees(rupees: i64) -> Self {
        Self(Decimal::from(rupees))
    }

    /// The underlying decimal value.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Absolute value. Withdrawals are recorded as negative ledger entries.
    #[must_use]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-₹{:.2}", self.0.abs())
        } else {
            write!(f, "₹{:.2}", self.0)
        }
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Amount {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_json_number() {
        let amount: Amount = serde_json::from_str("250").unwrap();
        assert_eq!(amount, Amount::from_rupees(250));

        let fractional: Amount = serde_json::from_str("99.5").unwrap();
        assert_eq!(fractional, Amount::new(Decimal::new(995, 1)));
    }

    #[test]
    fn test_serializes_as_json_number() {
        let json = serde_json::to_value(Amount::from_rupees(50)).unwrap();
        assert_eq!(json, serde_json::json!(50.0));
    }

    #[test]
    fn test_display_uses_rupee_sign() {
        assert_eq!(Amount::from_rupees(1500).to_string(), "₹1500.00");
        assert_eq!(Amount::from_rupees(-40).to_string(), "-₹40.00");
    }

    #[test]
    fn test_sum_and_abs() {
        let total: Amount = [Amount::from_rupees(100), Amount::from_rupees(-30)]
            .iter()
            .sum();
        assert_eq!(total, Amount::from_rupees(70));
        assert_eq!(Amount::from_rupees(-30).abs(), Amount::from_rupees(30));
    }
}
