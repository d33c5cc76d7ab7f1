//! Integer money arithmetic.
//!
//! Amounts are minor units (cents, `i64`); commission rates are basis
//! points. Commission truncates toward zero, so the freelancer payout plus
//! the withheld commission always reconciles with the gross amount.

use serde::{Deserialize, Serialize};

/// Basis points denominator (100% == 10_000 bps).
pub const BPS_DENOMINATOR: i64 = 10_000;

/// A non-negative amount in minor currency units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Construct from minor units. Returns `None` for negative input.
    pub fn from_cents(cents: i64) -> Option<Self> {
        if cents < 0 {
            None
        } else {
            Some(Money(cents))
        }
    }

    /// Raw minor units.
    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Saturating addition (balances never exceed i64 range in practice).
    pub fn add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Subtraction. Returns `None` if the result would go negative.
    pub fn sub(self, other: Money) -> Option<Money> {
        if other.0 > self.0 {
            None
        } else {
            Some(Money(self.0 - other.0))
        }
    }

    /// The commission withheld from this amount at the given rate.
    pub fn commission(self, bps: u32) -> Money {
        Money(self.0 * i64::from(bps) / BPS_DENOMINATOR)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_construction() {
        assert!(Money::from_cents(-1).is_none());
        assert_eq!(Money::from_cents(0), Some(Money::ZERO));
    }

    #[test]
    fn sub_guards_against_overdraft() {
        let a = Money::from_cents(100).unwrap();
        let b = Money::from_cents(150).unwrap();
        assert!(a.sub(b).is_none());
        assert_eq!(b.sub(a).unwrap().cents(), 50);
    }

    #[test]
    fn commission_truncates() {
        // 500 bps of 50_000 cents = 2_500 cents
        let amount = Money::from_cents(50_000).unwrap();
        assert_eq!(amount.commission(500).cents(), 2_500);
        // 500 bps of 33 cents truncates to 1 cent
        let odd = Money::from_cents(33).unwrap();
        assert_eq!(odd.commission(500).cents(), 1);
    }

    #[test]
    fn payout_plus_commission_reconciles() {
        let amount = Money::from_cents(12_345).unwrap();
        let fee = amount.commission(400);
        let payout = amount.sub(fee).unwrap();
        assert_eq!(payout.add(fee), amount);
    }

    #[test]
    fn display_formats_minor_units() {
        assert_eq!(Money::from_cents(123_456).unwrap().to_string(), "1234.56");
        assert_eq!(Money::from_cents(5).unwrap().to_string(), "0.05");
    }
}
