//! Integer tick types for prices and quantities
//!
//! Books declare integer price bounds, so prices are whole ticks. Prices are
//! signed so that out-of-range input (including negatives) can be represented
//! and rejected by validation instead of failing to parse.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Price in whole ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub const fn new(ticks: i64) -> Self {
        Self(ticks)
    }

    pub const fn value(&self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Price {
    fn from(ticks: i64) -> Self {
        Self(ticks)
    }
}

/// Order quantity in whole units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u64);

impl Quantity {
    pub const fn new(units: u64) -> Self {
        Self(units)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Add, returning `None` on overflow
    pub fn checked_add(self, rhs: Quantity) -> Option<Quantity> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Subtract, clamping at zero
    pub fn saturating_sub(self, rhs: Quantity) -> Quantity {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Quantity {
    fn from(units: u64) -> Self {
        Self(units)
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Quantity) {
        self.0 += rhs.0;
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Quantity) -> Quantity {
        debug_assert!(rhs.0 <= self.0, "Quantity underflow");
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Quantity) {
        *self = *self - rhs;
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Quantity {
        iter.fold(Quantity::zero(), |acc, q| acc + q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_ordering() {
        assert!(Price::new(140) < Price::new(160));
        assert!(Price::new(-1).is_negative());
        assert!(!Price::new(0).is_negative());
    }

    #[test]
    fn test_quantity_arithmetic() {
        let mut qty = Quantity::new(10);
        qty -= Quantity::new(4);
        assert_eq!(qty, Quantity::new(6));
        qty += Quantity::new(1);
        assert_eq!(qty.value(), 7);
        assert_eq!(qty.min(Quantity::new(3)), Quantity::new(3));
    }

    #[test]
    fn test_quantity_checked_add() {
        assert_eq!(Quantity::new(3).checked_add(Quantity::new(4)), Some(Quantity::new(7)));
        assert_eq!(Quantity::new(u64::MAX).checked_add(Quantity::new(1)), None);
    }

    #[test]
    fn test_quantity_saturating_sub() {
        assert_eq!(Quantity::new(3).saturating_sub(Quantity::new(5)), Quantity::zero());
    }

    #[test]
    fn test_quantity_sum() {
        let total: Quantity = [4u64, 8, 6].into_iter().map(Quantity::new).sum();
        assert_eq!(total, Quantity::new(18));
    }
}
