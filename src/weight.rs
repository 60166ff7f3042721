//! Weights

use std::{fmt, iter::Sum, ops::Add};

use rust_decimal::Decimal;

/// Packages at or above this many grams are displayed in kilograms.
const KILOGRAM_THRESHOLD: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// A weight in grams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Weight(Decimal);

impl Weight {
    /// No weight at all.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a weight from a whole number of grams.
    #[must_use]
    pub fn grams(grams: u32) -> Self {
        Self(Decimal::from(grams))
    }

    /// Create a weight from a decimal number of grams.
    #[must_use]
    pub fn from_decimal(grams: Decimal) -> Self {
        Self(grams)
    }

    /// The weight in grams.
    #[must_use]
    pub fn as_grams(&self) -> Decimal {
        self.0
    }

    /// The weight of `quantity` units of this weight.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Add for Weight {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Weight {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= KILOGRAM_THRESHOLD {
            write!(f, "{}kg", (self.0 / KILOGRAM_THRESHOLD).normalize())
        } else {
            write!(f, "{}g", self.0.normalize())
        }
    }
}
