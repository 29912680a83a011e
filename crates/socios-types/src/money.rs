//! Monetary amounts in whole currency units.
//!
//! The club bills in whole pesos; every amount in the system is an integer
//! number of currency units. Percentage math rounds to the nearest whole
//! unit, half away from zero.

use serde::{Deserialize, Serialize};

/// An amount of money in whole currency units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// The zero amount.
    pub const ZERO: Money = Money(0);

    /// Creates an amount from a number of whole currency units.
    pub const fn new(units: i64) -> Self {
        Money(units)
    }

    /// Returns the amount as whole currency units.
    pub const fn units(self) -> i64 {
        self.0
    }

    /// Returns `percent`% of this amount, rounded to the nearest whole
    /// unit (half away from zero).
    ///
    /// Intermediate math runs over `i128`, so scaling cannot overflow for
    /// any representable amount.
    pub fn percent(self, percent: u32) -> Money {
        let scaled = i128::from(self.0) * i128::from(percent);
        let rounded = if scaled >= 0 {
            (scaled + 50) / 100
        } else {
            (scaled - 50) / 100
        };
        Money(rounded as i64)
    }

    /// Checked addition; `None` on overflow.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Returns true if the amount is below zero.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.0)
    }
}

impl std::str::FromStr for Money {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Money)
    }
}
