//! Monetary amounts in integer minor units.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// An amount of money in cents (USD).
///
/// All prices and payouts are carried as whole cents so that percentage
/// adjustments are exact and reproducible. Serialized as the integer
/// number of cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Money = Money(0);

    /// Build an amount from cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Build an amount from whole dollars.
    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    /// Return the amount in cents.
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Return the amount as a floating point dollar value (display only).
    pub fn as_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Return `percent`% of this amount, rounding half away from zero to the cent.
    pub fn percent(&self, percent: u32) -> Self {
        let scaled = self.0 * i64::from(percent);
        let rounded = if scaled >= 0 {
            (scaled + 50) / 100
        } else {
            (scaled - 50) / 100
        };
        Self(rounded)
    }

    /// Return this amount increased by `percent`%.
    pub fn with_markup(&self, percent: u32) -> Self {
        *self + self.percent(percent)
    }

    /// Whether the amount is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_of_hundred_dollars() {
        let price = Money::from_dollars(100);
        assert_eq!(price.percent(50), Money::from_cents(5000));
        assert_eq!(price.percent(50).to_string(), "$50.00");
    }

    #[test]
    fn test_percent_rounds_half_up() {
        assert_eq!(Money::from_cents(6751).percent(50), Money::from_cents(3376));
        assert_eq!(Money::from_cents(6749).percent(50), Money::from_cents(3375));
    }

    #[test]
    fn test_markup() {
        assert_eq!(Money::from_dollars(30).with_markup(50), Money::from_dollars(45));
        assert_eq!(Money::from_dollars(80).with_markup(25), Money::from_dollars(100));
    }

    #[test]
    fn test_sum_and_display() {
        let total: Money = [Money::from_cents(1050), Money::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total.to_string(), "$13.00");
        assert_eq!(Money::from_cents(-5).to_string(), "-$0.05");
    }
}
