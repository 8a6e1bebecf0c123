//! Money type for representing currency amounts
//!
//! Wraps `rust_decimal::Decimal` so that equal splits and per-meal rates are
//! carried without rounding. Rounding to two decimal places happens only when
//! an amount is displayed.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// Number of decimal places shown when displaying an amount
pub const DISPLAY_DECIMALS: u32 = 2;

/// Largest amount accepted for a single entry, in whole currency units
pub const MAX_ENTRY_UNITS: i64 = 1_000_000_000_000;

/// Represents a monetary amount in a single (unnamed) currency
///
/// Serialized as a decimal string (e.g. `"1050.50"`), which reads back exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Create a Money amount from a decimal value
    pub const fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    /// Create a Money amount from whole currency units
    ///
    /// # Examples
    /// ```
    /// use mealpool::models::Money;
    /// let amount = Money::from_major(300);
    /// assert_eq!(amount.to_string(), "$300.00");
    /// ```
    pub fn from_major(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Create a Money amount from hundredths of the currency unit
    ///
    /// # Examples
    /// ```
    /// use mealpool::models::Money;
    /// let amount = Money::from_minor(1050);
    /// assert_eq!(amount.to_string(), "$10.50");
    /// ```
    pub fn from_minor(minor: i64) -> Self {
        Self(Decimal::new(minor, 2))
    }

    /// Get the exact decimal value
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_positive()
    }

    /// Check if the amount is strictly negative
    pub fn is_negative(&self) -> bool {
        !self.0.is_zero() && self.0.is_sign_negative()
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Largest amount a single entry may carry
    pub fn entry_limit() -> Self {
        Self::from_major(MAX_ENTRY_UNITS)
    }

    /// Multiply by a whole count (e.g. meals eaten times the meal rate)
    ///
    /// Saturates at the representable range instead of panicking.
    pub fn times(&self, count: u64) -> Self {
        Self(self.0.saturating_mul(Decimal::from(count)))
    }

    /// Divide into `parts` equal shares, unrounded
    ///
    /// Returns `None` when `parts` is zero.
    pub fn divided_by(&self, parts: u64) -> Option<Self> {
        if parts == 0 {
            return None;
        }
        self.0.checked_div(Decimal::from(parts)).map(Self)
    }

    /// The amount rounded half away from zero to display precision
    pub fn rounded(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Check whether two amounts agree to within `tolerance`
    pub fn approx_eq(&self, other: Money, tolerance: Decimal) -> bool {
        (self.0 - other.0).abs() <= tolerance
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "1,250", "10"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let cleaned = rest.replace(',', "");

        let value = Decimal::from_str(&cleaned)
            .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;
        if value.is_sign_negative() && !value.is_zero() {
            // "--5" or "-$-5"
            return Err(MoneyParseError::InvalidFormat(s.to_string()));
        }

        Ok(Self(if negative { -value } else { value }))
    }

    /// Format with a currency symbol, rounded to display precision
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let rounded = self.rounded().0;
        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("-{}{:.2}", symbol, rounded.abs())
        } else {
            format!("{}{:.2}", symbol, rounded.abs())
        }
    }

    /// Plain decimal rendering at display precision (no symbol), for CSV output
    pub fn to_plain_string(&self) -> String {
        let rounded = self.rounded().0;
        if rounded.is_zero() {
            format!("{:.2}", Decimal::ZERO)
        } else {
            format!("{:.2}", rounded)
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_symbol("$"))
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(1050).to_string(), "$10.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
        assert_eq!(Money::from_minor(-1050).to_string(), "-$10.50");
        assert_eq!(Money::from_minor(5).to_string(), "$0.05");
        assert_eq!(Money::from_major(20).to_string(), "$20.00");
    }

    #[test]
    fn test_display_rounds_only_at_the_end() {
        let third = Money::from_major(100).divided_by(3).unwrap();
        assert_eq!(third.to_string(), "$33.33");
        // the unrounded shares still add back up
        let total = third + third + third;
        assert!(total.approx_eq(Money::from_major(100), Decimal::new(1, 20)));
    }

    #[test]
    fn test_tiny_negative_displays_as_zero() {
        let tiny = Money::from_decimal(Decimal::new(-1, 5));
        assert_eq!(tiny.to_string(), "$0.00");
        assert_eq!(tiny.to_plain_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_major(1000);
        let b = Money::from_major(300);

        assert_eq!(a + b, Money::from_major(1300));
        assert_eq!(a - b, Money::from_major(700));
        assert_eq!(-b, Money::from_major(-300));
        assert_eq!(Money::from_major(20).times(10), Money::from_major(200));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_decimal(Decimal::MAX);
        let min = Money::from_decimal(Decimal::MIN);

        assert_eq!(max + max, max);
        assert_eq!(min - max, min);
        assert_eq!(max.times(3), max);

        let mut total = max;
        total += Money::from_major(1);
        assert_eq!(total, max);
    }

    #[test]
    fn test_divided_by_zero_parts() {
        assert!(Money::from_major(150).divided_by(0).is_none());
        assert_eq!(
            Money::from_major(150).divided_by(2),
            Some(Money::from_major(75))
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap(), Money::from_minor(1050));
        assert_eq!(Money::parse("$10.50").unwrap(), Money::from_minor(1050));
        assert_eq!(Money::parse("-10.50").unwrap(), Money::from_minor(-1050));
        assert_eq!(Money::parse("1,250").unwrap(), Money::from_major(1250));
        assert_eq!(Money::parse("10").unwrap(), Money::from_major(10));
        assert!(Money::parse("").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("--5").is_err());
    }

    #[test]
    fn test_is_checks() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_positive());
        assert!(!Money::zero().is_negative());
        assert!(Money::from_major(1).is_positive());
        assert!(Money::from_major(-1).is_negative());
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            Money::from_major(100),
            Money::from_major(200),
            Money::from_minor(50),
        ];
        let total: Money = amounts.iter().sum();
        assert_eq!(total, Money::from_minor(30050));
    }

    #[test]
    fn test_serialization_is_lossless() {
        let m = Money::from_major(100).divided_by(3).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.starts_with("\"33.333"));

        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::from_minor(-7550).format_with_symbol("৳"), "-৳75.50");
        assert_eq!(Money::from_minor(12345).to_plain_string(), "123.45");
    }
}
