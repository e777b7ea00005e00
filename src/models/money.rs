//! Money type for representing currency amounts
//!
//! Amounts are held as exact decimals so sub-cent values (crypto, unit
//! prices) survive aggregation and sums do not depend on accumulation
//! order. They cross the serde boundary as decimal numbers (`49.99`),
//! matching the records collaborators exchange.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Largest magnitude accepted from a decimal amount, in currency units.
///
/// Sums of in-range amounts stay far inside `Decimal`'s 96-bit range for
/// any batch that fits in memory.
const MAX_UNITS: f64 = 90_000_000_000_000.0;

/// Represents an exact monetary amount in currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub struct Money(Decimal);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use fintrack::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "10.50");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Create a Money amount from a decimal value, keeping every digit
    ///
    /// The value is read through its shortest round-trip representation,
    /// so `0.004` is held as exactly `0.004`. Returns an error for NaN,
    /// infinities, values too large to hold and values with more fractional
    /// digits than a decimal can carry.
    ///
    /// # Examples
    /// ```
    /// use fintrack::models::Money;
    /// assert_eq!(Money::from_decimal(49.99).unwrap(), Money::from_cents(4999));
    /// assert_eq!(Money::from_decimal(0.004).unwrap().to_string(), "0.004");
    /// ```
    pub fn from_decimal(value: f64) -> Result<Self, MoneyParseError> {
        if !value.is_finite() || value.abs() > MAX_UNITS {
            return Err(MoneyParseError::OutOfRange(value.to_string()));
        }
        let text = value.to_string();
        Decimal::from_str_exact(&text)
            .map(|d| Self(d.normalize()))
            .map_err(|_| MoneyParseError::NotRepresentable(text))
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the amount as the nearest floating point value
    pub fn to_f64(&self) -> f64 {
        // through the decimal text so the result is correctly rounded
        self.0.to_string().parse().unwrap_or_default()
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Share of `self` in `total` as a ratio, 0.0 when `total` is zero
    pub fn ratio_of(&self, total: Money) -> f64 {
        if total.is_zero() {
            return 0.0;
        }
        match self.0.checked_div(total.0) {
            Some(ratio) => Money(ratio).to_f64(),
            None => self.to_f64() / total.to_f64(),
        }
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}", symbol, -*self)
        } else {
            format!("{}{}", symbol, self)
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

/// At least two fractional digits, more when the amount carries sub-cent digits
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.0.normalize();
        if value.scale() < 2 {
            value.rescale(2);
        }
        write!(f, "{}", value)
    }
}

impl From<Money> for f64 {
    fn from(money: Money) -> Self {
        money.to_f64()
    }
}

impl TryFrom<f64> for Money {
    type Error = MoneyParseError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error for decimal amounts that cannot be held exactly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    OutOfRange(String),
    NotRepresentable(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::OutOfRange(s) => write!(f, "Amount out of range: {}", s),
            MoneyParseError::NotRepresentable(s) => {
                write!(f, "Amount has too many decimal places: {}", s)
            }
        }
    }
}

impl std::error::Error for MoneyParseError {}
