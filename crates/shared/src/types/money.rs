//! Fixed-point money type.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are held as a whole number of cents. `rust_decimal::Decimal` is
//! only used at the boundary, to parse incoming values and round them to
//! two decimal places.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of decimal places every amount is quantized to.
pub const SCALE: u32 = 2;

const CENTS_PER_UNIT: i64 = 100;

/// Largest magnitude, in cents, accepted from outside (100 billion units).
///
/// Sums of up to ~900,000 such amounts still fit in an `i64`.
pub const MAX_CENTS: i64 = 10_000_000_000_000;

/// Errors raised while turning external input into [`Money`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The input is not a number, or does not fit the representable range.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// A monetary amount quantized to two decimal places.
///
/// Stored as an `i64` count of cents, so every value is already quantized
/// and sums never drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// One cent, the smallest representable amount.
    pub const CENT: Self = Self(1);

    /// Creates an amount from a whole number of cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the amount as a whole number of cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Quantizes a decimal to two places using round-half-up.
    ///
    /// Halves round away from zero, so `-0.005` becomes `-0.01`. Results
    /// beyond [`MAX_CENTS`] in magnitude are rejected.
    pub fn from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        value
            .round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::from(CENTS_PER_UNIT))
            .and_then(|cents| cents.to_i64())
            .filter(|cents| (-MAX_CENTS..=MAX_CENTS).contains(cents))
            .map(Self)
            .ok_or_else(|| MoneyError::InvalidAmount(format!("{value} is out of range")))
    }

    /// Parses a numeric string and quantizes it.
    ///
    /// Surrounding whitespace is ignored and scientific notation is accepted.
    pub fn parse(input: &str) -> Result<Self, MoneyError> {
        let trimmed = input.trim();
        let parsed = if trimmed.contains(['e', 'E']) {
            Decimal::from_scientific(trimmed)
        } else {
            Decimal::from_str(trimmed)
        };

        let value = parsed
            .map_err(|_| MoneyError::InvalidAmount(format!("'{input}' is not a valid number")))?;
        Self::from_decimal(value)
    }

    /// Quantizes a raw boundary value, either a JSON number or a numeric string.
    pub fn quantize(raw: &RawAmount) -> Result<Self, MoneyError> {
        match raw {
            RawAmount::Number(number) => Self::parse(&number.to_string()),
            RawAmount::Text(text) => Self::parse(text),
        }
    }

    /// Returns the amount as an exact decimal with two places.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, SCALE)
    }

    /// Adds, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Subtracts, returning `None` on overflow.
    #[must_use]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Sums amounts, returning `None` if any partial sum overflows.
    pub fn checked_sum(amounts: impl IntoIterator<Item = Self>) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::ZERO, Self::checked_add)
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is strictly greater than zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns the magnitude of the amount.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Multiplies by an arbitrary scalar at full precision, then re-quantizes.
    pub fn scale(self, factor: Decimal) -> Result<Self, MoneyError> {
        let product = self.to_decimal().checked_mul(factor).ok_or_else(|| {
            MoneyError::InvalidAmount(format!("{self} * {factor} is out of range"))
        })?;
        Self::from_decimal(product)
    }

    /// Divides into `count` equal parts, flooring to the cent.
    ///
    /// Returns the floored base amount and the number of cents left over,
    /// which is always in `0..count`. Returns `None` when `count` is zero.
    #[must_use]
    pub fn split_even(self, count: usize) -> Option<(Self, usize)> {
        let divisor = i64::try_from(count).ok().filter(|d| *d > 0)?;
        let base = self.0.div_euclid(divisor);
        let remainder = usize::try_from(self.0.rem_euclid(divisor)).ok()?;
        Some((Self(base), remainder))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self {
        Self(self.0 * rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_decimal(), f)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawAmount::deserialize(deserializer)?;
        Self::quantize(&raw).map_err(serde::de::Error::custom)
    }
}

/// An amount as it arrives from outside, before quantization.
///
/// Request bodies may carry either `12.5` or `"12.50"`; both are accepted and
/// coerced once through [`Money::quantize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    /// A JSON number.
    Number(serde_json::Number),
    /// A numeric string.
    Text(String),
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawAmount {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for RawAmount {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<Decimal> for RawAmount {
    fn from(value: Decimal) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Money> for RawAmount {
    fn from(value: Money) -> Self {
        Self::Text(value.to_string())
    }
}
