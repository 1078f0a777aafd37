//! Type-safe money representation using decimal arithmetic.
//!
//! Amounts keep full decimal precision through every sum and product. Rounding
//! to cents only happens at the display boundary.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::serde::arbitrary_precision;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

use super::quantity::Quantity;

/// Number of decimal places shown to shoppers.
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// Errors that can occur when constructing a [`Money`] value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("amount must not be negative (got {0})")]
    Negative(Decimal),
    #[error("invalid amount {0:?}: {1}")]
    Invalid(String, String),
}

/// A non-negative monetary amount in the store's single currency.
///
/// Serializes as a JSON number so persisted carts stay readable by the page
/// script that also reads them. The number carries the decimal's exact digits,
/// so every amount reads back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount, rejecting negatives.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount < Decimal::ZERO {
            return Err(MoneyError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create an amount from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// Parse a decimal string such as `"19.99"`.
    ///
    /// Surrounding whitespace is ignored. Anything else that is not a plain
    /// decimal number is rejected.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Invalid` for non-numeric input and
    /// `MoneyError::Negative` for amounts below zero.
    pub fn parse(s: &str) -> Result<Self, MoneyError> {
        let trimmed = s.trim();
        let amount = Decimal::from_str(trimmed)
            .map_err(|e| MoneyError::Invalid(trimmed.to_string(), e.to_string()))?;
        Self::new(amount)
    }

    /// The unrounded amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    ///
    /// Saturates at `Decimal::MAX` instead of overflowing.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(quantity.get()))
                .unwrap_or(Decimal::MAX),
        )
    }

    /// The amount rounded half away from zero to cents, scaled to exactly two
    /// decimal places.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        let mut rounded = self
            .0
            .round_dp_with_strategy(DISPLAY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(DISPLAY_DECIMAL_PLACES);
        rounded
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self, symbol: &str) -> String {
        format!("{symbol}{}", self.rounded())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.checked_add(rhs.0).unwrap_or(Decimal::MAX))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        arbitrary_precision::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = arbitrary_precision::deserialize(deserializer)?;
        Self::new(amount).map_err(de::Error::custom)
    }
}
