//! Amount type for handling monetary values as they are typed into the reading-log sheet.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that
//! may or may not include the `R$` currency marker, surrounding whitespace, and a comma as the
//! decimal separator.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// The currency marker that is stripped from amounts before parsing.
pub const CURRENCY: &str = "R$";

/// Represents an amount of money, e.g. the price paid for a book or its list value.
///
/// # Examples
///
/// Parsing with the currency marker and a decimal comma:
/// ```
/// # use reading_log::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("R$ 35,90").unwrap();
/// assert_eq!(amount.to_string(), "R$ 35.90");
/// ```
///
/// Text that is not a number falls back to zero when using `parse_or_zero`:
/// ```
/// # use reading_log::model::Amount;
/// assert!(Amount::parse_or_zero("n/a").is_zero());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Parses `s`, treating anything that cannot be parsed as zero.
    ///
    /// Sums over a column of amounts never have to skip missing values this way, at the cost of
    /// an unparsable cell being indistinguishable from a cell that says zero.
    pub fn parse_or_zero(s: &str) -> Self {
        Amount::from_str(s).unwrap_or_default()
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.value().is_sign_positive()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value().is_sign_negative()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let without_currency = s.replace(CURRENCY, "");
        let trimmed = without_currency.trim();

        // A blank cell is a zero amount
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // The sheet uses a comma as the decimal separator
        let normalized = trimmed.replace(',', ".");

        let value = Decimal::from_str(&normalized)
            .or_else(|e| Decimal::from_scientific(&normalized).map_err(|_| e))
            .map_err(AmountError)?;
        Ok(Amount(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.value().abs().to_f64().unwrap_or_default();
        write!(f, "{sign}{CURRENCY} {}", format_num::format_num!(",.2", num))
    }
}

// Saturates at `Decimal::MAX` and `Decimal::MIN` rather than overflowing.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
