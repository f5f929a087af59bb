//! # Money Module
//!
//! Fixed-point monetary values and tax rates.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Menu prices, modifiers, tips, cash counts: ALL integer minor units     │
//! │                                                                         │
//! │    28.00 + 2.00 + 1.50  →  2800 + 200 + 150 = 3150 cents               │
//! │    3150 × 2             →  6300 cents  →  "$63.00" (display only)       │
//! │                                                                         │
//! │  Repeated additions never drift; rounding happens exactly once, at     │
//! │  the tax step or at the display boundary.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mesa_core::money::Money;
//!
//! let entree: Money = "28.00".parse().unwrap();
//! let extra_cheese = Money::from_cents(200);
//!
//! assert_eq!((entree + extra_cheese).cents(), 3000);
//! assert_eq!((entree * 2).to_string(), "$56.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Signed so that refunds, paid-outs and cash shortages can be expressed.
/// Operator impls (`+`, `-`, `*`) are for values already known to be in
/// range; aggregation over user input goes through the `checked_*` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use mesa_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion, always 0-99.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Adds, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Subtracts, returning `None` on overflow.
    #[inline]
    pub const fn checked_sub(self, other: Money) -> Option<Money> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// ```rust
    /// use mesa_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(3150);
    /// assert_eq!(unit_price.checked_mul_quantity(2), Some(Money::from_cents(6300)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Sums an iterator of amounts, returning `None` on overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
    }

    /// Calculates tax at `rate`, rounding half away from zero to the cent.
    ///
    /// Uses i128 internally so large amounts cannot overflow mid-calculation.
    ///
    /// ```rust
    /// use mesa_core::money::{Money, TaxRate};
    ///
    /// // 10.00 at 8.25% = 0.825 → 0.83
    /// let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825));
    /// assert_eq!(tax.cents(), 83);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let scaled = self.0 as i128 * rate.bps() as i128;
        let half = if scaled < 0 { -5000 } else { 5000 };
        Money::from_cents(((scaled + half) / 10000) as i64)
    }

    /// Returns the amount of a percentage discount given in basis points.
    ///
    /// ```rust
    /// use mesa_core::money::Money;
    ///
    /// // 10% of 45.00
    /// assert_eq!(Money::from_cents(4500).percentage_of(1000).cents(), 450);
    /// ```
    pub fn percentage_of(&self, bps: u32) -> Money {
        self.calculate_tax(TaxRate::from_bps(bps))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-style rendering with a dollar sign. The service layer formats with
/// the configured currency symbol instead.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Parses a decimal string such as `"28.00"`, `"-5.5"` or `"12"`.
///
/// At most two fractional digits are accepted; no floating point is involved.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected digits before the decimal point"));
        }
        if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("at most two decimal places"));
        }

        let major: i64 = whole.parse().map_err(|_| invalid("amount too large"))?;
        let minor: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
            _ => frac.parse().map_err(|_| invalid("bad fraction"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points: 1 bps = 0.01%, so 825 = 8.25%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(28, 0).cents(), 2800);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(6300).to_string(), "$63.00");
        assert_eq!(Money::from_cents(150).to_string(), "$1.50");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!("28.00".parse::<Money>().unwrap().cents(), 2800);
        assert_eq!("1.5".parse::<Money>().unwrap().cents(), 150);
        assert_eq!("12".parse::<Money>().unwrap().cents(), 1200);
        assert_eq!(" -5.50 ".parse::<Money>().unwrap().cents(), -550);
        assert_eq!("0.07".parse::<Money>().unwrap().cents(), 7);

        assert!("".parse::<Money>().is_err());
        assert!(".50".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!("1,50".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
        assert!("99999999999999999999".parse::<Money>().is_err());
    }

    /// The float version of this sum famously ends at 0.30000000000000004.
    #[test]
    fn test_repeated_addition_does_not_drift() {
        let dime = Money::from_cents(10);
        let total: Money = std::iter::repeat(dime).take(1000).sum();
        assert_eq!(total.cents(), 10_000);

        let tenth: Money = "0.10".parse().unwrap();
        let fifth: Money = "0.20".parse().unwrap();
        assert_eq!(tenth + fifth, "0.30".parse().unwrap());
    }

    #[test]
    fn test_checked_arithmetic() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(max.checked_add(Money::from_cents(1)), None);
        assert_eq!(Money::from_cents(i64::MIN).checked_sub(Money::from_cents(1)), None);
        assert_eq!(max.checked_mul_quantity(2), None);
        assert_eq!(
            Money::checked_sum(vec![Money::from_cents(100), Money::from_cents(250)]),
            Some(Money::from_cents(350))
        );
        assert_eq!(Money::checked_sum(vec![max, Money::from_cents(1)]), None);
    }

    #[test]
    fn test_tax_rounding() {
        let rate = TaxRate::from_bps(825);
        assert_eq!(Money::from_cents(1000).calculate_tax(rate).cents(), 83);
        assert_eq!(Money::from_cents(6300).calculate_tax(rate).cents(), 520);
        assert_eq!(Money::from_cents(-1000).calculate_tax(rate).cents(), -83);
        assert_eq!(Money::from_cents(1000).calculate_tax(TaxRate::zero()).cents(), 0);
    }

    #[test]
    fn test_percentage_of() {
        assert_eq!(Money::from_cents(10000).percentage_of(1000).cents(), 1000);
        assert_eq!(Money::from_cents(333).percentage_of(5000).cents(), 167);
    }

    #[test]
    fn test_tax_rate_display() {
        assert_eq!(TaxRate::from_bps(825).to_string(), "8.25%");
        assert_eq!(TaxRate::from_bps(1000).to_string(), "10.00%");
        assert_eq!(TaxRate::zero().to_string(), "0.00%");
    }
}
