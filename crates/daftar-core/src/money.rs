//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing 10,000 expenses of 0.10 as f64:                                │
//! │    999.9999999998981  ❌ drifts away from 1000.00                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    10,000 × 10 cents = 100,000 cents = 1000.00 exactly                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Backups and slot values carry amounts as plain JSON numbers in major
//! units (`12.5` means twelve and a half). `Money` converts at the serde
//! boundary: encode divides by 100, decode multiplies and rounds to the
//! nearest cent. Inside the process every amount is an `i64` of cents.
//!
//! ## Overflow
//! The operators (`+`, `-`, `*`, `Sum`) saturate at the `i64` limits, so a
//! report over extreme data never panics or wraps. Code that stores an
//! amount uses the `checked_*` methods and rejects anything outside
//! [`Money::MAX`].
//!
//! ## Usage
//! ```rust
//! use daftar_core::money::Money;
//!
//! let price = Money::from_cents(1099);                 // 10.99
//! let doubled = price * 2;                             // 21.98
//! let total = price + Money::from_cents(500);          // 15.99
//! assert_eq!(total.cents(), 1599);
//! assert_eq!(doubled.to_string(), "21.98");
//! ```

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

/// Largest magnitude in major units that an amount may have.
///
/// Keeps the f64 → cents conversion exact (below 2^53 cents).
pub const MAX_MAJOR: i64 = 90_000_000_000_000;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: net profit can be negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Custom serde**: major-unit JSON numbers on the wire
///
/// ## Where Money is Used
/// ```text
/// Product.sale_price ──► InvoiceItem.unit_price ──► InvoiceItem.total
///                                                        │
///                          Invoice.subtotal ◄────────────┘
///                                │
///                                ▼
///               Tax ──► Invoice.total ──► IncomeStatement.total_revenue
///
/// Expense.amount ──► IncomeStatement.total_expenses ──► net_profit
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Largest amount accepted on a stored record.
    pub const MAX: Money = Money(MAX_MAJOR * 100);

    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use daftar_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use daftar_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major.saturating_mul(100).saturating_sub(minor))
        } else {
            Money(major.saturating_mul(100).saturating_add(minor))
        }
    }

    /// Creates a Money value from whole major units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major.saturating_mul(100))
    }

    /// Converts a major-unit float (as found in JSON) to the nearest cent.
    ///
    /// Returns `None` for non-finite or absurdly large values.
    pub fn from_major_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value.abs() > MAX_MAJOR as f64 {
            return None;
        }
        Some(Money((value * 100.0).round() as i64))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value in major units as a float (wire format only).
    #[inline]
    pub fn as_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// True when the magnitude is at most [`Money::MAX`].
    #[inline]
    pub const fn is_within_limit(&self) -> bool {
        self.0 >= -Money::MAX.0 && self.0 <= Money::MAX.0
    }

    /// Addition that returns `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums amounts, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use daftar_core::money::Money;
    ///
    /// let lines = [Money::from_cents(150), Money::from_cents(250)];
    /// assert_eq!(Money::checked_sum(lines), Some(Money::from_cents(400)));
    /// assert_eq!(Money::checked_sum([Money::from_cents(i64::MAX), Money::from_cents(1)]), None);
    /// ```
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, amount| acc.checked_add(amount))
    }

    /// Calculates tax, rounding half away from zero to the cent.
    ///
    /// ## Implementation
    /// Integer math on basis points: `(amount * bps + 5000) / 10000`.
    /// i128 keeps large subtotals from overflowing; a result beyond `i64`
    /// saturates. See [`Money::checked_tax`].
    ///
    /// ## Example
    /// ```rust
    /// use daftar_core::money::Money;
    /// use daftar_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(1000);    // 10.00
    /// let rate = TaxRate::from_bps(1500);        // 15%
    /// assert_eq!(subtotal.calculate_tax(rate).cents(), 150);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let rounded = self.tax_cents(rate);
        let saturated = rounded.clamp(i64::MIN as i128, i64::MAX as i128);
        Money::from_cents(saturated as i64)
    }

    /// Tax as [`Money::calculate_tax`], or `None` when it does not fit.
    pub fn checked_tax(&self, rate: TaxRate) -> Option<Money> {
        i64::try_from(self.tax_cents(rate)).ok().map(Money::from_cents)
    }

    fn tax_cents(&self, rate: TaxRate) -> i128 {
        let product = self.0 as i128 * rate.bps() as i128;
        if product >= 0 {
            (product + 5000) / 10000
        } else {
            (product - 5000) / 10000
        }
    }

    /// Multiplies money by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use daftar_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3), Some(Money::from_cents(897)));
    /// assert_eq!(unit_price.multiply_quantity(i64::MAX / 10), None);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Formats the amount with two decimals followed by a currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use daftar_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(12345).format_with("SAR"), "123.45 SAR");
    /// ```
    pub fn format_with(&self, currency: &str) -> String {
        if currency.is_empty() {
            self.to_string()
        } else {
            format!("{} {}", self, currency)
        }
    }
}

// =============================================================================
// Serde (major-unit JSON numbers)
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_i64(self.0 / 100)
        } else {
            serializer.serialize_f64(self.as_major_f64())
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Money::from_major_f64(value)
            .ok_or_else(|| de::Error::custom(format!("amount out of range: {}", value)))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain two-decimal rendering, e.g. `-5.50`.
///
/// The currency symbol lives in settings; see [`Money::format_with`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_format_with_currency() {
        assert_eq!(Money::from_cents(6000).format_with("ر.س"), "60.00 ر.س");
        assert_eq!(Money::from_cents(6000).format_with(""), "60.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((b - a).cents(), -500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 10.00 at 8.25% = 0.825 → 0.83
        let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825));
        assert_eq!(tax.cents(), 83);

        // 0.10 at 15% = 0.015 → 0.02
        let tax = Money::from_cents(10).calculate_tax(TaxRate::from_bps(1500));
        assert_eq!(tax.cents(), 2);
    }

    #[test]
    fn test_sum_has_no_float_drift() {
        let total: Money = std::iter::repeat(Money::from_cents(10)).take(10_000).sum();
        assert_eq!(total, Money::from_major(1000));
    }

    #[test]
    fn test_wire_format_is_major_units() {
        assert_eq!(serde_json::to_string(&Money::from_cents(1250)).unwrap(), "12.5");
        assert_eq!(serde_json::to_string(&Money::from_cents(10000)).unwrap(), "100");
        assert_eq!(serde_json::to_string(&Money::from_cents(1099)).unwrap(), "10.99");

        let decoded: Money = serde_json::from_str("10.99").unwrap();
        assert_eq!(decoded.cents(), 1099);
        let decoded: Money = serde_json::from_str("40").unwrap();
        assert_eq!(decoded.cents(), 4000);
    }

    #[test]
    fn test_wire_round_trip_is_exact() {
        for cents in [0, 1, 7, 99, 101, 1099, 123_456_789, -1, -550] {
            let money = Money::from_cents(cents);
            let json = serde_json::to_string(&money).unwrap();
            let back: Money = serde_json::from_str(&json).unwrap();
            assert_eq!(back, money, "round trip of {} via {}", cents, json);
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(Money::from_major_f64(f64::NAN).is_none());
        assert!(serde_json::from_str::<Money>("1e300").is_err());
        assert!(serde_json::from_str::<Money>("\"12\"").is_err());
    }

    #[test]
    fn test_operators_saturate() {
        let max = Money::from_cents(i64::MAX);

        assert_eq!(max + Money::from_cents(1), max);
        assert_eq!(Money::from_cents(i64::MIN) - Money::from_cents(1), Money::from_cents(i64::MIN));
        assert_eq!(max * 3, max);
        assert_eq!(-Money::from_cents(i64::MIN), max);

        let total: Money = std::iter::repeat(Money::MAX).take(2_000).sum();
        assert_eq!(total, max);
    }

    #[test]
    fn test_checked_operations() {
        assert_eq!(Money::from_cents(200).multiply_quantity(3), Some(Money::from_cents(600)));
        assert_eq!(Money::from_major(2).multiply_quantity(i64::MAX / 10), None);
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
        assert_eq!(Money::checked_sum(std::iter::repeat(Money::MAX).take(2_000)), None);

        assert_eq!(
            Money::from_cents(1000).checked_tax(TaxRate::from_bps(1500)),
            Some(Money::from_cents(150))
        );
        assert_eq!(Money::from_cents(i64::MAX).checked_tax(TaxRate::from_bps(20_000)), None);
    }

    #[test]
    fn test_limit() {
        assert!(Money::MAX.is_within_limit());
        assert!((-Money::MAX).is_within_limit());
        assert!(!(Money::MAX + Money::from_cents(1)).is_within_limit());
        assert!(Money::from_major_f64(90_000_000_000_000.0).is_some());
        assert!(Money::from_major_f64(90_000_000_000_001.0).is_none());
    }
}
