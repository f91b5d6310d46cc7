use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;

/// Money type for rupiah amounts, kept at 8 decimal places between operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const ONE: Money = Money(Decimal::ONE);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.round_dp(8))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s)?.round_dp(8)))
    }

    /// create from whole currency units (rupiah)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to specified decimal places
    pub fn round_dp(&self, dp: u32) -> Self {
        Money(self.0.round_dp(dp))
    }

    /// round to the nearest whole unit, halves away from zero
    pub fn round_whole(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// whole units as integer, None when out of i64 range
    pub fn to_major(&self) -> Option<i64> {
        self.round_whole().0.to_i64()
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// strictly less than zero
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// absolute value
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// maximum of two values
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// clamp into [lower, upper]
    pub fn clamp(self, lower: Self, upper: Self) -> Self {
        self.max(lower).min(upper)
    }

    /// calculate percentage (e.g., 20% of Rp 1.000.000), None on overflow
    pub fn percentage(&self, percent: Decimal) -> Option<Self> {
        let fraction = percent.checked_div(Decimal::ONE_HUNDRED)?;
        self.0.checked_mul(fraction).map(Money::from_decimal)
    }

    /// share of `whole` expressed in percent, None when whole is not positive
    /// or the result leaves the decimal range
    pub fn percent_of(&self, whole: Money) -> Option<Decimal> {
        if !whole.is_positive() {
            return None;
        }
        self.0
            .checked_div(whole.0)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i64> for Money {
    fn from(i: i64) -> Self {
        Money::from_major(i)
    }
}

impl From<u64> for Money {
    fn from(i: u64) -> Self {
        Money(Decimal::from(i))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money((self.0 + other.0).round_dp(8))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = (self.0 + other.0).round_dp(8);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money((self.0 - other.0).round_dp(8))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 = (self.0 - other.0).round_dp(8);
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money((self.0 * other).round_dp(8))
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money((self.0 / other).round_dp(8))
    }
}

/// annual interest rate held as a fraction (0.05 for 5%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from whole percentage (e.g., 5 for 5%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::ONE_HUNDRED)
    }

    /// create from a fractional percentage (e.g., 6.75 for 6.75%)
    pub fn from_percent_decimal(p: Decimal) -> Self {
        Rate(p / Decimal::ONE_HUNDRED)
    }

    /// get as decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as percentage
    pub fn as_percentage(&self) -> Decimal {
        (self.0 * Decimal::ONE_HUNDRED).normalize()
    }

    /// monthly rate from annual rate
    pub fn monthly_rate(&self) -> Rate {
        Rate(self.0 / Decimal::from(12))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_precision() {
        let m = Money::from_str_exact("100.123456789").unwrap();
        assert_eq!(m.to_string(), "100.12345679"); // rounded to 8 places
    }

    #[test]
    fn test_round_whole_half_away_from_zero() {
        assert_eq!(Money::from_decimal(dec!(4242620.5)).round_whole(), Money::from_major(4_242_621));
        assert_eq!(Money::from_decimal(dec!(4242620.49)).round_whole(), Money::from_major(4_242_620));
        assert_eq!(Money::from_decimal(dec!(1.5)).to_major(), Some(2));
    }

    #[test]
    fn test_percentage_and_percent_of() {
        let price = Money::from_major(1_000_000_000);
        let dp = price.percentage(dec!(20)).unwrap();
        assert_eq!(dp, Money::from_major(200_000_000));
        assert_eq!(dp.percent_of(price), Some(dec!(20)));
        assert_eq!(dp.percent_of(Money::ZERO), None);
    }

    #[test]
    fn test_percentage_at_decimal_limits() {
        let max = Money::from_decimal(Decimal::MAX);
        let half = max.percentage(dec!(50)).unwrap();
        assert!(half.is_positive() && half < max);
        assert_eq!(max.percentage(dec!(250)), None);

        assert_eq!(max.percent_of(max), Some(dec!(100)));
        assert_eq!(max.percent_of(Money::from_decimal(dec!(0.5))), None);
    }

    #[test]
    fn test_rate_conversions() {
        let rate = Rate::from_percent_decimal(dec!(6.75));
        assert_eq!(rate.as_decimal(), dec!(0.0675));
        assert_eq!(rate.as_percentage(), dec!(6.75));
        assert_eq!(rate.to_string(), "6.75%");
        assert_eq!(Rate::from_percentage(12).monthly_rate().as_decimal(), dec!(0.01));
    }
}
