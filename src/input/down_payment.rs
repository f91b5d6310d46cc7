use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;

/// down payment kept consistent as amount and share of the property price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DownPayment {
    amount: Money,
    percent: Decimal,
}

impl DownPayment {
    /// amount edited: clamped to [0, price], percent follows
    ///
    /// With no positive price yet the amount is kept and the percent stays 0.
    pub fn from_amount(amount: Money, price: Money) -> Self {
        if !price.is_positive() {
            return Self {
                amount: amount.max(Money::ZERO),
                percent: Decimal::ZERO,
            };
        }
        let amount = amount.clamp(Money::ZERO, price);
        Self {
            amount,
            percent: clamp_percent(amount.percent_of(price).unwrap_or(Decimal::ZERO)),
        }
    }

    /// percent edited: clamped to [0, 100], amount follows rounded to whole units
    pub fn from_percent(percent: Decimal, price: Money) -> Self {
        let percent = clamp_percent(percent);
        let amount = if price.is_positive() {
            price
                .percentage(percent)
                .map(|amount| amount.round_whole().min(price))
                .unwrap_or(Money::ZERO)
        } else {
            Money::ZERO
        };
        Self { amount, percent }
    }

    /// property price changed: the amount stays, the percent is re-derived
    pub fn reprice(&self, price: Money) -> Self {
        let percent = self
            .amount
            .percent_of(price)
            .map(clamp_percent)
            .unwrap_or(Decimal::ZERO);
        Self {
            amount: self.amount,
            percent,
        }
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    /// unrounded share of the price in percent
    pub fn percent(&self) -> Decimal {
        self.percent
    }

    /// percent rounded to a whole number for the percent box
    pub fn percent_display(&self) -> String {
        self.percent
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_string()
    }
}

fn clamp_percent(percent: Decimal) -> Decimal {
    percent.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED)
}
