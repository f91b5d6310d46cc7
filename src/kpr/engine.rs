use log::{debug, warn};
use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};
use crate::kpr::{LoanInput, LoanResult};

/// level monthly payment for `principal` over `months` at `annual_rate`
///
/// payment = P * r / (1 - (1 + r)^-n), written as P * r * c / (c - 1) with
/// c = (1 + r)^n. A zero rate pays the principal down in equal parts. None
/// when there are no months or the arithmetic leaves the decimal range.
pub fn annuity_payment(principal: Decimal, annual_rate: Rate, months: u32) -> Option<Decimal> {
    if months == 0 {
        return None;
    }

    let monthly_rate = annual_rate.monthly_rate().as_decimal();
    if monthly_rate.is_zero() {
        return principal.checked_div(Decimal::from(months));
    }

    let base = Decimal::ONE + monthly_rate;
    let mut compound = Decimal::ONE;
    for _ in 0..months {
        compound = compound.checked_mul(base)?;
    }

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return None;
    }

    principal
        .checked_mul(monthly_rate)?
        .checked_mul(compound)?
        .checked_div(denominator)
}

/// run the kpr estimate; None when nothing is financed or the figures
/// leave the decimal range
pub fn calculate(input: &LoanInput) -> Option<LoanResult> {
    let principal = input.principal();
    if !principal.is_positive() {
        debug!(
            "kpr not computable: down payment {} covers price {}",
            input.down_payment, input.property_price
        );
        return None;
    }

    let months = input.term_months();
    let rate = input.annual_rate();
    let payment = match annuity_payment(principal.as_decimal(), rate, months) {
        Some(payment) => payment,
        None => {
            warn!(
                "kpr payment out of range for principal {}, rate {}, {} months",
                principal, rate, months
            );
            return None;
        }
    };

    let total_interest = if rate.is_zero() {
        Decimal::ZERO
    } else {
        let total_paid = payment.checked_mul(Decimal::from(months))?;
        total_paid - principal.as_decimal()
    };

    let total_interest = Money::from_decimal(total_interest).round_whole();
    let result = LoanResult {
        principal,
        monthly_payment: Money::from_decimal(payment).round_whole(),
        total_interest,
        total_payable: principal + total_interest,
        annual_rate_percent: input.annual_rate_percent,
        term_months: months,
    };

    debug!(
        "kpr computed: principal {}, monthly {}, interest {}",
        result.principal, result.monthly_payment, result.total_interest
    );
    Some(result)
}
