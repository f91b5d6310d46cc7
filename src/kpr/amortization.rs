use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{ClientError, Result};
use crate::kpr::engine::annuity_payment;
use crate::kpr::LoanInput;

/// one month of the repayment plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    pub payment_number: u32,
    pub due_date: NaiveDate,
    pub beginning_balance: Money,
    pub payment_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub ending_balance: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
}

/// month-by-month breakdown of a level-payment kpr
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub interest_rate: Rate,
    pub term_months: u32,
    pub first_due_date: NaiveDate,
    pub payments: Vec<ScheduledPayment>,
    pub total_interest: Money,
    pub total_payment: Money,
}

/// longest plan generated, 100 years of monthly installments
pub const MAX_SCHEDULE_MONTHS: u32 = 100 * 12;

impl AmortizationSchedule {
    /// generate the plan, first installment due one month after `start_date`
    pub fn generate(input: &LoanInput, start_date: NaiveDate) -> Result<Self> {
        let principal = input.principal();
        if !principal.is_positive() {
            return Err(ClientError::CalculationError {
                message: format!("nothing financed: principal is {}", principal),
            });
        }

        let interest_rate = input.annual_rate();
        let term_months = input.term_months();
        if term_months > MAX_SCHEDULE_MONTHS {
            return Err(ClientError::CalculationError {
                message: format!(
                    "term of {} months exceeds the {} month schedule limit",
                    term_months, MAX_SCHEDULE_MONTHS
                ),
            });
        }
        let payment = annuity_payment(principal.as_decimal(), interest_rate, term_months)
            .map(Money::from_decimal)
            .ok_or_else(|| ClientError::CalculationError {
                message: format!(
                    "no level payment for {} over {} months at {}",
                    principal, term_months, interest_rate
                ),
            })?;

        let monthly_rate = interest_rate.monthly_rate().as_decimal();
        let mut payments = Vec::with_capacity(term_months as usize);
        let mut balance = principal;
        let mut cumulative_interest = Money::ZERO;
        let mut cumulative_principal = Money::ZERO;

        for i in 1..=term_months {
            let due_date = add_months(start_date, i)?;
            let interest_portion = Money::from_decimal(balance.as_decimal() * monthly_rate);
            let principal_portion = (payment - interest_portion).min(balance);

            cumulative_interest += interest_portion;
            cumulative_principal += principal_portion;

            let ending_balance = (balance - principal_portion).max(Money::ZERO);

            payments.push(ScheduledPayment {
                payment_number: i,
                due_date,
                beginning_balance: balance,
                payment_amount: principal_portion + interest_portion,
                principal_portion,
                interest_portion,
                ending_balance,
                cumulative_interest,
                cumulative_principal,
            });

            balance = ending_balance;
        }

        // last payment absorbs the rounding residue
        if let Some(last) = payments.last_mut() {
            if last.ending_balance > Money::ZERO && last.ending_balance < Money::ONE {
                last.principal_portion += last.ending_balance;
                last.payment_amount += last.ending_balance;
                last.cumulative_principal += last.ending_balance;
                last.ending_balance = Money::ZERO;
            }
        }

        let total_interest = payments
            .iter()
            .map(|p| p.interest_portion)
            .fold(Money::ZERO, |acc, x| acc + x);

        let total_payment = payments
            .iter()
            .map(|p| p.payment_amount)
            .fold(Money::ZERO, |acc, x| acc + x);

        Ok(Self {
            principal,
            interest_rate,
            term_months,
            first_due_date: payments.first().map(|p| p.due_date).unwrap_or(start_date),
            payments,
            total_interest,
            total_payment,
        })
    }

    /// get payment for specific period, numbered from 1
    pub fn get_payment(&self, payment_number: u32) -> Option<&ScheduledPayment> {
        let index = payment_number.checked_sub(1)?;
        self.payments.get(index as usize)
    }

    /// remaining balance after a payment; the full principal before the first
    pub fn balance_after_payment(&self, payment_number: u32) -> Money {
        self.get_payment(payment_number)
            .map(|p| p.ending_balance)
            .unwrap_or(self.principal)
    }

    /// interest and principal paid within one loan year (1-based)
    pub fn yearly_totals(&self, year: u32) -> Option<(Money, Money)> {
        let start = year.checked_sub(1)?.checked_mul(12)? as usize;
        let slice = self.payments.get(start..(start + 12).min(self.payments.len()))?;
        if slice.is_empty() {
            return None;
        }
        Some(slice.iter().fold((Money::ZERO, Money::ZERO), |(i, p), payment| {
            (i + payment.interest_portion, p + payment.principal_portion)
        }))
    }

    /// number of years in the plan
    pub fn years(&self) -> u32 {
        self.term_months.div_ceil(12)
    }
}

fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| ClientError::CalculationError {
            message: format!("due date out of range: {} + {} months", date, months),
        })
}

/// fraction of the plan's payments that goes to interest
pub fn interest_share(schedule: &AmortizationSchedule) -> Decimal {
    if schedule.total_payment.is_zero() {
        return Decimal::ZERO;
    }
    schedule.total_interest.as_decimal() / schedule.total_payment.as_decimal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kpr::calculate;
    use rust_decimal_macros::dec;

    fn input(rate: Decimal) -> LoanInput {
        LoanInput {
            property_price: Money::from_major(500_000_000),
            down_payment: Money::from_major(100_000_000),
            term_years: 10,
            annual_rate_percent: rate,
        }
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
    }

    #[test]
    fn test_schedule_pays_off_principal() {
        let schedule = AmortizationSchedule::generate(&input(dec!(5)), start()).unwrap();

        assert_eq!(schedule.payments.len(), 120);
        assert_eq!(schedule.years(), 10);

        let first = &schedule.payments[0];
        assert_eq!(first.beginning_balance, Money::from_major(400_000_000));
        assert_eq!(first.interest_portion.round_whole(), Money::from_major(1_666_667));
        assert!(first.principal_portion > Money::ZERO);

        let last = schedule.payments.last().unwrap();
        assert_eq!(last.ending_balance, Money::ZERO);
        assert!((last.cumulative_principal - schedule.principal).abs() < Money::ONE);

        // interest declines every month
        for pair in schedule.payments.windows(2) {
            assert!(pair[1].interest_portion < pair[0].interest_portion);
        }
    }

    #[test]
    fn test_schedule_matches_estimate() {
        let loan = input(dec!(5));
        let schedule = AmortizationSchedule::generate(&loan, start()).unwrap();
        let estimate = calculate(&loan).unwrap();

        assert!((schedule.total_interest.round_whole() - estimate.total_interest).abs() <= Money::from_major(2));
        assert_eq!(schedule.payments[0].payment_amount.round_whole(), estimate.monthly_payment);
        assert!(interest_share(&schedule) > Decimal::ZERO);
    }

    #[test]
    fn test_due_dates_clamp_to_month_end() {
        let schedule = AmortizationSchedule::generate(&input(dec!(5)), start()).unwrap();
        assert_eq!(schedule.first_due_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(
            schedule.get_payment(2).unwrap().due_date,
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
        );
        assert!(schedule.get_payment(0).is_none());
        assert!(schedule.get_payment(121).is_none());
    }

    #[test]
    fn test_oversized_term_rejected_before_allocating() {
        let mut loan = input(Decimal::ZERO);
        loan.term_years = u32::MAX / 12;
        assert!(matches!(
            AmortizationSchedule::generate(&loan, start()),
            Err(ClientError::CalculationError { .. })
        ));

        loan.term_years = MAX_SCHEDULE_MONTHS / 12;
        let schedule = AmortizationSchedule::generate(&loan, start()).unwrap();
        assert_eq!(schedule.payments.len(), MAX_SCHEDULE_MONTHS as usize);
    }

    #[test]
    fn test_zero_rate_schedule() {
        let schedule = AmortizationSchedule::generate(&input(Decimal::ZERO), start()).unwrap();
        assert_eq!(schedule.total_interest, Money::ZERO);
        assert!(schedule.payments.iter().all(|p| p.interest_portion.is_zero()));
        assert_eq!(schedule.balance_after_payment(0), Money::from_major(400_000_000));
        assert!(schedule.balance_after_payment(120).is_zero());
    }

    #[test]
    fn test_yearly_totals() {
        let schedule = AmortizationSchedule::generate(&input(dec!(5)), start()).unwrap();
        let (interest_y1, principal_y1) = schedule.yearly_totals(1).unwrap();
        let (interest_y10, principal_y10) = schedule.yearly_totals(10).unwrap();
        assert!(interest_y1 > interest_y10);
        assert!(principal_y1 < principal_y10);
        assert!(schedule.yearly_totals(0).is_none());
        assert!(schedule.yearly_totals(11).is_none());
    }

    #[test]
    fn test_nothing_financed_is_an_error() {
        let mut loan = input(dec!(5));
        loan.down_payment = loan.property_price;
        assert!(matches!(
            AmortizationSchedule::generate(&loan, start()),
            Err(ClientError::CalculationError { .. })
        ));
    }
}
