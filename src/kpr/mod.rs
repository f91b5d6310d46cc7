pub mod amortization;
pub mod engine;
pub mod simulator;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::SimulatorConfig;
use crate::decimal::{Money, Rate};
use crate::errors::ValidationErrors;
use crate::input::validate_loan_input;

pub use amortization::{AmortizationSchedule, ScheduledPayment};
pub use engine::{annuity_payment, calculate};
pub use simulator::{KprSimulator, SimulationOutcome, SimulationSummary};

/// the four kpr form fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanInput {
    pub property_price: Money,
    pub down_payment: Money,
    pub term_years: u32,
    /// annual rate in percent (5 for 5%)
    pub annual_rate_percent: Decimal,
}

impl LoanInput {
    /// build and validate against the configured bounds
    pub fn validated(
        property_price: Money,
        down_payment: Money,
        term_years: u32,
        annual_rate_percent: Decimal,
        config: &SimulatorConfig,
    ) -> Result<Self, ValidationErrors> {
        let input = Self {
            property_price,
            down_payment,
            term_years,
            annual_rate_percent,
        };
        validate_loan_input(&input, config)?;
        Ok(input)
    }

    /// amount financed (plafond)
    pub fn principal(&self) -> Money {
        self.property_price - self.down_payment
    }

    pub fn term_months(&self) -> u32 {
        self.term_years.saturating_mul(12)
    }

    pub fn annual_rate(&self) -> Rate {
        Rate::from_percent_decimal(self.annual_rate_percent)
    }
}

/// kpr estimate, figures rounded to whole rupiah
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanResult {
    pub principal: Money,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_payable: Money,
    pub annual_rate_percent: Decimal,
    pub term_months: u32,
}

impl LoanResult {
    /// total payable spread evenly over the term; agrees with
    /// `monthly_payment` up to rounding
    pub fn average_installment(&self) -> Money {
        if self.term_months == 0 {
            return self.total_payable;
        }
        (self.total_payable / Decimal::from(self.term_months)).round_whole()
    }
}
