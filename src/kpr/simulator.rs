use log::{debug, warn};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::SimulatorConfig;
use crate::decimal::Money;
use crate::errors::{Result, ValidationErrors};
use crate::events::{Event, EventStore};
use crate::format::{format_currency, format_number};
use crate::input::{
    format_money_display, format_number_display, parse_decimal, parse_formatted_number,
    parse_integer, strip_non_digits, DownPayment,
};
use crate::kpr::{calculate, LoanInput, LoanResult};
use crate::types::LoanField;

/// state of the estimate after the latest edit
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationOutcome {
    /// at least one field fails validation
    Invalid(ValidationErrors),
    /// valid input but the down payment covers the whole price
    NotComputable,
    /// something is financed but the figures leave the decimal range
    OutOfRange,
    Computed(LoanResult),
}

/// formatted figures for the result card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationSummary {
    pub monthly_payment: String,
    pub plafond: String,
    pub rate_label: String,
    pub total_interest: String,
    pub total_payable: String,
}

/// kpr form that recomputes the estimate on every field change
#[derive(Debug)]
pub struct KprSimulator {
    config: SimulatorConfig,
    property_price: Money,
    price_display: String,
    down_payment: DownPayment,
    down_payment_display: String,
    percent_display: String,
    term_years: u32,
    term_display: String,
    rate_percent: Decimal,
    rate_display: String,
    outcome: SimulationOutcome,
    events: EventStore,
}

impl KprSimulator {
    /// empty form with the configured default term and rate
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        config.validate()?;

        let mut simulator = Self {
            property_price: Money::ZERO,
            price_display: String::new(),
            down_payment: DownPayment::default(),
            down_payment_display: String::new(),
            percent_display: "0".to_string(),
            term_years: config.default_term_years,
            term_display: config.default_term_years.to_string(),
            rate_percent: config.default_rate_percent,
            rate_display: config.default_rate_percent.normalize().to_string(),
            outcome: SimulationOutcome::Invalid(ValidationErrors::new()),
            events: EventStore::new(),
            config,
        };
        simulator.recompute();
        Ok(simulator)
    }

    /// form opened from a listing, price prefilled
    pub fn for_listing(config: SimulatorConfig, price: Money) -> Result<Self> {
        let mut simulator = Self::new(config)?;
        if price.is_positive() {
            simulator.apply_price(price.round_whole());
        }
        Ok(simulator)
    }

    pub fn set_property_price(&mut self, text: &str) -> &SimulationOutcome {
        let display = format_number_display(text);
        let price = parse_formatted_number(&display);
        self.apply_price(price);
        self.price_display = display;
        &self.outcome
    }

    pub fn set_down_payment(&mut self, text: &str) -> &SimulationOutcome {
        let display = format_number_display(text);
        let amount = parse_formatted_number(&display);
        self.down_payment = DownPayment::from_amount(amount, self.property_price);
        self.down_payment_display = if self.down_payment.amount() == amount {
            display
        } else {
            format_money_display(self.down_payment.amount())
        };
        self.percent_display = self.down_payment.percent_display();
        self.recompute();
        &self.outcome
    }

    pub fn set_down_payment_percent(&mut self, text: &str) -> &SimulationOutcome {
        self.down_payment = DownPayment::from_percent(parse_decimal(text), self.property_price);
        self.down_payment_display = format_money_display(self.down_payment.amount());
        self.percent_display = self.down_payment.percent().normalize().to_string();
        self.recompute();
        &self.outcome
    }

    pub fn set_term(&mut self, text: &str) -> &SimulationOutcome {
        self.term_display = strip_non_digits(text);
        self.term_years = parse_integer(&self.term_display);
        self.recompute();
        &self.outcome
    }

    pub fn set_rate(&mut self, text: &str) -> &SimulationOutcome {
        self.rate_display = text.to_string();
        self.rate_percent = parse_decimal(text);
        self.recompute();
        &self.outcome
    }

    fn apply_price(&mut self, price: Money) {
        self.property_price = price;
        self.price_display = format_money_display(price);
        self.down_payment = self.down_payment.reprice(price);
        self.percent_display = self.down_payment.percent_display();
        self.recompute();
    }

    /// current field values as an unvalidated input
    pub fn input(&self) -> LoanInput {
        LoanInput {
            property_price: self.property_price,
            down_payment: self.down_payment.amount(),
            term_years: self.term_years,
            annual_rate_percent: self.rate_percent,
        }
    }

    fn recompute(&mut self) {
        let input = self.input();
        self.outcome = match LoanInput::validated(
            input.property_price,
            input.down_payment,
            input.term_years,
            input.annual_rate_percent,
            &self.config,
        ) {
            Err(errors) => {
                debug!("kpr input invalid: {}", errors);
                SimulationOutcome::Invalid(errors)
            }
            Ok(valid) => match calculate(&valid) {
                Some(result) => {
                    self.events.emit(Event::SimulationComputed {
                        principal: result.principal,
                        monthly_payment: result.monthly_payment,
                        total_interest: result.total_interest,
                        annual_rate_percent: result.annual_rate_percent,
                        term_months: result.term_months,
                    });
                    SimulationOutcome::Computed(result)
                }
                None if valid.principal().is_positive() => {
                    warn!("kpr estimate out of range for principal {}", valid.principal());
                    SimulationOutcome::OutOfRange
                }
                None => {
                    self.events.emit(Event::SimulationNotComputable {
                        property_price: valid.property_price,
                        down_payment: valid.down_payment,
                    });
                    SimulationOutcome::NotComputable
                }
            },
        };
    }

    pub fn outcome(&self) -> &SimulationOutcome {
        &self.outcome
    }

    pub fn result(&self) -> Option<&LoanResult> {
        match &self.outcome {
            SimulationOutcome::Computed(result) => Some(result),
            _ => None,
        }
    }

    /// message shown under a field, if any
    pub fn error_for(&self, field: LoanField) -> Option<String> {
        match &self.outcome {
            SimulationOutcome::Invalid(errors) => errors.message_for(field),
            _ => None,
        }
    }

    pub fn summary(&self) -> Option<SimulationSummary> {
        self.result().map(|result| SimulationSummary {
            monthly_payment: format_currency(result.monthly_payment),
            plafond: format_currency(result.principal),
            rate_label: format!("{}% / year", format_number(result.annual_rate_percent)),
            total_interest: format_currency(result.total_interest),
            total_payable: format_currency(result.total_payable),
        })
    }

    pub fn price_display(&self) -> &str {
        &self.price_display
    }

    pub fn down_payment_display(&self) -> &str {
        &self.down_payment_display
    }

    pub fn down_payment_percent_display(&self) -> &str {
        &self.percent_display
    }

    pub fn term_display(&self) -> &str {
        &self.term_display
    }

    pub fn rate_display(&self) -> &str {
        &self.rate_display
    }

    /// true while the price is unset and the down payment inputs are locked
    pub fn down_payment_locked(&self) -> bool {
        !self.property_price.is_positive()
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}
