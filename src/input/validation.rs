use rust_decimal::Decimal;

use crate::config::SimulatorConfig;
use crate::errors::{ValidationError, ValidationErrors};
use crate::kpr::LoanInput;

/// check every field against the configured bounds, collecting all failures
pub fn validate_loan_input(
    input: &LoanInput,
    config: &SimulatorConfig,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if !input.property_price.is_positive() {
        errors.push(ValidationError::PropertyPriceNotPositive);
    } else if input.property_price > config.max_property_price {
        errors.push(ValidationError::PropertyPriceTooLarge {
            price: input.property_price,
            max: config.max_property_price,
        });
    }

    if input.down_payment.is_negative() {
        errors.push(ValidationError::DownPaymentNegative);
    } else if input.property_price.is_positive() && input.down_payment > input.property_price {
        errors.push(ValidationError::DownPaymentExceedsPrice {
            down_payment: input.down_payment,
            price: input.property_price,
        });
    }

    if input.term_years < config.min_term_years || input.term_years > config.max_term_years {
        errors.push(ValidationError::TermOutOfRange {
            years: input.term_years,
            min: config.min_term_years,
            max: config.max_term_years,
        });
    }

    if input.annual_rate_percent < Decimal::ZERO {
        errors.push(ValidationError::RateNegative);
    } else if input.annual_rate_percent > config.max_rate_percent {
        errors.push(ValidationError::RateTooHigh {
            rate: input.annual_rate_percent,
            max: config.max_rate_percent,
        });
    }

    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;
    use crate::types::LoanField;
    use rust_decimal_macros::dec;

    fn input(price: i64, down: i64, years: u32, rate: Decimal) -> LoanInput {
        LoanInput {
            property_price: Money::from_major(price),
            down_payment: Money::from_major(down),
            term_years: years,
            annual_rate_percent: rate,
        }
    }

    #[test]
    fn test_valid_input_passes() {
        let config = SimulatorConfig::standard();
        assert!(validate_loan_input(&input(500_000_000, 100_000_000, 10, dec!(5)), &config).is_ok());
        // full down payment is valid input, it is just not computable
        assert!(validate_loan_input(&input(500_000_000, 500_000_000, 1, dec!(0)), &config).is_ok());
        assert!(validate_loan_input(&input(500_000_000, 0, 30, dec!(20)), &config).is_ok());
    }

    #[test]
    fn test_all_failures_reported() {
        let config = SimulatorConfig::standard();
        let errors = validate_loan_input(&input(0, -1, 31, dec!(20.5)), &config).unwrap_err();

        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.message_for(LoanField::PropertyPrice).as_deref(),
            Some("property price must be greater than 0")
        );
        assert_eq!(
            errors.message_for(LoanField::DownPayment).as_deref(),
            Some("down payment cannot be negative")
        );
        assert!(errors.message_for(LoanField::TermYears).is_some());
        assert_eq!(
            errors.message_for(LoanField::AnnualRate).as_deref(),
            Some("interest rate must be at most 20%, got 20.5%")
        );
    }

    #[test]
    fn test_down_payment_above_price() {
        let config = SimulatorConfig::standard();
        let errors =
            validate_loan_input(&input(100_000_000, 150_000_000, 10, dec!(5)), &config).unwrap_err();
        assert!(matches!(
            errors.iter().next(),
            Some(ValidationError::DownPaymentExceedsPrice { .. })
        ));
    }

    #[test]
    fn test_term_bounds_follow_config() {
        let long = input(500_000_000, 0, 80, dec!(5));
        assert!(validate_loan_input(&long, &SimulatorConfig::standard()).is_err());
        assert!(validate_loan_input(&long, &SimulatorConfig::extended_tenor()).is_ok());
        assert!(validate_loan_input(&input(500_000_000, 0, 0, dec!(5)), &SimulatorConfig::extended_tenor()).is_err());
    }

    #[test]
    fn test_price_above_ceiling() {
        let config = SimulatorConfig::standard();
        let at_max = input(crate::config::MAX_PROPERTY_PRICE, 0, 10, dec!(5));
        assert!(validate_loan_input(&at_max, &config).is_ok());

        let absurd = LoanInput {
            property_price: Money::from_decimal(Decimal::MAX),
            ..at_max
        };
        let errors = validate_loan_input(&absurd, &config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors.iter().next(),
            Some(ValidationError::PropertyPriceTooLarge { .. })
        ));
        assert!(errors.message_for(LoanField::PropertyPrice).is_some());
    }

    #[test]
    fn test_negative_rate() {
        let errors = validate_loan_input(&input(500_000_000, 0, 10, dec!(-1)), &SimulatorConfig::standard())
            .unwrap_err();
        assert_eq!(errors.iter().next(), Some(&ValidationError::RateNegative));
    }
}
