use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::decimal::Money;
use crate::types::LoanField;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid loan input: {errors}")]
    InvalidLoanInput {
        errors: ValidationErrors,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid credentials: {message}")]
    InvalidCredentials {
        message: String,
    },

    #[error("too many login attempts, retry in {remaining_secs} seconds")]
    LoginLockedOut {
        remaining_secs: i64,
    },

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("invalid qr code: {message}")]
    InvalidQrCode {
        message: String,
    },

    #[error("qr scan already in progress")]
    ScanInProgress,

    #[error("malformed response: {message}")]
    MalformedResponse {
        message: String,
    },

    #[error("storage error for key {key}: {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// single field-level validation failure of the kpr form
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("property price must be greater than 0")]
    PropertyPriceNotPositive,

    #[error("property price {price} exceeds the maximum of {max}")]
    PropertyPriceTooLarge {
        price: Money,
        max: Money,
    },

    #[error("down payment cannot be negative")]
    DownPaymentNegative,

    #[error("down payment {down_payment} exceeds property price {price}")]
    DownPaymentExceedsPrice {
        down_payment: Money,
        price: Money,
    },

    #[error("term must be between {min} and {max} years, got {years}")]
    TermOutOfRange {
        years: u32,
        min: u32,
        max: u32,
    },

    #[error("interest rate cannot be negative")]
    RateNegative,

    #[error("interest rate must be at most {max}%, got {rate}%")]
    RateTooHigh {
        rate: Decimal,
        max: Decimal,
    },
}

impl ValidationError {
    /// form field the failure belongs to
    pub fn field(&self) -> LoanField {
        match self {
            ValidationError::PropertyPriceNotPositive
            | ValidationError::PropertyPriceTooLarge { .. } => LoanField::PropertyPrice,
            ValidationError::DownPaymentNegative
            | ValidationError::DownPaymentExceedsPrice { .. } => LoanField::DownPayment,
            ValidationError::TermOutOfRange { .. } => LoanField::TermYears,
            ValidationError::RateNegative | ValidationError::RateTooHigh { .. } => {
                LoanField::AnnualRate
            }
        }
    }
}

/// every failure found in one validation pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// first message for a field, as shown under the input
    pub fn message_for(&self, field: LoanField) -> Option<String> {
        self.0
            .iter()
            .find(|e| e.field() == field)
            .map(|e| e.to_string())
    }

    pub fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field(), e))
            .collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for ClientError {
    fn from(errors: ValidationErrors) -> Self {
        ClientError::InvalidLoanInput { errors }
    }
}
