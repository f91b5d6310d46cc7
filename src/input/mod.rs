pub mod down_payment;
pub mod number;
pub mod validation;

pub use down_payment::DownPayment;
pub use number::{
    format_money_display, format_number_display, parse_decimal, parse_formatted_number,
    parse_integer, strip_non_digits,
};
pub use validation::validate_loan_input;
