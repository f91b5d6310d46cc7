use std::str::FromStr;

use rust_decimal::Decimal;

use crate::decimal::Money;

/// thousands separator used by the id-ID locale
pub const GROUP_SEPARATOR: char = '.';

/// keep only ascii digits
pub fn strip_non_digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// insert a separator every three digits from the right
pub fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

/// reformat raw keyboard text for display: "1500000" -> "1.500.000"
///
/// Leading zeros are dropped, a lone zero stays "0" and text without any
/// digit becomes empty.
pub fn format_number_display(text: &str) -> String {
    let digits = strip_non_digits(text);
    if digits.is_empty() {
        return String::new();
    }
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        return "0".to_string();
    }
    group_digits(trimmed, GROUP_SEPARATOR)
}

/// integer value behind a display string, 0 when it holds no digits
pub fn parse_formatted_number(text: &str) -> Money {
    let digits = strip_non_digits(text);
    if digits.is_empty() {
        return Money::ZERO;
    }
    match Decimal::from_str(&digits) {
        Ok(value) => Money::from_decimal(value),
        // more digits than a decimal can hold
        Err(_) => Money::from_decimal(Decimal::MAX),
    }
}

/// display string for a whole-unit amount
pub fn format_money_display(amount: Money) -> String {
    let whole = amount.round_whole().abs();
    format_number_display(&whole.as_decimal().trunc().to_string())
}

/// integer field: non-digits are ignored, empty input reads as 0
pub fn parse_integer(text: &str) -> u32 {
    let digits = strip_non_digits(text);
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        return 0;
    }
    trimmed.parse().unwrap_or(u32::MAX)
}

/// decimal field read like a lenient float parser: the longest numeric
/// prefix wins, a comma counts as decimal point, anything else reads as 0
pub fn parse_decimal(text: &str) -> Decimal {
    let text = text.trim_start();
    let mut prefix = String::new();
    let mut seen_digit = false;
    let mut seen_point = false;

    for (i, c) in text.chars().enumerate() {
        match c {
            '-' | '+' if i == 0 => prefix.push(c),
            '0'..='9' => {
                seen_digit = true;
                prefix.push(c);
            }
            '.' | ',' if !seen_point => {
                seen_point = true;
                prefix.push('.');
            }
            _ => break,
        }
    }

    if !seen_digit {
        return Decimal::ZERO;
    }
    let prefix = prefix.trim_end_matches('.');
    Decimal::from_str(prefix).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_number_display() {
        assert_eq!(format_number_display("1500000"), "1.500.000");
        assert_eq!(format_number_display("Rp 1.500.0001"), "15.000.001");
        assert_eq!(format_number_display("999"), "999");
        assert_eq!(format_number_display("1000"), "1.000");
        assert_eq!(format_number_display("abc"), "");
        assert_eq!(format_number_display(""), "");
        assert_eq!(format_number_display("000"), "0");
        assert_eq!(format_number_display("0012345"), "12.345");
    }

    #[test]
    fn test_parse_formatted_number() {
        assert_eq!(parse_formatted_number("1.500.000"), Money::from_major(1_500_000));
        assert_eq!(parse_formatted_number(""), Money::ZERO);
        assert_eq!(parse_formatted_number("Rp."), Money::ZERO);
        assert_eq!(parse_formatted_number("400.000.000"), Money::from_major(400_000_000));
    }

    #[test]
    fn test_format_money_display() {
        assert_eq!(format_money_display(Money::from_major(200_000_000)), "200.000.000");
        assert_eq!(format_money_display(Money::from_decimal(dec!(1234.5))), "1.235");
        assert_eq!(format_money_display(Money::ZERO), "0");
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("10"), 10);
        assert_eq!(parse_integer("1a5"), 15);
        assert_eq!(parse_integer(""), 0);
        assert_eq!(parse_integer("99999999999"), u32::MAX);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("5"), dec!(5));
        assert_eq!(parse_decimal("6.75"), dec!(6.75));
        assert_eq!(parse_decimal("6,5"), dec!(6.5));
        assert_eq!(parse_decimal("7.5%"), dec!(7.5));
        assert_eq!(parse_decimal("3."), dec!(3));
        assert_eq!(parse_decimal("-2"), dec!(-2));
        assert_eq!(parse_decimal("abc"), Decimal::ZERO);
        assert_eq!(parse_decimal(""), Decimal::ZERO);
        assert_eq!(parse_decimal("1.2.3"), dec!(1.2));
    }
}
