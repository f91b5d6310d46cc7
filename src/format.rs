//! id-ID display helpers shared by the simulator, favorites and profile views.

use std::sync::OnceLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::decimal::Money;
use crate::input::number::{group_digits, GROUP_SEPARATOR};

const DECIMAL_SEPARATOR: char = ',';
const CURRENCY_SYMBOL: &str = "Rp";

const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// id-ID number formatting: "1.234.567,89", at most three fraction digits
pub fn format_number(value: Decimal) -> String {
    format_with_fraction(value, 3)
}

/// rupiah formatting: "Rp 1.234.567", at most two fraction digits
pub fn format_currency(amount: Money) -> String {
    let value = amount.as_decimal();
    let body = format_with_fraction(value.abs(), 2);
    if value.is_sign_negative() && !value.is_zero() {
        format!("-{} {}", CURRENCY_SYMBOL, body)
    } else {
        format!("{} {}", CURRENCY_SYMBOL, body)
    }
}

/// currency or "-" when there is nothing to show
pub fn format_optional_currency(amount: Option<Money>) -> String {
    amount.map(format_currency).unwrap_or_else(|| "-".to_string())
}

fn format_with_fraction(value: Decimal, max_fraction: u32) -> String {
    let rounded = value
        .round_dp_with_strategy(max_fraction, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(whole, GROUP_SEPARATOR));
    if let Some(fraction) = fraction {
        out.push(DECIMAL_SEPARATOR);
        out.push_str(fraction);
    }
    out
}

/// compact counter: 950 -> "950", 4_500 -> "4.5K+", 1_200_000 -> "1.2M+"
pub fn format_total_sales(total: u64) -> String {
    let (divisor, suffix) = match total {
        0..=999 => return total.to_string(),
        1_000..=999_999 => (1_000u64, "K+"),
        1_000_000..=999_999_999 => (1_000_000, "M+"),
        _ => (1_000_000_000, "B+"),
    };
    let scaled = (Decimal::from(total) / Decimal::from(divisor))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.1}{}", scaled, suffix)
}

/// hide the middle of a string: "081234567890" -> "08********90"
pub fn mask_text(text: &str, unmasked_start: usize, unmasked_end: usize, mask_char: char) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= unmasked_start + unmasked_end {
        return text.to_string();
    }
    let start: String = chars[..unmasked_start].iter().collect();
    let end: String = chars[chars.len() - unmasked_end..].iter().collect();
    let masked = mask_char
        .to_string()
        .repeat(chars.len() - unmasked_start - unmasked_end);
    format!("{}{}{}", start, masked, end)
}

/// up to two uppercase initials, "U" for a missing name
pub fn name_initial(name: Option<&str>) -> String {
    let name = match name {
        Some(n) if !n.is_empty() => n,
        _ => return "U".to_string(),
    };
    name.split(' ')
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// first two words of a full name
pub fn two_word_name(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
}

fn phone_noise() -> &'static Regex {
    static NOISE: OnceLock<Regex> = OnceLock::new();
    NOISE.get_or_init(|| Regex::new(r"[\s\-()]").expect("static pattern"))
}

/// normalise an indonesian phone number to +62 international form
pub fn format_phone(phone: Option<&str>) -> String {
    let phone = match phone {
        Some(p) if !p.is_empty() => p,
        _ => return String::new(),
    };
    let cleaned = phone_noise().replace_all(phone, "");

    if cleaned.starts_with("+62") {
        cleaned.into_owned()
    } else if cleaned.starts_with("62") {
        format!("+{}", cleaned)
    } else if let Some(rest) = cleaned.strip_prefix('0').filter(|r| r.starts_with('8')) {
        format!("+62{}", rest)
    } else if cleaned.starts_with('8') {
        format!("+62{}", cleaned)
    } else if cleaned.starts_with('+') {
        cleaned.into_owned()
    } else {
        format!("+{}", cleaned)
    }
}

/// wa.me link opening a chat with a prefilled message
pub fn whatsapp_message_url(phone_number: &str, message: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        phone_number,
        encode_uri_component(message)
    )
}

/// append non-empty params as a query string
pub fn merged_query_param_url(url: &str, params: &[(&str, Option<String>)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| match value {
            Some(v) if !v.is_empty() => Some(format!("{}={}", encode_form(key), encode_form(v))),
            _ => None,
        })
        .collect();
    if query.is_empty() {
        url.to_string()
    } else {
        format!("{}?{}", url, query.join("&"))
    }
}

/// percent-encode everything except A-Z a-z 0-9 - _ . ! ~ * ' ( )
pub fn encode_uri_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

// application/x-www-form-urlencoded: spaces become '+'
fn encode_form(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Money::from_major(4_242_621)), "Rp 4.242.621");
        assert_eq!(format_currency(Money::ZERO), "Rp 0");
        assert_eq!(format_currency(Money::from_decimal(dec!(1500.5))), "Rp 1.500,5");
        assert_eq!(format_currency(Money::from_decimal(dec!(-2500))), "-Rp 2.500");
        assert_eq!(format_optional_currency(None), "-");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(dec!(1234567.891)), "1.234.567,891");
        assert_eq!(format_number(dec!(1234567.8915)), "1.234.567,892");
        assert_eq!(format_number(dec!(100.000)), "100");
        assert_eq!(format_number(dec!(-1000)), "-1.000");
    }

    #[test]
    fn test_format_total_sales() {
        assert_eq!(format_total_sales(0), "0");
        assert_eq!(format_total_sales(999), "999");
        assert_eq!(format_total_sales(1_000), "1.0K+");
        assert_eq!(format_total_sales(4_550), "4.6K+");
        assert_eq!(format_total_sales(1_200_000), "1.2M+");
        assert_eq!(format_total_sales(3_000_000_000), "3.0B+");
    }

    #[test]
    fn test_mask_text() {
        assert_eq!(mask_text("081234567890", 2, 2, '*'), "08********90");
        assert_eq!(mask_text("abcd", 2, 2, '*'), "abcd");
        assert_eq!(mask_text("budi@mail.com", 1, 4, '#'), "b########.com");
    }

    #[test]
    fn test_names() {
        assert_eq!(name_initial(Some("budi santoso")), "BS");
        assert_eq!(name_initial(Some("siti nur aisyah")), "SN");
        assert_eq!(name_initial(Some("andi")), "A");
        assert_eq!(name_initial(None), "U");
        assert_eq!(name_initial(Some("")), "U");
        assert_eq!(two_word_name("  Siti   Nur Aisyah "), "Siti Nur");
        assert_eq!(two_word_name("Andi"), "Andi");
        assert_eq!(two_word_name(""), "");
    }

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone(Some("0812-3456-7890")), "+6281234567890");
        assert_eq!(format_phone(Some("(62) 812 3456")), "+628123456");
        assert_eq!(format_phone(Some("+62 812 3456")), "+628123456");
        assert_eq!(format_phone(Some("8123456")), "+628123456");
        assert_eq!(format_phone(Some("0211234567")), "+0211234567");
        assert_eq!(format_phone(Some("+1 555 0100")), "+15550100");
        assert_eq!(format_phone(None), "");
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            whatsapp_message_url("6281234567890", "Halo, saya tertarik & ingin tanya"),
            "https://wa.me/6281234567890?text=Halo%2C%20saya%20tertarik%20%26%20ingin%20tanya"
        );
        assert_eq!(
            merged_query_param_url(
                "/products",
                &[
                    ("page", Some("2".to_string())),
                    ("search", Some("rumah minimalis".to_string())),
                    ("status", None),
                    ("sort", Some(String::new())),
                ]
            ),
            "/products?page=2&search=rumah+minimalis"
        );
        assert_eq!(merged_query_param_url("/products", &[]), "/products");
        assert_eq!(encode_uri_component("luas 120 m² (SHM)"), "luas%20120%20m%C2%B2%20(SHM)");
        assert_eq!(
            merged_query_param_url("/search", &[("q", Some("ruko & kost".to_string()))]),
            "/search?q=ruko+%26+kost"
        );
    }
}
