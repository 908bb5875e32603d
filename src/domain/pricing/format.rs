//! Money/locale formatting
//!
//! Vietnamese prices are whole đồng grouped with `.` and suffixed with `₫`
//! (`290.000 ₫`). Everything else renders as USD with two decimals
//! (`$1,234.50`).

use rust_decimal::prelude::*;

use crate::domain::value_objects::Locale;

pub const CONTACT_FOR_PRICE_EN: &str = "Contact for Price";
pub const CONTACT_FOR_PRICE_VI: &str = "Liên hệ để biết giá";

const VND_SYMBOL: char = '₫';

/// Placeholder shown instead of a price for quote items.
pub fn contact_for_price(locale: Locale) -> &'static str {
    match locale {
        Locale::Vi => CONTACT_FOR_PRICE_VI,
        Locale::En => CONTACT_FOR_PRICE_EN,
    }
}

/// Converts a float into an exact decimal. NaN and infinities have no decimal value.
pub fn to_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() { return None; }
    Decimal::from_f64(value)
}

/// Raw formatter for a known amount.
pub fn format_amount(amount: Decimal, locale: Locale) -> String {
    match locale {
        Locale::Vi => {
            let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            let digits = format!("{:.0}", rounded.abs());
            format!("{}{} {}", sign(rounded), group_thousands(&digits, '.'), VND_SYMBOL)
        }
        Locale::En => {
            let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            let text = format!("{:.2}", rounded.abs());
            let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
            format!("{}${}.{}", sign(rounded), group_thousands(whole, ','), cents)
        }
    }
}

/// Formatting context: an absent amount renders as nothing, an unusable one
/// (NaN, infinite) as the contact phrase.
pub fn format_price(amount: Option<f64>, locale: Locale) -> String {
    match amount {
        None => String::new(),
        Some(value) => match to_decimal(value) {
            Some(amount) => format_amount(amount, locale),
            None => contact_for_price(locale).to_string(),
        },
    }
}

/// Display context: zero, absent and unusable amounts all render as the contact phrase.
pub fn display_price(amount: Option<f64>, locale: Locale) -> String {
    display_amount(amount.and_then(to_decimal), locale)
}

pub fn display_amount(amount: Option<Decimal>, locale: Locale) -> String {
    match amount {
        Some(amount) if !amount.is_zero() => format_amount(amount, locale),
        _ => contact_for_price(locale).to_string(),
    }
}

/// Reads back a Vietnamese-formatted amount (`"1.250.000 ₫"` -> `1250000`).
pub fn parse_vnd(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.' && *c != VND_SYMBOL)
        .collect();
    if cleaned.is_empty() { return None; }
    cleaned.parse::<Decimal>().ok()
}

fn sign(amount: Decimal) -> &'static str {
    if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 { out.push(separator); }
        out.push(c);
    }
    out
}
