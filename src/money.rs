use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Round to cents, with midpoints rounded away from zero.
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a rate to four decimal places (basis points of a percent).
pub fn round_rate(rate: Decimal) -> Decimal {
    rate.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse a printed statement amount such as `$1,234.56` into a magnitude.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '$')
        .collect();
    Decimal::from_str(&cleaned).ok()
}

/// Format as Australian dollars, e.g. `$12,345.68` or `-$3.10`.
pub fn format_aud(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let magnitude = rounded.abs();
    let dollars = magnitude.trunc().to_u128().unwrap_or_default();
    let cents = (magnitude.fract() * Decimal::ONE_HUNDRED)
        .to_u32()
        .unwrap_or_default();
    format!("{sign}${}.{cents:02}", dollars.to_formatted_string(&Locale::en))
}

/// Format whole-dollar thresholds without cents, e.g. `$18,200`.
pub fn format_dollars(amount: Decimal) -> String {
    let text = format_aud(amount);
    match text.strip_suffix(".00") {
        Some(whole) => whole.to_string(),
        None => text,
    }
}

/// Format a rate as a percentage with two decimals, e.g. `0.16` -> `16.00%`.
pub fn format_pct(rate: Decimal) -> String {
    format!("{:.2}%", rate * Decimal::ONE_HUNDRED)
}
