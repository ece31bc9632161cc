//! Line patterns shared by the statement layouts.

use chrono::{Month, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;

use crate::money::parse_amount;

fn slash_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("slash date regex"))
}

fn card_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}$").expect("card regex"))
}

fn currency_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\$?([\d,]+\.\d{2})$").expect("currency regex"))
}

fn bare_amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([\d,]+\.\d{2})$").expect("bare amount regex"))
}

fn foreign_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+(?:\.\d+)?)\s+([A-Z]{3})\b").expect("foreign regex"))
}

fn day_month_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})\s+(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)$")
            .expect("day month regex")
    })
}

fn account_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Account:\s*(\d+)\s+(.+?)\s*$").expect("account regex"))
}

fn statement_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)eStatement\s*-\s*([A-Za-z]+)\s+(\d{4})").expect("statement name regex")
    })
}

/// `DD/MM/YYYY`, only when it is also a real calendar date.
pub fn slash_date(line: &str) -> Option<NaiveDate> {
    if !slash_date_re().is_match(line) {
        return None;
    }
    NaiveDate::parse_from_str(line, "%d/%m/%Y").ok()
}

pub fn is_card(line: &str) -> bool {
    card_re().is_match(line)
}

/// Currency amount with an optional leading `$`, e.g. `$1,234.56`.
pub fn currency(line: &str) -> Option<Decimal> {
    let caps = currency_re().captures(line)?;
    parse_amount(caps.get(1)?.as_str())
}

/// Amount printed on its own line with no currency symbol.
pub fn bare_amount(line: &str) -> Option<Decimal> {
    let caps = bare_amount_re().captures(line)?;
    parse_amount(caps.get(1)?.as_str())
}

/// First `amount CODE` annotation in the line whose code is one of `codes`.
pub fn foreign(line: &str, codes: &[String]) -> Option<(Decimal, String)> {
    foreign_re().captures_iter(line).find_map(|caps| {
        let code = caps.get(2)?.as_str();
        if !codes.iter().any(|c| c.eq_ignore_ascii_case(code)) {
            return None;
        }
        let amount = parse_amount(caps.get(1)?.as_str())?;
        Some((amount, code.to_string()))
    })
}

/// `D Mon` with no year, returning (day, month number).
pub fn day_month(line: &str) -> Option<(u32, u32)> {
    let caps = day_month_re().captures(line)?;
    let day = caps.get(1)?.as_str().parse().ok()?;
    let month = month_number(caps.get(2)?.as_str())?;
    Some((day, month))
}

/// Account section marker, returning the account name.
pub fn account_marker(line: &str) -> Option<&str> {
    let caps = account_marker_re().captures(line)?;
    Some(caps.get(2)?.as_str())
}

pub fn is_account_marker(line: &str) -> bool {
    line.contains("Account:")
}

/// (year, month) from a source name such as `eStatement - Jul 2024.pdf`.
pub fn statement_month(name: &str) -> Option<(i32, u32)> {
    let caps = statement_name_re().captures(name)?;
    let month = month_number(caps.get(1)?.as_str())?;
    let year = caps.get(2)?.as_str().parse().ok()?;
    Some((year, month))
}

/// Month number from an English month name or any prefix of at least three letters.
pub fn month_number(name: &str) -> Option<u32> {
    if let Ok(month) = name.parse::<Month>() {
        return Some(month.number_from_month());
    }
    // longer prefixes such as "Sept"
    let name = name.to_lowercase();
    if name.len() < 3 {
        return None;
    }
    (1..=12u8)
        .filter_map(|number| Month::try_from(number).ok())
        .find(|month| month.name().to_lowercase().starts_with(&name))
        .map(|month| month.number_from_month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn slash_date_requires_calendar_date() {
        assert_eq!(
            slash_date("15/08/2024"),
            NaiveDate::from_ymd_opt(2024, 8, 15)
        );
        assert_eq!(slash_date("31/02/2025"), None);
        assert_eq!(slash_date("1/8/2024"), None);
        assert_eq!(slash_date("15/08/2024 extra"), None);
    }

    #[test]
    fn currency_with_and_without_symbol() {
        assert_eq!(currency("$1,234.56"), Some(dec!(1234.56)));
        assert_eq!(currency("89.50"), Some(dec!(89.50)));
        assert_eq!(currency("$89.5"), None);
        assert_eq!(currency("-$89.50"), None);
    }

    #[test]
    fn bare_amount_rejects_symbol() {
        assert_eq!(bare_amount("1,050.00"), Some(dec!(1050.00)));
        assert_eq!(bare_amount("$1,050.00"), None);
    }

    #[test]
    fn foreign_only_known_codes() {
        let codes = vec!["USD".to_string(), "EUR".to_string()];
        assert_eq!(
            foreign("12.99 USD", &codes),
            Some((dec!(12.99), "USD".to_string()))
        );
        assert_eq!(
            foreign("FX 3 JPY then 4.50 EUR", &codes),
            Some((dec!(4.50), "EUR".to_string()))
        );
        assert_eq!(foreign("300 JPY", &codes), None);
    }

    #[test]
    fn day_month_lines() {
        assert_eq!(day_month("3 Jul"), Some((3, 7)));
        assert_eq!(day_month("28 Dec"), Some((28, 12)));
        assert_eq!(day_month("3 July"), None);
        assert_eq!(day_month("Jul 3"), None);
    }

    #[test]
    fn account_names() {
        assert_eq!(
            account_marker("Account: 12345678 Everyday Access"),
            Some("Everyday Access")
        );
        assert_eq!(account_marker("Account summary"), None);
    }

    #[test]
    fn month_names_and_prefixes() {
        assert_eq!(month_number("Jun"), Some(6));
        assert_eq!(month_number("DECEMBER"), Some(12));
        assert_eq!(month_number("Sept"), Some(9));
        assert_eq!(month_number("octo"), Some(10));
        assert_eq!(month_number("Ma"), None);
        assert_eq!(month_number("Smarch"), None);
    }

    #[test]
    fn statement_month_from_file_names() {
        assert_eq!(statement_month("eStatement - Jul 2024.pdf"), Some((2024, 7)));
        assert_eq!(statement_month("eStatement - Sept 2024.txt"), Some((2024, 9)));
        assert_eq!(statement_month("eStatement - March 2025"), Some((2025, 3)));
        assert_eq!(statement_month("statement.pdf"), None);
    }
}
