//! Checking dated document names against the dates printed inside them.
//!
//! Receipts and invoices are filed as `YYMMDD <name>.pdf`. A typo in the prefix
//! sends a receipt to the wrong transaction, so each file's prefix is compared
//! with the closest date found in its text.

use crate::extract::TextExtractor;
use crate::receipts::{load_documents, Receipt};
use crate::statement::patterns;
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Extracted text shorter than this is treated as a scan without text
const MIN_TEXT_LEN: usize = 10;
const YEARS: std::ops::RangeInclusive<i32> = 2020..=2030;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Mismatch,
    Close,
    Exact,
    NoDates,
    NoText,
    Unreadable,
    /// No `YYMMDD` prefix, not checked
    Undated,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Verdict::Mismatch => "MISMATCH",
            Verdict::Close => "close",
            Verdict::Exact => "exact",
            Verdict::NoDates => "no dates",
            Verdict::NoText => "no text",
            Verdict::Unreadable => "unreadable",
            Verdict::Undated => "undated",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateCheck {
    pub path: PathBuf,
    pub file_name: String,
    pub file_date: Option<NaiveDate>,
    pub verdict: Verdict,
    pub closest: Option<NaiveDate>,
    pub days_off: Option<i64>,
    pub content_dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Copy)]
enum Order {
    DayMonthYear,
    YearMonthDay,
    DayNameYear,
    NameDayYear,
}

const MONTH_NAMES: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";

fn date_patterns() -> &'static [(Regex, Order)] {
    static PATTERNS: OnceLock<Vec<(Regex, Order)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let pattern = |re: &str, order| (Regex::new(re).expect("date regex"), order);
        vec![
            pattern(r"\b(\d{1,2})[/-](\d{1,2})[/-](20\d{2})\b", Order::DayMonthYear),
            pattern(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{2})\b", Order::DayMonthYear),
            pattern(r"\b(20\d{2})-(\d{1,2})-(\d{1,2})\b", Order::YearMonthDay),
            pattern(
                &format!(r"(?i)\b(\d{{1,2}})\s+({MONTH_NAMES})\s+(20\d{{2}})\b"),
                Order::DayNameYear,
            ),
            pattern(
                &format!(r"(?i)\b({MONTH_NAMES})\s+(\d{{1,2}}),?\s+(20\d{{2}})\b"),
                Order::NameDayYear,
            ),
            pattern(r"\b(\d{1,2})\.(\d{1,2})\.(20\d{2})\b", Order::DayMonthYear),
        ]
    })
}

/// Every plausible date written in `text`, in numeric or English long form
pub fn content_dates(text: &str) -> BTreeSet<NaiveDate> {
    let mut dates = BTreeSet::new();
    for (re, order) in date_patterns() {
        for caps in re.captures_iter(text) {
            let part = |i: usize| caps.get(i).map_or("", |m| m.as_str());
            let number = |i: usize| part(i).parse::<u32>().ok();
            let ymd = match order {
                Order::DayMonthYear => (number(3), number(2), number(1)),
                Order::YearMonthDay => (number(1), number(2), number(3)),
                Order::DayNameYear => (number(3), patterns::month_number(part(2)), number(1)),
                Order::NameDayYear => (number(3), patterns::month_number(part(1)), number(2)),
            };
            let (Some(year), Some(month), Some(day)) = ymd else {
                continue;
            };
            let year = (if year < 100 { 2000 + year } else { year }) as i32;
            if !YEARS.contains(&year) {
                continue;
            }
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                dates.insert(date);
            }
        }
    }
    dates
}

/// Compare a file name date with the dates found in its document. Returns the
/// verdict with the closest content date and its distance in days.
pub fn compare(
    file_date: NaiveDate,
    dates: &BTreeSet<NaiveDate>,
    tolerance_days: i64,
) -> (Verdict, Option<NaiveDate>, Option<i64>) {
    let Some(closest) = dates
        .iter()
        .min_by_key(|date| (**date - file_date).num_days().abs())
        .copied()
    else {
        return (Verdict::NoDates, None, None);
    };
    let days = (closest - file_date).num_days().abs();
    let verdict = match days {
        0 => Verdict::Exact,
        d if d <= tolerance_days => Verdict::Close,
        _ => Verdict::Mismatch,
    };
    (verdict, Some(closest), Some(days))
}

/// Check one dated document
pub fn check_document(
    document: &Receipt,
    tolerance_days: i64,
    extractor: &impl TextExtractor,
) -> DateCheck {
    let mut check = DateCheck {
        path: document.path.clone(),
        file_name: document.file_name.clone(),
        file_date: document.date,
        verdict: Verdict::Undated,
        closest: None,
        days_off: None,
        content_dates: Vec::new(),
    };
    let Some(file_date) = document.date else {
        return check;
    };

    let text = match extractor.extract_text(&document.path) {
        Ok(text) => text,
        Err(err) => {
            log::warn!("{}: {err}", document.path.display());
            check.verdict = Verdict::Unreadable;
            return check;
        }
    };
    if text.trim().len() < MIN_TEXT_LEN {
        check.verdict = Verdict::NoText;
        return check;
    }

    let dates = content_dates(&text);
    (check.verdict, check.closest, check.days_off) = compare(file_date, &dates, tolerance_days);
    check.content_dates = dates.into_iter().collect();
    check
}

/// Check every document under `dir`, worst first: mismatches by distance, then
/// close matches, then the rest in file name order.
pub fn verify_documents(
    dir: &Path,
    extensions: &[String],
    tolerance_days: i64,
    extractor: &impl TextExtractor,
) -> std::io::Result<Vec<DateCheck>> {
    let documents = load_documents(dir, extensions)?;
    log::info!("checking {} documents in {}", documents.len(), dir.display());

    let mut checks: Vec<DateCheck> = documents
        .iter()
        .map(|document| check_document(document, tolerance_days, extractor))
        .collect();
    checks.sort_by_key(|check| (check.verdict, std::cmp::Reverse(check.days_off)));
    Ok(checks)
}
