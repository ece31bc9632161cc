//! Statement line parsing.
//!
//! Extracted statement text arrives as pages of lines. Each layout scans a
//! page with a cursor, accepting well-formed groups as [`Transaction`]s and
//! silently stepping past anything else. Groups never span a page break.

pub mod account;
pub mod card;
pub mod patterns;

pub use account::{AccountStatementParser, StatementAnchor};
pub use card::CardStatementParser;

use chrono::NaiveDate;
use clap::ValueEnum;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

/// Printed layout of a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Per file: account when the text has `Account:` sections, otherwise card
    #[default]
    Auto,
    /// Credit card statements: six-line groups with `DD/MM/YYYY` dates
    Card,
    /// Bank account statements: `D Mon` dates under `Account:` sections
    Account,
}

impl Layout {
    /// Resolve [`Layout::Auto`] from the text of a statement
    pub fn detect<S: AsRef<str>>(self, pages: &[Vec<S>]) -> Layout {
        match self {
            Layout::Auto => {
                let has_accounts = pages
                    .iter()
                    .flatten()
                    .any(|line| patterns::account_marker(line.as_ref()).is_some());
                if has_accounts {
                    Layout::Account
                } else {
                    Layout::Card
                }
            }
            layout => layout,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ForeignAmount {
    #[schemars(with = "f64")]
    pub amount: Decimal,
    pub currency: String,
}

/// One statement line item. Amount and balance are the magnitudes as printed;
/// direction is inferred from the description by [`crate::classify::direction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date_processed: NaiveDate,
    pub date: NaiveDate,
    pub card: Option<String>,
    pub account: Option<String>,
    pub description: String,
    pub amount: Decimal,
    pub balance: Decimal,
    pub foreign: Option<ForeignAmount>,
    pub source: String,
}

impl Transaction {
    /// Key under which overlapping statement exports are considered the same line
    pub fn dedupe_key(&self) -> (NaiveDate, String, Decimal) {
        (self.date, self.description.clone(), self.amount)
    }
}

/// Stable record id derived from where and what the line was
pub(crate) fn make_id(source: &str, date: NaiveDate, description: &str, amount: Decimal) -> String {
    let key = format!(
        "{}|{}|{}|{}",
        source,
        date.format("%Y-%m-%d"),
        description.trim(),
        amount.normalize()
    );
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let hash = hasher.finalize();
    hex::encode(&hash[..8])
}

/// Parser settings shared by both layouts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StatementConfig {
    /// Column headings repeated on every page, never descriptions
    pub header_rows: Vec<String>,
    /// Descriptions containing any of these are summary rows, not transactions
    pub skip_markers: Vec<String>,
    /// Currency codes recognised in `amount CODE` annotations
    pub foreign_currencies: Vec<String>,
}

impl Default for StatementConfig {
    fn default() -> Self {
        StatementConfig {
            header_rows: ["Transaction Details", "Amount ($A)", "Balance"]
                .map(String::from)
                .to_vec(),
            skip_markers: vec!["INCL OVERSEAS".to_string()],
            foreign_currencies: ["USD", "EUR", "GBP", "NZD"].map(String::from).to_vec(),
        }
    }
}

/// Trimmed, non-empty lines of one page of extracted text
pub fn text_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Drop repeated lines from overlapping exports, keeping the first occurrence.
pub fn dedupe(transactions: impl IntoIterator<Item = Transaction>) -> Vec<Transaction> {
    let mut seen = HashSet::new();
    transactions
        .into_iter()
        .filter(|tx| seen.insert(tx.dedupe_key()))
        .collect()
}
