//! Verify command - compare YYMMDD file name dates with the dates inside documents

use super::{print_json, print_table};
use crate::config::Config;
use crate::extract::FileExtractor;
use crate::verify::{verify_documents, DateCheck, Verdict};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct VerifyCommand {
    /// Directory of dated receipts and invoices
    dir: PathBuf,

    /// Days either side of the file date still counted as close
    #[arg(short, long)]
    tolerance: Option<i64>,

    /// Output every check as JSON
    #[arg(long)]
    json: bool,
}

impl VerifyCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let tolerance = self.tolerance.unwrap_or(config.receipts.tolerance_days);
        if tolerance < 0 {
            anyhow::bail!("tolerance cannot be negative");
        }
        let extensions = ["pdf", "txt"].map(String::from);
        let checks = verify_documents(&self.dir, &extensions, tolerance, &FileExtractor)
            .with_context(|| format!("Failed to read documents from {}", self.dir.display()))?;

        if self.json {
            return print_json(&checks);
        }

        let count = |verdict: Verdict| checks.iter().filter(|c| c.verdict == verdict).count();
        println!("DOCUMENT DATES ({} files)", checks.len());
        println!("  Exact:      {}", count(Verdict::Exact));
        println!("  Close:      {} (within {tolerance} days)", count(Verdict::Close));
        println!("  Mismatch:   {}", count(Verdict::Mismatch));
        println!("  No dates:   {}", count(Verdict::NoDates));
        println!(
            "  Unreadable: {}",
            count(Verdict::NoText) + count(Verdict::Unreadable)
        );
        println!("  Undated:    {}", count(Verdict::Undated));

        let rows: Vec<CheckRow> = checks
            .iter()
            .filter(|c| matches!(c.verdict, Verdict::Mismatch | Verdict::Close | Verdict::NoDates))
            .map(CheckRow::from)
            .collect();
        if rows.is_empty() {
            println!("Every dated document agrees with its file name");
            return Ok(());
        }
        println!();
        print_table(&rows);
        Ok(())
    }
}

#[derive(Debug, Tabled)]
struct CheckRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "File date")]
    file_date: String,
    #[tabled(rename = "Closest in document")]
    closest: String,
    #[tabled(rename = "Days")]
    days: String,
    #[tabled(rename = "Result")]
    verdict: String,
}

impl From<&DateCheck> for CheckRow {
    fn from(check: &DateCheck) -> Self {
        let date = |d: Option<chrono::NaiveDate>| {
            d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
        };
        CheckRow {
            file: check.file_name.clone(),
            file_date: date(check.file_date),
            closest: date(check.closest),
            days: check.days_off.map(|d| d.to_string()).unwrap_or_default(),
            verdict: check.verdict.to_string(),
        }
    }
}
