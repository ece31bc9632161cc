//! Receipts command - which deductions have a receipt on file

use super::{print_json, print_table, write_csv, StatementArgs};
use crate::config::Config;
use crate::money::format_aud;
use crate::receipts::{cross_reference, load_receipts, ReceiptMatch};
use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct ReceiptsCommand {
    #[command(flatten)]
    statements: StatementArgs,

    /// Directory of receipt files named with a YYMMDD prefix
    #[arg(short, long)]
    receipts: PathBuf,

    /// Only list deductions without a receipt
    #[arg(long)]
    missing: bool,

    /// Output as CSV instead of a formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of a formatted table
    #[arg(long)]
    json: bool,
}

impl ReceiptsCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let receipts = load_receipts(&self.receipts, &config.receipts)
            .with_context(|| format!("Failed to read receipts from {}", self.receipts.display()))?;
        let items = self.statements.classified(config)?;

        let matches: Vec<ReceiptMatch> = cross_reference(&items, &receipts, &config.receipts)
            .into_iter()
            .filter(|m| !self.missing || m.receipt.is_none())
            .collect();

        if self.json {
            return print_json(&matches);
        }

        let rows: Vec<ReceiptRow> = matches.iter().map(ReceiptRow::from).collect();
        if self.csv {
            return write_csv(&rows);
        }

        if rows.is_empty() {
            println!("No deductible transactions found");
            return Ok(());
        }
        print_table(&rows);

        let matched = matches.iter().filter(|m| m.receipt.is_some()).count();
        println!("Matched: {}/{} deductions", matched, matches.len());
        println!("Need receipts: {}", matches.len() - matched);
        Ok(())
    }
}

#[derive(Debug, Tabled, serde::Serialize)]
struct ReceiptRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Receipt")]
    receipt: String,
}

impl From<&ReceiptMatch<'_>> for ReceiptRow {
    fn from(m: &ReceiptMatch<'_>) -> Self {
        let tx = &m.item.transaction;
        ReceiptRow {
            date: tx.date.format("%Y-%m-%d").to_string(),
            description: tx.description.clone(),
            amount: format_aud(tx.amount),
            owner: m.item.owner.clone(),
            category: m.item.category.clone(),
            receipt: m
                .receipt
                .map(|r| r.file_name.clone())
                .unwrap_or_else(|| "No receipt".to_string()),
        }
    }
}
