//! Extract command - statement transactions with their classification

use super::{print_json, print_table, write_csv, StatementArgs};
use crate::classify::{CategoryKind, Classified};
use crate::config::Config;
use crate::money::format_aud;
use clap::Args;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct ExtractCommand {
    #[command(flatten)]
    statements: StatementArgs,

    /// Include personal and other excluded categories
    #[arg(long)]
    all_categories: bool,

    /// Output as CSV instead of a formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of a formatted table
    #[arg(long)]
    json: bool,
}

impl ExtractCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let items: Vec<Classified> = self
            .statements
            .classified(config)?
            .into_iter()
            .filter(|item| self.all_categories || item.kind != Some(CategoryKind::Excluded))
            .collect();

        if self.json {
            return print_json(&items);
        }

        let rows: Vec<TransactionRow> = items.iter().map(TransactionRow::from).collect();
        if self.csv {
            write_csv(&rows)
        } else {
            if rows.is_empty() {
                println!("No transactions found");
                return Ok(());
            }
            print_table(&rows);
            println!("{} transactions", rows.len());
            Ok(())
        }
    }
}

/// Row for the transactions table and CSV output
#[derive(Debug, Clone, Tabled, serde::Serialize)]
pub struct TransactionRow {
    #[tabled(rename = "Date")]
    date: String,

    #[tabled(rename = "Card/Account")]
    #[serde(rename = "card_or_account")]
    origin: String,

    #[tabled(rename = "Description")]
    description: String,

    #[tabled(rename = "Amount")]
    amount: String,

    #[tabled(rename = "Balance")]
    balance: String,

    #[tabled(rename = "Category")]
    category: String,

    #[tabled(rename = "Owner")]
    owner: String,

    #[tabled(rename = "Deductible")]
    deductible: String,

    #[tabled(rename = "Flags")]
    flags: String,

    #[tabled(skip)]
    source: String,

    #[tabled(skip)]
    id: String,
}

impl From<&Classified> for TransactionRow {
    fn from(item: &Classified) -> Self {
        let tx = &item.transaction;
        let mut flags = Vec::new();
        if let Some(foreign) = &tx.foreign {
            flags.push(format!("{} {}", foreign.amount, foreign.currency));
        } else if item.foreign {
            flags.push("FX".to_string());
        }
        if item.high_value {
            flags.push("REVIEW".to_string());
        }

        TransactionRow {
            date: tx.date.format("%Y-%m-%d").to_string(),
            origin: tx
                .card
                .clone()
                .or_else(|| tx.account.clone())
                .unwrap_or_default(),
            description: tx.description.clone(),
            amount: format!("{:.2}", item.signed_amount),
            balance: format!("{:.2}", tx.balance),
            category: item.category.clone(),
            owner: item.owner.clone(),
            deductible: if item.is_deduction() {
                format_aud(item.deductible_amount)
            } else {
                String::new()
            },
            flags: flags.join(" "),
            source: tx.source.clone(),
            id: tx.id.clone(),
        }
    }
}
