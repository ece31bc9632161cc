//! Deductions command - claimable totals by owner and category

use super::{print_json, print_table, StatementArgs};
use crate::classify::{deduction_summary, unclassified_expenses, Classified, DeductionSummary};
use crate::config::Config;
use crate::money::{format_aud, round_half_up};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

/// Longest list of uncategorised spending printed in the report
const REVIEW_LIMIT: usize = 20;

#[derive(Args, Debug)]
pub struct DeductionsCommand {
    #[command(flatten)]
    statements: StatementArgs,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    json: bool,
}

impl DeductionsCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let items = self.statements.classified(config)?;
        let summary = deduction_summary(&items);
        let review: Vec<&Classified> = items
            .iter()
            .filter(|item| item.is_deduction() && item.high_value)
            .collect();
        let unclassified = unclassified_expenses(&items, config.classify.review_threshold);

        if self.json {
            self.print_json(&summary, &review, &unclassified, config)
        } else {
            self.print_report(&summary, &review, config);
            print_unclassified(&unclassified, config);
            Ok(())
        }
    }

    fn print_report(&self, summary: &DeductionSummary, review: &[&Classified], config: &Config) {
        println!();
        println!("DEDUCTIONS ({})", config.fiscal_year);
        println!();

        if summary.total.count == 0 {
            println!("No deductible transactions found");
            return;
        }

        let rows: Vec<CategoryRow> = summary
            .by_owner_category
            .iter()
            .map(|((owner, category), totals)| CategoryRow {
                owner: owner.clone(),
                category: category.clone(),
                count: totals.count,
                gross: format_aud(totals.gross),
                work_use: work_use_label(config, category),
                deductible: format_aud(totals.deductible),
            })
            .collect();
        print_table(&rows);
        println!();

        println!("BY OWNER");
        for (owner, totals) in &summary.by_owner {
            println!(
                "  {}: {} (from {} gross)",
                owner,
                format_aud(totals.deductible),
                format_aud(totals.gross)
            );
        }
        println!(
            "  TOTAL: {} from {} transactions",
            format_aud(summary.total.deductible),
            summary.total.count
        );
        println!();

        if !review.is_empty() {
            println!(
                "HIGH-VALUE ITEMS (at least {}) - VERIFY RECEIPTS",
                format_aud(config.classify.high_value_threshold)
            );
            for item in review {
                println!(
                    "  {} {:<40} {:>12}",
                    item.transaction.date,
                    item.transaction.description,
                    format_aud(item.transaction.amount)
                );
            }
            println!();
        }
    }

    fn print_json(
        &self,
        summary: &DeductionSummary,
        review: &[&Classified],
        unclassified: &[&Classified],
        config: &Config,
    ) -> anyhow::Result<()> {
        let output = DeductionsOutput {
            fiscal_year: config.fiscal_year.display(),
            categories: summary
                .by_owner_category
                .iter()
                .map(|((owner, category), totals)| CategoryTotals {
                    owner: owner.clone(),
                    category: category.clone(),
                    count: totals.count,
                    gross: round_half_up(totals.gross),
                    deductible: round_half_up(totals.deductible),
                })
                .collect(),
            total_gross: round_half_up(summary.total.gross),
            total_deductible: round_half_up(summary.total.deductible),
            high_value: review.to_vec(),
            unclassified: unclassified.to_vec(),
        };
        print_json(&output)
    }
}

fn print_unclassified(unclassified: &[&Classified], config: &Config) {
    if unclassified.is_empty() {
        return;
    }
    println!(
        "UNCLASSIFIED EXPENSES (at least {}) - {} to review",
        format_aud(config.classify.review_threshold),
        unclassified.len()
    );
    for item in unclassified.iter().take(REVIEW_LIMIT) {
        println!(
            "  {} {:<40} {:>12}",
            item.transaction.date,
            item.transaction.description,
            format_aud(item.transaction.amount)
        );
    }
    if unclassified.len() > REVIEW_LIMIT {
        println!("  ... and {} more", unclassified.len() - REVIEW_LIMIT);
    }
    println!();
}

fn work_use_label(config: &Config, category: &str) -> String {
    config
        .classify
        .categories
        .iter()
        .find(|c| c.name == category)
        .map(|c| format!("{}%", c.work_use_percent.normalize()))
        .unwrap_or_default()
}

#[derive(Debug, Tabled)]
struct CategoryRow {
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Gross")]
    gross: String,
    #[tabled(rename = "Work %")]
    work_use: String,
    #[tabled(rename = "Deductible")]
    deductible: String,
}

#[derive(Debug, Serialize)]
struct DeductionsOutput<'a> {
    fiscal_year: String,
    categories: Vec<CategoryTotals>,
    total_gross: Decimal,
    total_deductible: Decimal,
    high_value: Vec<&'a Classified>,
    unclassified: Vec<&'a Classified>,
}

#[derive(Debug, Serialize)]
struct CategoryTotals {
    owner: String,
    category: String,
    count: usize,
    gross: Decimal,
    deductible: Decimal,
}
