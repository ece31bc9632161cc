//! Subscriptions command - annual totals and the work-use share of service invoices

use super::{print_json, print_table};
use crate::config::Config;
use crate::extract::FileExtractor;
use crate::money::format_aud;
use crate::subscriptions::{tally_subscriptions, ServiceTotal};
use anyhow::Context;
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tabled::Tabled;

#[derive(Args, Debug)]
pub struct SubscriptionsCommand {
    /// Directory of invoices, one file per payment
    dir: PathBuf,

    /// Work-use percentage, instead of the configured one
    #[arg(short, long)]
    work_use: Option<Decimal>,

    /// Output as JSON instead of a formatted report
    #[arg(long)]
    json: bool,
}

impl SubscriptionsCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let work_use = self
            .work_use
            .unwrap_or(config.subscriptions.work_use_percent);
        if work_use < Decimal::ZERO || work_use > Decimal::ONE_HUNDRED {
            anyhow::bail!("work use {work_use}% is outside 0 to 100");
        }
        let extensions = ["pdf", "txt"].map(String::from);
        let report = tally_subscriptions(
            &self.dir,
            &extensions,
            &config.subscriptions,
            work_use,
            &FileExtractor,
        )
        .with_context(|| format!("Failed to read invoices from {}", self.dir.display()))?;

        if self.json {
            return print_json(&report);
        }

        if report.services.is_empty() {
            println!("No subscription invoices found in {}", self.dir.display());
        } else {
            println!("SUBSCRIPTIONS");
            let rows: Vec<ServiceRow> = report.services.iter().map(ServiceRow::from).collect();
            print_table(&rows);
            println!("Total annual cost: {}", format_aud(report.annual_total));
            println!(
                "{}% work use deduction: {}",
                report.work_use_percent.normalize(),
                format_aud(report.deduction)
            );
        }
        for file_name in &report.skipped {
            eprintln!("warning: no amount found in {file_name}");
        }
        Ok(())
    }
}

#[derive(Debug, Tabled)]
struct ServiceRow {
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Invoices")]
    invoices: usize,
    #[tabled(rename = "Total")]
    total: String,
}

impl From<&ServiceTotal> for ServiceRow {
    fn from(total: &ServiceTotal) -> Self {
        ServiceRow {
            service: total.service.clone(),
            invoices: total.invoices,
            total: format_aud(total.total),
        }
    }
}
