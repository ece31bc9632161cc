//! Annual subscription totals from a folder of invoices.
//!
//! Streaming and software subscriptions are often paid from a personal card
//! and claimed at a flat work-use share. Each invoice file is assigned to a
//! service by a keyword in its name, and its amount is read from the first page.

use crate::extract::TextExtractor;
use crate::money::{parse_amount, round_half_up};
use crate::receipts::load_documents;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Service {
    pub name: String,
    /// Lower case fragments of invoice file names for this service
    pub keywords: Vec<String>,
}

impl Service {
    fn new(name: &str, keywords: &[&str]) -> Self {
        Service {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SubscriptionConfig {
    /// Share of the annual total claimed as a deduction, 0 to 100
    #[schemars(with = "f64")]
    pub work_use_percent: Decimal,
    pub services: Vec<Service>,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        SubscriptionConfig {
            work_use_percent: dec!(30),
            services: vec![
                Service::new("Paramount Plus", &["paramount"]),
                Service::new("Hayu", &["hayu"]),
                Service::new("YouTube Premium", &["youtube"]),
                Service::new("Audible", &["audible"]),
                Service::new("Cleanup Pro", &["cleanup"]),
            ],
        }
    }
}

impl SubscriptionConfig {
    /// First service with a keyword in `file_name`
    pub fn service_for(&self, file_name: &str) -> Option<&Service> {
        let name = file_name.to_lowercase();
        self.services.iter().find(|service| {
            service
                .keywords
                .iter()
                .any(|keyword| name.contains(&keyword.to_lowercase()))
        })
    }
}

fn total_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bTOTAL[:\s]*(?:AUD|\$)\s?(\d[\d,]*(?:\.\d{1,2})?)").expect("total regex")
    })
}

fn any_amount() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:AUD|\$)\s?(\d[\d,]*(?:\.\d{1,2})?)").expect("amount regex"))
}

/// The amount charged by an invoice: the `TOTAL` line when there is one,
/// otherwise the largest amount over one dollar so GST lines are passed over.
pub fn invoice_amount(text: &str) -> Option<Decimal> {
    if let Some(amount) = total_line()
        .captures(text)
        .and_then(|caps| parse_amount(&caps[1]))
    {
        return Some(amount);
    }
    any_amount()
        .captures_iter(text)
        .filter_map(|caps| parse_amount(&caps[1]))
        .filter(|amount| *amount > Decimal::ONE)
        .max()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    pub file_name: String,
    pub service: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceTotal {
    pub service: String,
    pub invoices: usize,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionReport {
    pub invoices: Vec<Invoice>,
    /// Services in configured order, only those with an invoice
    pub services: Vec<ServiceTotal>,
    pub annual_total: Decimal,
    pub work_use_percent: Decimal,
    pub deduction: Decimal,
    /// Service invoices that could not be read or show no amount
    pub skipped: Vec<String>,
}

/// Total every service invoice under `dir`. Files matching no service are ignored.
pub fn tally_subscriptions(
    dir: &Path,
    extensions: &[String],
    config: &SubscriptionConfig,
    work_use_percent: Decimal,
    extractor: &impl TextExtractor,
) -> std::io::Result<SubscriptionReport> {
    let documents = load_documents(dir, extensions)?;
    let mut invoices = Vec::new();
    let mut skipped = Vec::new();

    for document in &documents {
        let Some(service) = config.service_for(&document.file_name) else {
            log::debug!("{}: no subscription service", document.file_name);
            continue;
        };
        let amount = match extractor.extract_pages(&document.path) {
            Ok(pages) => pages.first().and_then(|page| invoice_amount(page)),
            Err(err) => {
                log::warn!("{err}");
                None
            }
        };
        match amount {
            Some(amount) => invoices.push(Invoice {
                file_name: document.file_name.clone(),
                service: service.name.clone(),
                amount,
            }),
            None => skipped.push(document.file_name.clone()),
        }
    }

    let services: Vec<ServiceTotal> = config
        .services
        .iter()
        .filter_map(|service| {
            let matched: Vec<&Invoice> = invoices
                .iter()
                .filter(|invoice| invoice.service == service.name)
                .collect();
            (!matched.is_empty()).then(|| ServiceTotal {
                service: service.name.clone(),
                invoices: matched.len(),
                total: matched.iter().map(|invoice| invoice.amount).sum(),
            })
        })
        .collect();
    let annual_total: Decimal = services.iter().map(|s| s.total).sum();
    log::info!(
        "{} subscription invoices, {} skipped",
        invoices.len(),
        skipped.len()
    );

    Ok(SubscriptionReport {
        invoices,
        services,
        annual_total,
        work_use_percent,
        deduction: round_half_up(annual_total * work_use_percent / Decimal::ONE_HUNDRED),
        skipped,
    })
}
