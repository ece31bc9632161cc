//! Cross-referencing deductible transactions with receipt files.
//!
//! Receipts are kept as files named with a `YYMMDD` date prefix, optionally
//! grouped into one sub-directory per owner:
//!
//! ```text
//! receipts/
//!   alex/240815 officeworks monitor.pdf
//!   sam/241002 audible.png
//! ```

use crate::classify::Classified;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DATE_POINTS: i64 = 10;
const KEYWORD_POINTS: i64 = 50;

/// Receipt search keywords for a merchant found in a description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MerchantKeywords {
    pub merchant: String,
    pub keywords: Vec<String>,
}

impl MerchantKeywords {
    fn new(merchant: &str, keywords: &[&str]) -> Self {
        MerchantKeywords {
            merchant: merchant.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReceiptConfig {
    /// Receipts dated up to this many days either side of a transaction can match
    pub tolerance_days: i64,
    /// Scores below this are not a match
    pub min_score: i64,
    /// File extensions considered receipts, lower case
    pub extensions: Vec<String>,
    pub merchants: Vec<MerchantKeywords>,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        ReceiptConfig {
            tolerance_days: 7,
            min_score: 10,
            extensions: ["pdf", "png", "jpg", "jpeg"].map(String::from).to_vec(),
            merchants: vec![
                MerchantKeywords::new("officeworks", &["officeworks"]),
                MerchantKeywords::new("replit", &["replit"]),
                MerchantKeywords::new("openai", &["openai", "chatgpt"]),
                MerchantKeywords::new("unicef", &["unicef"]),
                MerchantKeywords::new("aussie broadband", &["aussie broadband", "internet"]),
                MerchantKeywords::new("netflix", &["netflix"]),
                MerchantKeywords::new("disney", &["disney"]),
                MerchantKeywords::new("audible", &["audible"]),
                MerchantKeywords::new("hayu", &["hayu"]),
                MerchantKeywords::new("paramount", &["paramount"]),
                MerchantKeywords::new("amazon", &["amazon"]),
                MerchantKeywords::new("1password", &["1password"]),
                MerchantKeywords::new("apple", &["apple"]),
                MerchantKeywords::new("spotify", &["spotify"]),
            ],
        }
    }
}

impl ReceiptConfig {
    /// Receipt keywords for every known merchant in the description
    pub fn merchant_keywords(&self, description: &str) -> Vec<&str> {
        let description = description.to_lowercase();
        self.merchants
            .iter()
            .filter(|m| description.contains(&m.merchant.to_lowercase()))
            .flat_map(|m| m.keywords.iter().map(String::as_str))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub path: PathBuf,
    pub file_name: String,
    pub date: Option<NaiveDate>,
    /// Name of the owner directory the receipt was filed under
    pub owner: Option<String>,
}

impl Receipt {
    pub fn new(path: PathBuf, owner: Option<String>) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Receipt {
            date: receipt_date(&file_name),
            file_name,
            path,
            owner,
        }
    }

    /// How well this receipt fits a transaction on `date` from a merchant with `keywords`
    pub fn score(&self, date: NaiveDate, keywords: &[&str], tolerance_days: i64) -> i64 {
        let mut score = 0;
        if let Some(receipt_date) = self.date {
            let days = (date - receipt_date).num_days().abs();
            if days <= tolerance_days {
                score += (tolerance_days - days + 1) * DATE_POINTS;
            }
        }
        let name = self.file_name.to_lowercase();
        score += keywords
            .iter()
            .filter(|keyword| name.contains(&keyword.to_lowercase()))
            .count() as i64
            * KEYWORD_POINTS;
        score
    }
}

/// Date from a `YYMMDD` file name prefix
pub fn receipt_date(file_name: &str) -> Option<NaiveDate> {
    let prefix = file_name.get(..6)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(prefix, "%y%m%d").ok()
}

/// Receipt files under `dir`, sorted by file name. Files directly in `dir` have no
/// owner; files in a sub-directory belong to the owner it is named after.
pub fn load_receipts(dir: &Path, config: &ReceiptConfig) -> std::io::Result<Vec<Receipt>> {
    let receipts = load_documents(dir, &config.extensions)?;
    log::info!("found {} receipts in {}", receipts.len(), dir.display());
    Ok(receipts)
}

/// Files under `dir` with one of `extensions`, filed the same way as receipts
pub fn load_documents(dir: &Path, extensions: &[String]) -> std::io::Result<Vec<Receipt>> {
    let mut documents = Vec::new();
    collect_documents(dir, None, extensions, &mut documents)?;
    documents.sort_by(|a, b| (&a.file_name, &a.path).cmp(&(&b.file_name, &b.path)));
    Ok(documents)
}

fn collect_documents(
    dir: &Path,
    owner: Option<&str>,
    extensions: &[String],
    documents: &mut Vec<Receipt>,
) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            let sub_owner = match owner {
                Some(owner) => owner.to_string(),
                None => path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            };
            collect_documents(&path, Some(&sub_owner), extensions, documents)?;
        } else if has_extension(&path, extensions) {
            documents.push(Receipt::new(path, owner.map(String::from)));
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
}

/// Best-scoring receipt at or above the minimum score; the first wins a tie.
pub fn find_match<'a>(
    date: NaiveDate,
    description: &str,
    receipts: impl IntoIterator<Item = &'a Receipt>,
    config: &ReceiptConfig,
) -> Option<&'a Receipt> {
    let keywords = config.merchant_keywords(description);
    let mut best: Option<(&Receipt, i64)> = None;
    for receipt in receipts {
        let score = receipt.score(date, &keywords, config.tolerance_days);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((receipt, score));
        }
    }
    best.filter(|(_, score)| *score >= config.min_score)
        .map(|(receipt, _)| receipt)
}

/// A deductible expense and the receipt found for it, if any
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptMatch<'a> {
    pub item: &'a Classified,
    pub receipt: Option<&'a Receipt>,
}

/// Match every deduction, searching the owner's own receipts before the rest.
pub fn cross_reference<'a>(
    items: &'a [Classified],
    receipts: &'a [Receipt],
    config: &ReceiptConfig,
) -> Vec<ReceiptMatch<'a>> {
    items
        .iter()
        .filter(|item| item.is_deduction())
        .map(|item| {
            let tx = &item.transaction;
            let owned = |r: &&Receipt| r.owner.as_deref() == Some(item.owner.as_str());
            let receipt = find_match(tx.date, &tx.description, receipts.iter().filter(owned), config)
                .or_else(|| {
                    find_match(
                        tx.date,
                        &tx.description,
                        receipts.iter().filter(|r| !owned(r)),
                        config,
                    )
                });
            ReceiptMatch { item, receipt }
        })
        .collect()
}
