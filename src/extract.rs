//! Turning statement files into transactions.
//!
//! Files are read in name order, each through the layout parser, and the
//! combined records deduplicated. A file that cannot be read is reported and
//! skipped; it never stops the batch.

use crate::config::Config;
use crate::statement::{
    self, AccountStatementParser, CardStatementParser, Layout, StatementAnchor, Transaction,
};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to extract text from {path}: {message}")]
    Pdf { path: PathBuf, message: String },
    #[error("{path}: no statement month in the file name, expected `eStatement - <Month> <YYYY>`")]
    MissingAnchor { path: PathBuf },
}

/// Source of the raw text of a document, one string per page
pub trait TextExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, ExtractError>;

    fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
        Ok(self.extract_pages(path)?.join("\n"))
    }
}

/// Reads `.pdf` files with `pdf-extract` and anything else as plain text, where a
/// form feed separates pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileExtractor;

impl TextExtractor for FileExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, ExtractError> {
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            pdf_extract::extract_text_by_pages(path).map_err(|err| ExtractError::Pdf {
                path: path.to_path_buf(),
                message: err.to_string(),
            })
        } else {
            let text = std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(split_pages(&text))
        }
    }
}

/// Pages of a plain text export, split at form feeds
pub fn split_pages(text: &str) -> Vec<String> {
    text.split('\u{c}').map(String::from).collect()
}

/// What to parse and how
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    pub layout: Layout,
    /// Statement month for account layouts, instead of reading it from each file name
    pub anchor: Option<StatementAnchor>,
}

#[derive(Debug, Default)]
pub struct Extraction {
    /// Deduplicated, in file order then statement order
    pub transactions: Vec<Transaction>,
    pub files_read: usize,
    pub failures: Vec<ExtractError>,
    /// Records dropped as repeats of an earlier file
    pub duplicates: usize,
}

pub fn extract_statements(
    paths: &[PathBuf],
    options: ExtractOptions,
    config: &Config,
    extractor: &impl TextExtractor,
) -> Extraction {
    let mut paths = paths.to_vec();
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));

    let mut extraction = Extraction::default();
    let mut all = Vec::new();
    for path in &paths {
        match extract_file(path, options, config, extractor) {
            Ok(transactions) => {
                log::info!(
                    "{}: {} transactions",
                    path.display(),
                    transactions.len()
                );
                extraction.files_read += 1;
                all.extend(transactions);
            }
            Err(err) => {
                log::warn!("skipping {}: {err}", path.display());
                extraction.failures.push(err);
            }
        }
    }

    let total = all.len();
    extraction.transactions = statement::dedupe(all);
    extraction.duplicates = total - extraction.transactions.len();
    if extraction.duplicates > 0 {
        log::info!("dropped {} duplicate transactions", extraction.duplicates);
    }
    extraction
}

/// Transactions from a single statement file
pub fn extract_file(
    path: &Path,
    options: ExtractOptions,
    config: &Config,
    extractor: &impl TextExtractor,
) -> Result<Vec<Transaction>, ExtractError> {
    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let pages: Vec<Vec<String>> = extractor
        .extract_pages(path)?
        .iter()
        .map(String::as_str)
        .map(statement::text_lines)
        .collect();
    let layout = options.layout.detect(&pages);
    log::debug!("{source}: {} pages, {layout:?} layout", pages.len());

    let pages = pages.iter().map(Vec::as_slice);
    let transactions = match layout {
        Layout::Account => {
            let anchor = options
                .anchor
                .or_else(|| StatementAnchor::from_source_name(&source))
                .ok_or_else(|| ExtractError::MissingAnchor {
                    path: path.to_path_buf(),
                })?;
            AccountStatementParser::new(&config.statement, config.fiscal_year, anchor)
                .parse_pages(pages, &source)
        }
        Layout::Card | Layout::Auto => {
            CardStatementParser::new(&config.statement, config.fiscal_year)
                .parse_pages(pages, &source)
        }
    };
    Ok(transactions)
}
