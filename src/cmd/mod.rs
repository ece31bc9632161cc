pub mod deductions;
pub mod extract;
pub mod receipts;
pub mod schema;
pub mod subscriptions;
pub mod tax;
pub mod verify;

use crate::classify::Classified;
use crate::config::Config;
use crate::extract::{extract_statements, ExtractOptions, FileExtractor};
use crate::statement::{patterns, Layout, StatementAnchor};
use clap::Args;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

/// Statement files to read, shared by every command that reads statements
#[derive(Args, Debug)]
pub struct StatementArgs {
    /// Statement PDFs or pre-extracted text files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Printed layout of the statements
    #[arg(short, long, value_enum, default_value_t)]
    layout: Layout,

    /// Statement month for account layouts (e.g. 2024-07), instead of the file name
    #[arg(long, value_parser = parse_statement_month)]
    statement_month: Option<StatementAnchor>,
}

impl StatementArgs {
    /// Parse, deduplicate and classify every file. Files that fail are reported
    /// on stderr; it is an error only when none could be read.
    pub fn classified(&self, config: &Config) -> anyhow::Result<Vec<Classified>> {
        let options = ExtractOptions {
            layout: self.layout,
            anchor: self.statement_month,
        };
        let extraction = extract_statements(&self.files, options, config, &FileExtractor);

        for failure in &extraction.failures {
            eprintln!("warning: {}", error_chain(failure));
        }
        if extraction.files_read == 0 {
            anyhow::bail!("none of the {} statement files could be read", self.files.len());
        }

        Ok(extraction
            .transactions
            .into_iter()
            .map(|tx| config.classify.classify(tx))
            .collect())
    }
}

fn parse_statement_month(value: &str) -> Result<StatementAnchor, String> {
    let (year, month) = value
        .split_once('-')
        .ok_or_else(|| format!("expected YYYY-MM or YYYY-Mon, got {value}"))?;
    let year = year
        .parse()
        .map_err(|_| format!("invalid year in {value}"))?;
    let month = match month.parse::<u32>() {
        Ok(month @ 1..=12) => month,
        Ok(_) => return Err(format!("invalid month in {value}")),
        Err(_) => patterns::month_number(month).ok_or_else(|| format!("invalid month in {value}"))?,
    };
    Ok(StatementAnchor::new(year, month))
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    message
}

pub(crate) fn print_table<T: Tabled>(rows: &[T]) {
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

pub(crate) fn write_csv<T: Serialize>(rows: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_month_forms() {
        assert_eq!(
            parse_statement_month("2024-07"),
            Ok(StatementAnchor::new(2024, 7))
        );
        assert_eq!(
            parse_statement_month("2024-Dec"),
            Ok(StatementAnchor::new(2024, 12))
        );
        assert!(parse_statement_month("2024-13").is_err());
        assert!(parse_statement_month("July").is_err());
    }
}
