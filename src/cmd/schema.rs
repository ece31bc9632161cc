//! Schema command - print expected input formats

use crate::config::Config;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, defaults or csv-header
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the configuration file
    JsonSchema,
    /// The built-in configuration, a starting point for a config file
    Defaults,
    /// Header row of `extract --csv` output
    CsvHeader,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(Config);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::Defaults => {
                println!("{}", serde_json::to_string_pretty(&Config::default())?);
            }
            SchemaFormat::CsvHeader => println!("{}", CSV_COLUMNS.join(",")),
        }
        Ok(())
    }
}

const CSV_COLUMNS: &[&str] = &[
    "date",
    "card_or_account",
    "description",
    "amount",
    "balance",
    "category",
    "owner",
    "deductible",
    "flags",
    "source",
    "id",
];
