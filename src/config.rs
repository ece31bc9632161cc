use crate::classify::ClassifyConfig;
use crate::fiscal::FiscalYear;
use crate::receipts::ReceiptConfig;
use crate::statement::StatementConfig;
use crate::subscriptions::SubscriptionConfig;
use crate::tax::{TableError, TaxTables};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid tax tables")]
    Tables(#[from] TableError),
    #[error("category {category}: work use {percent}% is outside 0 to 100")]
    WorkUsePercent { category: String, percent: Decimal },
    #[error("{field} cannot be negative")]
    Negative { field: &'static str },
}

/// Everything that varies between households and fiscal years.
///
/// Every section is optional in the file; missing values take the FY2024-25
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Transactions dated outside this fiscal year are dropped
    pub fiscal_year: FiscalYear,
    pub statement: StatementConfig,
    pub classify: ClassifyConfig,
    pub receipts: ReceiptConfig,
    pub subscriptions: SubscriptionConfig,
    pub tax: TaxTables,
}

impl Config {
    /// Read and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` when given, otherwise the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tax.validate()?;
        for category in &self.classify.categories {
            let percent = category.work_use_percent;
            if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
                return Err(ConfigError::WorkUsePercent {
                    category: category.name.clone(),
                    percent,
                });
            }
        }
        let percent = self.subscriptions.work_use_percent;
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(ConfigError::WorkUsePercent {
                category: "subscriptions".to_string(),
                percent,
            });
        }
        if self.classify.high_value_threshold.is_sign_negative() {
            return Err(ConfigError::Negative {
                field: "high value threshold",
            });
        }
        if self.receipts.tolerance_days < 0 {
            return Err(ConfigError::Negative {
                field: "receipt date tolerance",
            });
        }
        Ok(())
    }
}
