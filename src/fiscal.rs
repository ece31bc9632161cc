use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Australian fiscal year (runs 1 July to 30 June)
/// The year value represents the end year (e.g., 2025 = FY2024-25)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct FiscalYear(pub i32);

impl FiscalYear {
    /// 1 July of the previous calendar year
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.0 - 1, 7, 1).unwrap_or(NaiveDate::MIN)
    }

    /// 30 June
    pub fn end_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.0, 6, 30).unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date() <= date && date <= self.end_date()
    }

    /// Display as "FY2024-25"
    pub fn display(&self) -> String {
        format!("FY{}-{:02}", self.0 - 1, self.0 % 100)
    }
}

impl Default for FiscalYear {
    fn default() -> Self {
        FiscalYear(2025)
    }
}

impl std::fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
