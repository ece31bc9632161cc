pub mod ccs;
pub mod division_293;
pub mod help;
pub mod income;
pub mod medicare;
pub mod summary;
pub mod surcharge;
pub mod tables;

pub use ccs::{ccs_threshold, CcsResult, CcsStatus};
pub use division_293::{division_293, Division293Input, Division293Result};
pub use help::{help_repayment, HelpResult};
pub use income::{income_tax, IncomeTaxResult};
pub use medicare::{medicare_levy, MedicareLevyResult};
pub use summary::{summary, SummaryInput, TaxSummary};
pub use surcharge::{medicare_levy_surcharge, SurchargeInput, SurchargeResult};
pub use tables::{Bracket, TableError, TaxTables, Tier};

use rust_decimal::Decimal;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TaxError {
    #[error("{field} cannot be negative: {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
    #[error("no bracket or tier applies to income {0}")]
    NoMatchingBracket(Decimal),
}

pub(crate) fn ensure_non_negative(field: &'static str, value: Decimal) -> Result<(), TaxError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(TaxError::NegativeAmount { field, value });
    }
    Ok(())
}

/// First tier whose upper bound covers the income, with its position
pub(crate) fn find_tier(tiers: &[Tier], income: Decimal) -> Result<(usize, &Tier), TaxError> {
    tiers
        .iter()
        .enumerate()
        .find(|(_, tier)| tier.covers(income))
        .ok_or(TaxError::NoMatchingBracket(income))
}
