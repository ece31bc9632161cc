use super::tables::CcsTables;
use super::{ensure_non_negative, TaxError};
use crate::money::format_dollars;
use rust_decimal::Decimal;
use serde::Serialize;

/// Where a family's combined income sits against the child care subsidy thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CcsStatus {
    Maximum,
    Reduced,
    AboveCutoff,
}

impl CcsStatus {
    pub fn label(self) -> &'static str {
        match self {
            CcsStatus::Maximum => "Maximum (85%+)",
            CcsStatus::Reduced => "Reduced (check actual rate)",
            CcsStatus::AboveCutoff => "0% or minimum",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CcsResult {
    pub combined_income: Decimal,
    pub cutoff: Decimal,
    pub status: CcsStatus,
    pub above_cutoff: bool,
    pub estimated_subsidy_rate: &'static str,
    pub notes: String,
}

/// Classify combined family income against the subsidy floor and cutoff
pub fn ccs_threshold(
    combined_income: Decimal,
    children_in_care: u32,
    tables: &CcsTables,
) -> Result<CcsResult, TaxError> {
    ensure_non_negative("combined income", combined_income)?;

    let cutoff = if children_in_care > 1 {
        tables.multi_child_cutoff
    } else {
        tables.standard_cutoff
    };
    let floor = tables.max_subsidy_threshold;

    let (status, notes) = if combined_income <= floor {
        (
            CcsStatus::Maximum,
            format!(
                "At or below {} - eligible for maximum CCS rate",
                format_dollars(floor)
            ),
        )
    } else if combined_income > cutoff {
        (
            CcsStatus::AboveCutoff,
            format!(
                "Above {} cutoff - may receive 0% CCS",
                format_dollars(cutoff)
            ),
        )
    } else {
        (
            CcsStatus::Reduced,
            format!(
                "Between {} and {} - CCS rate reduces with income",
                format_dollars(floor),
                format_dollars(cutoff)
            ),
        )
    };

    Ok(CcsResult {
        combined_income,
        cutoff,
        status,
        above_cutoff: status == CcsStatus::AboveCutoff,
        estimated_subsidy_rate: status.label(),
        notes,
    })
}
