use super::tables::MedicareTables;
use super::{ensure_non_negative, TaxError};
use crate::money::format_dollars;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MedicareLevyResult {
    pub taxable_income: Decimal,
    pub levy: Decimal,
    /// Levy as a share of taxable income
    pub levy_rate: Decimal,
    pub reduction_applied: bool,
    pub notes: String,
}

/// Medicare levy with the low-income reduction band.
///
/// At or below the lower threshold no levy is payable. Inside the band the levy
/// is the reduction rate applied to income above the lower threshold, which
/// meets the flat rate at the upper threshold.
pub fn medicare_levy(
    income: Decimal,
    sapto_eligible: bool,
    tables: &MedicareTables,
) -> Result<MedicareLevyResult, TaxError> {
    ensure_non_negative("taxable income", income)?;

    let thresholds = if sapto_eligible {
        &tables.sapto
    } else {
        &tables.standard
    };

    if income <= thresholds.lower {
        return Ok(MedicareLevyResult {
            taxable_income: income,
            levy: Decimal::ZERO,
            levy_rate: Decimal::ZERO,
            reduction_applied: true,
            notes: format!(
                "Below Medicare levy threshold ({})",
                format_dollars(thresholds.lower)
            ),
        });
    }

    if income <= thresholds.upper {
        let levy = (income - thresholds.lower) * tables.reduction_rate;
        return Ok(MedicareLevyResult {
            taxable_income: income,
            levy,
            levy_rate: levy / income,
            reduction_applied: true,
            notes: format!(
                "Reduced levy (income between {} and {})",
                format_dollars(thresholds.lower),
                format_dollars(thresholds.upper)
            ),
        });
    }

    Ok(MedicareLevyResult {
        taxable_income: income,
        levy: income * tables.rate,
        levy_rate: tables.rate,
        reduction_applied: false,
        notes: format!(
            "Full Medicare levy ({}%)",
            (tables.rate * Decimal::ONE_HUNDRED).normalize()
        ),
    })
}
