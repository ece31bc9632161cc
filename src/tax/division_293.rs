use super::tables::Division293Tables;
use super::{ensure_non_negative, TaxError};
use crate::money::{format_aud, format_dollars, format_pct};
use rust_decimal::Decimal;
use serde::Serialize;

/// Inputs for the additional tax on concessional super contributions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Division293Input {
    pub taxable_income: Decimal,
    /// Employer, salary sacrifice and personal deductible contributions
    pub concessional_contributions: Decimal,
    pub reportable_fringe_benefits: Decimal,
    /// Net financial investment and rental property losses, added back
    pub net_investment_loss: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Division293Result {
    /// Income with the adjustments added back, excluding contributions
    pub division_293_income: Decimal,
    pub concessional_contributions: Decimal,
    /// Income plus adjustments plus contributions, compared with the threshold
    pub combined: Decimal,
    pub threshold: Decimal,
    pub applies: bool,
    pub taxable_contributions: Decimal,
    pub tax: Decimal,
    pub notes: String,
}

pub fn division_293(
    input: &Division293Input,
    tables: &Division293Tables,
) -> Result<Division293Result, TaxError> {
    ensure_non_negative("taxable income", input.taxable_income)?;
    ensure_non_negative(
        "concessional contributions",
        input.concessional_contributions,
    )?;
    ensure_non_negative("reportable fringe benefits", input.reportable_fringe_benefits)?;
    ensure_non_negative("net investment loss", input.net_investment_loss)?;

    let division_293_income =
        input.taxable_income + input.reportable_fringe_benefits + input.net_investment_loss;
    let combined = division_293_income + input.concessional_contributions;

    if combined <= tables.threshold {
        return Ok(Division293Result {
            division_293_income,
            concessional_contributions: input.concessional_contributions,
            combined,
            threshold: tables.threshold,
            applies: false,
            taxable_contributions: Decimal::ZERO,
            tax: Decimal::ZERO,
            notes: format!(
                "Income + super ({}) not above {} threshold",
                format_aud(combined),
                format_dollars(tables.threshold)
            ),
        });
    }

    let excess = combined - tables.threshold;
    let taxable_contributions = excess.min(input.concessional_contributions);

    Ok(Division293Result {
        division_293_income,
        concessional_contributions: input.concessional_contributions,
        combined,
        threshold: tables.threshold,
        applies: true,
        taxable_contributions,
        tax: taxable_contributions * tables.rate,
        notes: format!(
            "{} of super taxed at an additional {}",
            format_aud(taxable_contributions),
            format_pct(tables.rate)
        ),
    })
}
