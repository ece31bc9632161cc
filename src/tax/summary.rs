use super::division_293::{division_293, Division293Input};
use super::help::help_repayment;
use super::income::income_tax;
use super::medicare::medicare_levy;
use super::surcharge::{medicare_levy_surcharge, SurchargeInput};
use super::tables::TaxTables;
use super::{ensure_non_negative, TaxError};
use crate::money::{round_half_up, round_rate};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryInput {
    pub taxable_income: Decimal,
    pub reportable_fringe_benefits: Decimal,
    pub net_investment_loss: Decimal,
    pub concessional_super: Decimal,
    pub has_hospital_cover: bool,
    pub has_help_debt: bool,
    pub sapto_eligible: bool,
    pub family: bool,
    pub dependent_children: u32,
}

impl Default for SummaryInput {
    fn default() -> Self {
        SummaryInput {
            taxable_income: Decimal::ZERO,
            reportable_fringe_benefits: Decimal::ZERO,
            net_investment_loss: Decimal::ZERO,
            concessional_super: Decimal::ZERO,
            has_hospital_cover: true,
            has_help_debt: false,
            sapto_eligible: false,
            family: false,
            dependent_children: 0,
        }
    }
}

impl SummaryInput {
    /// Income base shared by the surcharge and loan repayment
    pub fn adjusted_income(&self) -> Decimal {
        self.taxable_income + self.reportable_fringe_benefits + self.net_investment_loss
    }
}

/// Every obligation for one taxpayer, unrounded until [`TaxSummary::rounded`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxSummary {
    pub taxable_income: Decimal,
    pub income_tax: Decimal,
    pub medicare_levy: Decimal,
    pub medicare_levy_surcharge: Decimal,
    pub help_repayment: Decimal,
    pub division_293_tax: Decimal,
    pub total_tax: Decimal,
    pub net_income: Decimal,
    pub effective_rate: Decimal,
}

impl TaxSummary {
    /// Presentation copy: money to cents, the effective rate to four places
    pub fn rounded(&self) -> TaxSummary {
        TaxSummary {
            taxable_income: round_half_up(self.taxable_income),
            income_tax: round_half_up(self.income_tax),
            medicare_levy: round_half_up(self.medicare_levy),
            medicare_levy_surcharge: round_half_up(self.medicare_levy_surcharge),
            help_repayment: round_half_up(self.help_repayment),
            division_293_tax: round_half_up(self.division_293_tax),
            total_tax: round_half_up(self.total_tax),
            net_income: round_half_up(self.net_income),
            effective_rate: round_rate(self.effective_rate),
        }
    }
}

pub fn summary(input: &SummaryInput, tables: &TaxTables) -> Result<TaxSummary, TaxError> {
    ensure_non_negative("taxable income", input.taxable_income)?;
    let adjusted_income = input.adjusted_income();

    let income_tax = income_tax(input.taxable_income, &tables.income_tax)?.tax;
    let medicare_levy =
        medicare_levy(input.taxable_income, input.sapto_eligible, &tables.medicare)?.levy;

    let surcharge = medicare_levy_surcharge(
        &SurchargeInput {
            income: adjusted_income,
            family: input.family,
            dependent_children: input.dependent_children,
            has_hospital_cover: input.has_hospital_cover,
        },
        &tables.surcharge,
    )?
    .surcharge;

    let help = if input.has_help_debt {
        help_repayment(adjusted_income, &tables.help)?.repayment
    } else {
        Decimal::ZERO
    };

    let division_293_tax = division_293(
        &Division293Input {
            taxable_income: input.taxable_income,
            concessional_contributions: input.concessional_super,
            reportable_fringe_benefits: input.reportable_fringe_benefits,
            net_investment_loss: input.net_investment_loss,
        },
        &tables.division_293,
    )?
    .tax;

    let total_tax = income_tax + medicare_levy + surcharge + help + division_293_tax;
    let effective_rate = if input.taxable_income.is_zero() {
        Decimal::ZERO
    } else {
        total_tax / input.taxable_income
    };

    log::debug!(
        "summary for {}: income tax {income_tax}, levy {medicare_levy}, surcharge {surcharge}, help {help}, div293 {division_293_tax}",
        input.taxable_income
    );

    Ok(TaxSummary {
        taxable_income: input.taxable_income,
        income_tax,
        medicare_levy,
        medicare_levy_surcharge: surcharge,
        help_repayment: help,
        division_293_tax,
        total_tax,
        net_income: input.taxable_income - total_tax,
        effective_rate,
    })
}
