use super::tables::Bracket;
use super::{ensure_non_negative, TaxError};
use crate::money::format_dollars;
use rust_decimal::Decimal;
use serde::Serialize;

/// Progressive income tax for one taxable income
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeTaxResult {
    pub taxable_income: Decimal,
    pub tax: Decimal,
    pub marginal_rate: Decimal,
    pub effective_rate: Decimal,
    pub bracket: String,
}

/// Calculate income tax using the bracket with the greatest lower bound not above `income`.
///
/// Tax is continuous at each lower bound, so an income exactly on one is taxed
/// the same by either bracket. The marginal rate and description report the
/// bracket that ends there, matching the published `$18,201 - $45,000` ranges.
pub fn income_tax(income: Decimal, brackets: &[Bracket]) -> Result<IncomeTaxResult, TaxError> {
    ensure_non_negative("taxable income", income)?;

    let (index, bracket) = brackets
        .iter()
        .enumerate()
        .rev()
        .find(|(_, b)| b.lower <= income)
        .ok_or(TaxError::NoMatchingBracket(income))?;

    let tax = bracket.base + (income - bracket.lower) * bracket.rate;
    let reported = if index > 0 && income == bracket.lower {
        index - 1
    } else {
        index
    };
    let shown = &brackets[reported];
    let effective_rate = if income.is_zero() {
        Decimal::ZERO
    } else {
        tax / income
    };

    Ok(IncomeTaxResult {
        taxable_income: income,
        tax,
        marginal_rate: shown.rate,
        effective_rate,
        bracket: describe_bracket(shown, brackets.get(reported + 1)),
    })
}

/// e.g. "$45,001 - $135,000: $4,288 + 30c per $1 over $45,000"
fn describe_bracket(bracket: &Bracket, next: Option<&Bracket>) -> String {
    let from = if bracket.lower.is_zero() {
        format_dollars(Decimal::ZERO)
    } else {
        format_dollars(bracket.lower + Decimal::ONE)
    };
    let range = match next {
        Some(next) => format!("{from} - {}", format_dollars(next.lower)),
        None => format!("{from}+"),
    };

    if bracket.rate.is_zero() && bracket.base.is_zero() {
        return format!("{range}: Nil");
    }

    let cents = (bracket.rate * Decimal::ONE_HUNDRED).normalize();
    let marginal = format!("{cents}c per $1 over {}", format_dollars(bracket.lower));
    if bracket.base.is_zero() {
        format!("{range}: {marginal}")
    } else {
        format!("{range}: {} + {marginal}", format_dollars(bracket.base))
    }
}
