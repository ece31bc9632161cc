use super::tables::Tier;
use super::{ensure_non_negative, find_tier, TaxError};
use crate::money::format_pct;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpResult {
    pub repayment_income: Decimal,
    pub rate: Decimal,
    pub repayment: Decimal,
    pub notes: String,
}

/// Compulsory study loan repayment.
///
/// The band rate applies to the whole repayment income, not just the part
/// above the band's lower edge.
pub fn help_repayment(repayment_income: Decimal, bands: &[Tier]) -> Result<HelpResult, TaxError> {
    ensure_non_negative("repayment income", repayment_income)?;

    let (_, band) = find_tier(bands, repayment_income)?;
    let notes = if band.rate.is_zero() {
        "Below repayment threshold".to_string()
    } else {
        format!("{} of total repayment income", format_pct(band.rate))
    };

    Ok(HelpResult {
        repayment_income,
        rate: band.rate,
        repayment: repayment_income * band.rate,
        notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::round_half_up;
    use crate::tax::TaxTables;
    use rust_decimal_macros::dec;

    fn repay(income: Decimal) -> HelpResult {
        help_repayment(income, &TaxTables::default().help).unwrap()
    }

    #[test]
    fn zero_at_threshold() {
        let result = repay(dec!(54435));
        assert_eq!(result.repayment, dec!(0));
        assert_eq!(result.notes, "Below repayment threshold");
    }

    #[test]
    fn first_band_applies_to_whole_income() {
        let result = repay(dec!(54436));
        assert_eq!(result.rate, dec!(0.01));
        assert_eq!(round_half_up(result.repayment), dec!(544.36));
        assert_eq!(result.notes, "1.00% of total repayment income");
    }

    #[test]
    fn top_band() {
        let result = repay(dec!(200000));
        assert_eq!(result.rate, dec!(0.10));
        assert_eq!(result.repayment, dec!(20000));
    }

    #[test]
    fn mid_band() {
        let result = repay(dec!(80000));
        assert_eq!(result.rate, dec!(0.04));
        assert_eq!(result.repayment, dec!(3200));
    }

    #[test]
    fn negative_income_rejected() {
        assert!(matches!(
            help_repayment(dec!(-0.01), &TaxTables::default().help),
            Err(TaxError::NegativeAmount { .. })
        ));
    }
}
