use super::tables::{SurchargeTables, Tier};
use super::{ensure_non_negative, find_tier, TaxError};
use rust_decimal::Decimal;
use serde::Serialize;

/// Inputs for the Medicare levy surcharge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurchargeInput {
    /// Taxable income plus fringe benefits, investment losses and reportable super
    pub income: Decimal,
    /// Married or de facto
    pub family: bool,
    pub dependent_children: u32,
    pub has_hospital_cover: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurchargeResult {
    pub income: Decimal,
    pub surcharge: Decimal,
    pub rate: Decimal,
    pub tier: String,
    pub has_hospital_cover: bool,
}

/// Flat-rate surcharge applied to the whole income for the first tier covering it
pub fn medicare_levy_surcharge(
    input: &SurchargeInput,
    tables: &SurchargeTables,
) -> Result<SurchargeResult, TaxError> {
    ensure_non_negative("income for surcharge", input.income)?;

    if input.has_hospital_cover {
        return Ok(SurchargeResult {
            income: input.income,
            surcharge: Decimal::ZERO,
            rate: Decimal::ZERO,
            tier: "Exempt".to_string(),
            has_hospital_cover: true,
        });
    }

    let tiers = if input.family {
        shifted_for_children(
            &tables.family,
            tables.child_increment,
            input.dependent_children,
        )
    } else {
        tables.single.clone()
    };

    let (index, tier) = find_tier(&tiers, input.income)?;
    Ok(SurchargeResult {
        income: input.income,
        surcharge: input.income * tier.rate,
        rate: tier.rate,
        tier: tier_label(index),
        has_hospital_cover: false,
    })
}

/// Family thresholds rise for every dependent child after the first
fn shifted_for_children(tiers: &[Tier], increment: Decimal, children: u32) -> Vec<Tier> {
    let extra = Decimal::from(children.saturating_sub(1)) * increment;
    tiers
        .iter()
        .map(|tier| Tier {
            upper: tier.upper.map(|upper| upper + extra),
            rate: tier.rate,
        })
        .collect()
}

fn tier_label(index: usize) -> String {
    match index {
        0 => "Base tier".to_string(),
        n => format!("Tier {n}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::round_half_up;
    use crate::tax::TaxTables;
    use rust_decimal_macros::dec;

    fn surcharge(input: SurchargeInput) -> SurchargeResult {
        medicare_levy_surcharge(&input, &TaxTables::default().surcharge).unwrap()
    }

    fn single(income: Decimal) -> SurchargeInput {
        SurchargeInput {
            income,
            ..Default::default()
        }
    }

    #[test]
    fn single_tier_one() {
        let result = surcharge(single(dec!(100000)));
        assert_eq!(round_half_up(result.surcharge), dec!(1000.00));
        assert_eq!(result.tier, "Tier 1");
        assert_eq!(result.rate, dec!(0.01));
    }

    #[test]
    fn single_base_tier_inclusive() {
        let result = surcharge(single(dec!(97000)));
        assert_eq!(result.surcharge, dec!(0));
        assert_eq!(result.tier, "Base tier");
    }

    #[test]
    fn single_top_tier() {
        let result = surcharge(single(dec!(200000)));
        assert_eq!(result.surcharge, dec!(3000));
        assert_eq!(result.tier, "Tier 3");
    }

    #[test]
    fn hospital_cover_always_exempt() {
        for income in [dec!(0), dec!(100000), dec!(151001), dec!(5000000)] {
            for family in [false, true] {
                let result = surcharge(SurchargeInput {
                    income,
                    family,
                    dependent_children: 3,
                    has_hospital_cover: true,
                });
                assert_eq!(result.surcharge, dec!(0));
                assert_eq!(result.tier, "Exempt");
            }
        }
    }

    #[test]
    fn family_thresholds_shift_per_extra_child() {
        let family = |dependent_children| SurchargeInput {
            income: dec!(196000),
            family: true,
            dependent_children,
            has_hospital_cover: false,
        };
        // 196,000 is above the 194,000 base tier for up to one child
        assert_eq!(surcharge(family(0)).tier, "Tier 1");
        assert_eq!(surcharge(family(1)).tier, "Tier 1");
        // Two extra children lift the base tier to 197,000
        assert_eq!(surcharge(family(3)).tier, "Base tier");
        assert_eq!(surcharge(family(3)).surcharge, dec!(0));
    }

    #[test]
    fn negative_income_rejected() {
        let tables = TaxTables::default().surcharge;
        assert!(matches!(
            medicare_levy_surcharge(&single(dec!(-1)), &tables),
            Err(TaxError::NegativeAmount { .. })
        ));
    }
}
