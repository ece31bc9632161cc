//! Rate tables for one fiscal year.
//!
//! Tables are plain data so the same calculators can be reused across fiscal
//! years by loading a different [`TaxTables`] value.

use crate::fiscal::FiscalYear;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TableError {
    #[error("{table}: table is empty")]
    Empty { table: &'static str },
    #[error("{table}: first bracket must start at 0, found {found}")]
    FirstBracketNotZero { table: &'static str, found: Decimal },
    #[error("{table}: bounds must be strictly increasing at entry {index}")]
    NotIncreasing { table: &'static str, index: usize },
    #[error("{table}: only the last tier may be unbounded")]
    UnboundedTier { table: &'static str },
    #[error("{table}: last tier must be unbounded")]
    BoundedLastTier { table: &'static str },
    #[error("{table}: lower threshold {lower} exceeds upper threshold {upper}")]
    InvertedThresholds {
        table: &'static str,
        lower: Decimal,
        upper: Decimal,
    },
}

/// Progressive bracket: tax = base + (income - lower) x rate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Bracket {
    #[schemars(with = "f64")]
    pub lower: Decimal,
    #[schemars(with = "f64")]
    pub base: Decimal,
    #[schemars(with = "f64")]
    pub rate: Decimal,
}

/// Flat-rate tier applying to incomes up to and including `upper`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Tier {
    /// Inclusive upper bound; `None` means unbounded
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub upper: Option<Decimal>,
    #[schemars(with = "f64")]
    pub rate: Decimal,
}

impl Tier {
    pub fn covers(&self, income: Decimal) -> bool {
        self.upper.is_none_or(|upper| income <= upper)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReductionThresholds {
    #[schemars(with = "f64")]
    pub lower: Decimal,
    #[schemars(with = "f64")]
    pub upper: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MedicareTables {
    #[schemars(with = "f64")]
    pub rate: Decimal,
    /// Rate applied to income above the lower threshold inside the reduction band
    #[schemars(with = "f64")]
    pub reduction_rate: Decimal,
    pub standard: ReductionThresholds,
    /// Thresholds for taxpayers eligible for the seniors and pensioners tax offset
    pub sapto: ReductionThresholds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SurchargeTables {
    pub single: Vec<Tier>,
    pub family: Vec<Tier>,
    /// Family bounds increase by this much for each dependent child after the first
    #[schemars(with = "f64")]
    pub child_increment: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Division293Tables {
    #[schemars(with = "f64")]
    pub threshold: Decimal,
    #[schemars(with = "f64")]
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CcsTables {
    /// Income at or below which the maximum subsidy rate applies
    #[schemars(with = "f64")]
    pub max_subsidy_threshold: Decimal,
    /// Cutoff for families with one child in care
    #[schemars(with = "f64")]
    pub standard_cutoff: Decimal,
    /// Cutoff for families with more than one child in care
    #[schemars(with = "f64")]
    pub multi_child_cutoff: Decimal,
}

/// Every table used by the calculators for a single fiscal year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxTables {
    pub fiscal_year: FiscalYear,
    pub income_tax: Vec<Bracket>,
    pub medicare: MedicareTables,
    pub surcharge: SurchargeTables,
    pub division_293: Division293Tables,
    pub help: Vec<Tier>,
    pub ccs: CcsTables,
}

impl TaxTables {
    /// Resident rates for FY2024-25 (1 July 2024 - 30 June 2025)
    pub fn fy2024_25() -> Self {
        let bracket = |lower, base, rate| Bracket { lower, base, rate };
        let tier = |upper, rate| Tier {
            upper: Some(upper),
            rate,
        };
        let top = |rate| Tier { upper: None, rate };

        TaxTables {
            fiscal_year: FiscalYear(2025),
            income_tax: vec![
                bracket(dec!(0), dec!(0), dec!(0)),
                bracket(dec!(18200), dec!(0), dec!(0.16)),
                bracket(dec!(45000), dec!(4288), dec!(0.30)),
                bracket(dec!(135000), dec!(31288), dec!(0.37)),
                bracket(dec!(190000), dec!(51638), dec!(0.45)),
            ],
            medicare: MedicareTables {
                rate: dec!(0.02),
                reduction_rate: dec!(0.10),
                standard: ReductionThresholds {
                    lower: dec!(27222),
                    upper: dec!(34027),
                },
                sapto: ReductionThresholds {
                    lower: dec!(43020),
                    upper: dec!(53775),
                },
            },
            surcharge: SurchargeTables {
                single: vec![
                    tier(dec!(97000), dec!(0)),
                    tier(dec!(113000), dec!(0.01)),
                    tier(dec!(151000), dec!(0.0125)),
                    top(dec!(0.015)),
                ],
                family: vec![
                    tier(dec!(194000), dec!(0)),
                    tier(dec!(226000), dec!(0.01)),
                    tier(dec!(302000), dec!(0.0125)),
                    top(dec!(0.015)),
                ],
                child_increment: dec!(1500),
            },
            division_293: Division293Tables {
                threshold: dec!(250000),
                rate: dec!(0.15),
            },
            help: vec![
                tier(dec!(54435), dec!(0)),
                tier(dec!(62850), dec!(0.01)),
                tier(dec!(66620), dec!(0.02)),
                tier(dec!(70618), dec!(0.025)),
                tier(dec!(74855), dec!(0.03)),
                tier(dec!(79346), dec!(0.035)),
                tier(dec!(84107), dec!(0.04)),
                tier(dec!(89154), dec!(0.045)),
                tier(dec!(94503), dec!(0.05)),
                tier(dec!(100174), dec!(0.055)),
                tier(dec!(106185), dec!(0.06)),
                tier(dec!(112556), dec!(0.065)),
                tier(dec!(119309), dec!(0.07)),
                tier(dec!(126467), dec!(0.075)),
                tier(dec!(134056), dec!(0.08)),
                tier(dec!(142100), dec!(0.085)),
                tier(dec!(150626), dec!(0.09)),
                tier(dec!(159663), dec!(0.095)),
                top(dec!(0.10)),
            ],
            ccs: CcsTables {
                max_subsidy_threshold: dec!(80000),
                standard_cutoff: dec!(367563),
                multi_child_cutoff: dec!(367563),
            },
        }
    }

    /// Check the ordering invariants every calculator relies on
    pub fn validate(&self) -> Result<(), TableError> {
        validate_brackets("income_tax", &self.income_tax)?;
        validate_tiers("surcharge.single", &self.surcharge.single)?;
        validate_tiers("surcharge.family", &self.surcharge.family)?;
        validate_tiers("help", &self.help)?;
        validate_thresholds("medicare.standard", &self.medicare.standard)?;
        validate_thresholds("medicare.sapto", &self.medicare.sapto)?;
        Ok(())
    }
}

impl Default for TaxTables {
    fn default() -> Self {
        Self::fy2024_25()
    }
}

fn validate_brackets(table: &'static str, brackets: &[Bracket]) -> Result<(), TableError> {
    let first = brackets.first().ok_or(TableError::Empty { table })?;
    if !first.lower.is_zero() {
        return Err(TableError::FirstBracketNotZero {
            table,
            found: first.lower,
        });
    }
    for (index, pair) in brackets.windows(2).enumerate() {
        if pair[1].lower <= pair[0].lower {
            return Err(TableError::NotIncreasing {
                table,
                index: index + 1,
            });
        }
    }
    Ok(())
}

fn validate_tiers(table: &'static str, tiers: &[Tier]) -> Result<(), TableError> {
    let (last, bounded) = tiers.split_last().ok_or(TableError::Empty { table })?;
    if last.upper.is_some() {
        return Err(TableError::BoundedLastTier { table });
    }
    let mut previous: Option<Decimal> = None;
    for (index, tier) in bounded.iter().enumerate() {
        let upper = tier.upper.ok_or(TableError::UnboundedTier { table })?;
        if previous.is_some_and(|p| upper <= p) {
            return Err(TableError::NotIncreasing { table, index });
        }
        previous = Some(upper);
    }
    Ok(())
}

fn validate_thresholds(
    table: &'static str,
    thresholds: &ReductionThresholds,
) -> Result<(), TableError> {
    if thresholds.lower > thresholds.upper {
        return Err(TableError::InvertedThresholds {
            table,
            lower: thresholds.lower,
            upper: thresholds.upper,
        });
    }
    Ok(())
}
