//! Tax command - Australian resident tax calculators

use super::print_json;
use crate::config::Config;
use crate::money::{format_aud, format_pct, round_half_up, round_rate};
use crate::tax::{
    ccs_threshold, division_293, help_repayment, income_tax, medicare_levy,
    medicare_levy_surcharge, summary, Division293Input, SummaryInput, SurchargeInput, TaxTables,
};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde_json::json;

const RULE: &str = "============================================================";
const THIN_RULE: &str = "────────────────────────────────────────────────────────────";

#[derive(Args, Debug)]
pub struct TaxCommand {
    #[command(subcommand)]
    calculation: Calculation,

    /// Output as JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Calculation {
    /// Income tax on taxable income
    Income {
        /// Taxable income in AUD
        #[arg(allow_negative_numbers = true)]
        income: Decimal,
    },
    /// Medicare levy
    Medicare {
        /// Taxable income in AUD
        #[arg(allow_negative_numbers = true)]
        income: Decimal,
        /// Eligible for the seniors and pensioners tax offset
        #[arg(long)]
        sapto: bool,
    },
    /// Medicare levy surcharge
    Mls {
        /// Income for MLS purposes (taxable income plus adjustments)
        #[arg(allow_negative_numbers = true)]
        income: Decimal,
        /// Married or de facto
        #[arg(long)]
        family: bool,
        /// Number of dependent children
        #[arg(long, default_value_t = 0)]
        children: u32,
        /// Has private hospital cover
        #[arg(long)]
        has_cover: bool,
    },
    /// Division 293 tax on concessional super contributions
    Div293 {
        /// Taxable income in AUD
        #[arg(allow_negative_numbers = true)]
        income: Decimal,
        /// Concessional super contributions
        #[arg(allow_negative_numbers = true)]
        super_contributions: Decimal,
        /// Reportable fringe benefits
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        fringe_benefits: Decimal,
        /// Net investment loss
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        investment_loss: Decimal,
    },
    /// HELP/HECS compulsory repayment
    HelpLoan {
        /// Repayment income in AUD
        #[arg(allow_negative_numbers = true)]
        income: Decimal,
    },
    /// Child Care Subsidy income threshold check
    Ccs {
        /// Combined family adjusted taxable income
        #[arg(allow_negative_numbers = true)]
        income: Decimal,
        /// Number of children in care
        #[arg(long, default_value_t = 1)]
        children: u32,
    },
    /// Every obligation for one taxpayer
    Summary(SummaryArgs),
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Taxable income in AUD
    #[arg(allow_negative_numbers = true)]
    income: Decimal,
    /// Reportable fringe benefits
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    fringe_benefits: Decimal,
    /// Net investment loss
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    investment_loss: Decimal,
    /// Concessional super contributions
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    super_contributions: Decimal,
    /// No private hospital cover (Medicare levy surcharge may apply)
    #[arg(long)]
    no_hospital_cover: bool,
    /// Has a HELP/HECS debt
    #[arg(long)]
    help_debt: bool,
    /// Eligible for the seniors and pensioners tax offset
    #[arg(long)]
    sapto: bool,
    /// Married or de facto
    #[arg(long)]
    family: bool,
    /// Number of dependent children
    #[arg(long, default_value_t = 0)]
    children: u32,
}

impl From<&SummaryArgs> for SummaryInput {
    fn from(args: &SummaryArgs) -> Self {
        SummaryInput {
            taxable_income: args.income,
            reportable_fringe_benefits: args.fringe_benefits,
            net_investment_loss: args.investment_loss,
            concessional_super: args.super_contributions,
            has_hospital_cover: !args.no_hospital_cover,
            has_help_debt: args.help_debt,
            sapto_eligible: args.sapto,
            family: args.family,
            dependent_children: args.children,
        }
    }
}

impl TaxCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let tables = &config.tax;
        match &self.calculation {
            Calculation::Income { income } => self.income(*income, tables),
            Calculation::Medicare { income, sapto } => self.medicare(*income, *sapto, tables),
            Calculation::Mls {
                income,
                family,
                children,
                has_cover,
            } => self.mls(
                &SurchargeInput {
                    income: *income,
                    family: *family,
                    dependent_children: *children,
                    has_hospital_cover: *has_cover,
                },
                tables,
            ),
            Calculation::Div293 {
                income,
                super_contributions,
                fringe_benefits,
                investment_loss,
            } => self.div293(
                &Division293Input {
                    taxable_income: *income,
                    concessional_contributions: *super_contributions,
                    reportable_fringe_benefits: *fringe_benefits,
                    net_investment_loss: *investment_loss,
                },
                tables,
            ),
            Calculation::HelpLoan { income } => self.help_loan(*income, tables),
            Calculation::Ccs { income, children } => self.ccs(*income, *children, tables),
            Calculation::Summary(args) => self.summary(&args.into(), tables),
        }
    }

    fn income(&self, income: Decimal, tables: &TaxTables) -> anyhow::Result<()> {
        let result = income_tax(income, &tables.income_tax)?;
        if self.json {
            return print_json(&json!({
                "taxable_income": round_half_up(result.taxable_income),
                "tax_payable": round_half_up(result.tax),
                "marginal_rate": result.marginal_rate,
                "effective_rate": round_rate(result.effective_rate),
                "bracket": result.bracket,
            }));
        }
        header("INCOME TAX CALCULATION", tables);
        line("Taxable Income:", format_aud(result.taxable_income));
        line("Income Tax:", format_aud(result.tax));
        line("Marginal Rate:", format_pct(result.marginal_rate));
        line("Effective Rate:", format_pct(result.effective_rate));
        line("Bracket:", result.bracket);
        footer();
        Ok(())
    }

    fn medicare(&self, income: Decimal, sapto: bool, tables: &TaxTables) -> anyhow::Result<()> {
        let result = medicare_levy(income, sapto, &tables.medicare)?;
        if self.json {
            return print_json(&json!({
                "taxable_income": round_half_up(result.taxable_income),
                "medicare_levy": round_half_up(result.levy),
                "levy_rate": round_rate(result.levy_rate),
                "reduction_applied": result.reduction_applied,
                "notes": result.notes,
            }));
        }
        header("MEDICARE LEVY CALCULATION", tables);
        line("Taxable Income:", format_aud(result.taxable_income));
        line("Medicare Levy:", format_aud(result.levy));
        line("Effective Rate:", format_pct(result.levy_rate));
        line("Status:", result.notes);
        footer();
        Ok(())
    }

    fn mls(&self, input: &SurchargeInput, tables: &TaxTables) -> anyhow::Result<()> {
        let result = medicare_levy_surcharge(input, &tables.surcharge)?;
        if self.json {
            return print_json(&json!({
                "income_for_mls": round_half_up(result.income),
                "has_hospital_cover": result.has_hospital_cover,
                "family": input.family,
                "tier": result.tier,
                "mls_rate": result.rate,
                "mls_amount": round_half_up(result.surcharge),
            }));
        }
        header("MEDICARE LEVY SURCHARGE", tables);
        line("Income for MLS:", format_aud(result.income));
        line("Hospital Cover:", yes_no(result.has_hospital_cover));
        line(
            "Family Status:",
            if input.family { "Family" } else { "Single" },
        );
        line("MLS Tier:", result.tier);
        line("MLS Rate:", format_pct(result.rate));
        line("MLS Amount:", format_aud(result.surcharge));
        footer();
        Ok(())
    }

    fn div293(&self, input: &Division293Input, tables: &TaxTables) -> anyhow::Result<()> {
        let result = division_293(input, &tables.division_293)?;
        if self.json {
            return print_json(&json!({
                "division_293_income": round_half_up(result.division_293_income),
                "concessional_contributions": round_half_up(result.concessional_contributions),
                "combined": round_half_up(result.combined),
                "threshold": result.threshold,
                "applies": result.applies,
                "taxable_contributions": round_half_up(result.taxable_contributions),
                "division_293_tax": round_half_up(result.tax),
                "notes": result.notes,
            }));
        }
        header("DIVISION 293 TAX", tables);
        line("Taxable Income:", format_aud(input.taxable_income));
        line(
            "Concessional Super:",
            format_aud(result.concessional_contributions),
        );
        line("Div 293 Income:", format_aud(result.division_293_income));
        line("Total (Income + Super):", format_aud(result.combined));
        line("Threshold:", format_aud(result.threshold));
        line("Div 293 Applies:", yes_no(result.applies));
        if result.applies {
            line(
                "Taxable Contributions:",
                format_aud(result.taxable_contributions),
            );
            line(
                &format!("Div 293 Tax ({}):", format_pct(tables.division_293.rate)),
                format_aud(result.tax),
            );
        }
        line("Notes:", result.notes);
        footer();
        Ok(())
    }

    fn help_loan(&self, income: Decimal, tables: &TaxTables) -> anyhow::Result<()> {
        let result = help_repayment(income, &tables.help)?;
        if self.json {
            return print_json(&json!({
                "repayment_income": round_half_up(result.repayment_income),
                "repayment_rate": result.rate,
                "repayment_amount": round_half_up(result.repayment),
                "notes": result.notes,
            }));
        }
        header("HELP/HECS LOAN REPAYMENT", tables);
        line("Repayment Income:", format_aud(result.repayment_income));
        line("Repayment Rate:", format_pct(result.rate));
        line("Repayment Amount:", format_aud(result.repayment));
        line("Notes:", result.notes);
        footer();
        Ok(())
    }

    fn ccs(&self, income: Decimal, children: u32, tables: &TaxTables) -> anyhow::Result<()> {
        let result = ccs_threshold(income, children, &tables.ccs)?;
        if self.json {
            return print_json(&json!({
                "combined_income": round_half_up(result.combined_income),
                "cutoff": result.cutoff,
                "status": result.status,
                "above_cutoff": result.above_cutoff,
                "estimated_subsidy_rate": result.estimated_subsidy_rate,
                "notes": result.notes,
            }));
        }
        header("CCS THRESHOLD CHECK", tables);
        line("Combined Income:", format_aud(result.combined_income));
        line("CCS Cutoff:", format_aud(result.cutoff));
        line("Above Cutoff:", yes_no(result.above_cutoff));
        line("Estimated CCS Rate:", result.estimated_subsidy_rate);
        line("Notes:", result.notes);
        footer();
        Ok(())
    }

    fn summary(&self, input: &SummaryInput, tables: &TaxTables) -> anyhow::Result<()> {
        let result = summary(input, tables)?.rounded();
        if self.json {
            return print_json(&result);
        }
        header("TAX SUMMARY", tables);
        amount_line("Taxable Income:", result.taxable_income);
        println!("{THIN_RULE}");
        amount_line("Income Tax:", result.income_tax);
        amount_line("Medicare Levy:", result.medicare_levy);
        if result.medicare_levy_surcharge > Decimal::ZERO {
            amount_line("Medicare Levy Surcharge:", result.medicare_levy_surcharge);
        }
        if result.help_repayment > Decimal::ZERO {
            amount_line("HELP Repayment:", result.help_repayment);
        }
        if result.division_293_tax > Decimal::ZERO {
            amount_line("Division 293 Tax:", result.division_293_tax);
        }
        println!("{THIN_RULE}");
        amount_line("TOTAL TAX:", result.total_tax);
        amount_line("NET INCOME:", result.net_income);
        println!(
            "{:<29}{:>15}",
            "Effective Tax Rate:",
            format_pct(result.effective_rate)
        );
        footer();
        Ok(())
    }
}

fn header(title: &str, tables: &TaxTables) {
    println!();
    println!("{RULE}");
    println!("{} - {}", title, tables.fiscal_year);
    println!("{RULE}");
}

fn footer() {
    println!("{RULE}");
    println!();
}

fn line(label: &str, value: impl std::fmt::Display) {
    println!("{:<24}{}", label, value);
}

fn amount_line(label: &str, amount: Decimal) {
    println!("{:<29}{:>15}", label, format_aud(amount));
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}
