use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loancalc_core::sba::term_loan::{self, TermLoanInput};
use loancalc_core::FeeSpec;

use super::CliResult;
use crate::input;

/// Arguments for SBA term loan analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct TermLoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "apr")]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long)]
    pub term_years: Option<u32>,

    /// Additional term months (0-11)
    #[arg(long, default_value_t = 0)]
    pub term_months: u32,

    /// Guarantee fee as a fraction of the loan, financed
    #[arg(long)]
    pub guarantee_fee_percent: Option<Decimal>,

    /// Flat closing costs paid upfront
    #[arg(long)]
    pub closing_costs: Option<Decimal>,
}

pub fn run_term_loan(args: TermLoanArgs) -> CliResult<Value> {
    let loan: TermLoanInput = input::load(args.input.as_deref(), || {
        let mut fees = Vec::new();
        if let Some(fraction) = args.guarantee_fee_percent {
            fees.push(FeeSpec::percent_of_principal(fraction, true).with_label("Guarantee fee"));
        }
        if let Some(amount) = args.closing_costs {
            fees.push(FeeSpec::flat(amount, false).with_label("Closing costs"));
        }
        Ok(TermLoanInput {
            loan_amount: args.loan_amount.ok_or_else(|| input::missing("loan-amount"))?,
            annual_rate_percent: args.rate.ok_or_else(|| input::missing("rate"))?,
            term_years: args.term_years.ok_or_else(|| input::missing("term-years"))?,
            term_months: args.term_months,
            fees,
        })
    })?;
    let result = term_loan::analyze_term_loan(&loan)?;
    Ok(serde_json::to_value(result)?)
}
