use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loancalc_core::balloon::balloon_loan::{self, BalloonLoanInput};
use loancalc_core::FeeSpec;

use super::CliResult;
use crate::input;

/// Arguments for balloon loan analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BalloonArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "apr")]
    pub rate: Option<Decimal>,

    /// Years the payment is amortized over
    #[arg(long)]
    pub amortization_years: Option<u32>,

    /// Additional amortization months (0-11)
    #[arg(long, default_value_t = 0)]
    pub amortization_months: u32,

    /// Years until the balloon falls due
    #[arg(long)]
    pub due_years: Option<u32>,

    /// Additional months until the balloon falls due (0-11)
    #[arg(long, default_value_t = 0)]
    pub due_months: u32,

    /// Origination fee as a fraction of the loan, rolled into the balance
    #[arg(long)]
    pub financed_fee_percent: Option<Decimal>,
}

pub fn run_balloon(args: BalloonArgs) -> CliResult<Value> {
    let loan: BalloonLoanInput = input::load(args.input.as_deref(), || {
        Ok(BalloonLoanInput {
            loan_amount: args.loan_amount.ok_or_else(|| input::missing("loan-amount"))?,
            annual_rate_percent: args.rate.ok_or_else(|| input::missing("rate"))?,
            amortization_years: args
                .amortization_years
                .ok_or_else(|| input::missing("amortization-years"))?,
            amortization_months: args.amortization_months,
            balloon_due_years: args.due_years.ok_or_else(|| input::missing("due-years"))?,
            balloon_due_months: args.due_months,
            fees: args
                .financed_fee_percent
                .map(|fraction| FeeSpec::percent_of_principal(fraction, true))
                .into_iter()
                .collect(),
        })
    })?;
    let result = balloon_loan::analyze_balloon_loan(&loan)?;
    Ok(serde_json::to_value(result)?)
}
