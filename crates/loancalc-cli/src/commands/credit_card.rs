use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loancalc_core::credit_card::payoff::{self, PayoffInput, PayoffPlan};

use super::CliResult;
use crate::input;

/// Arguments for credit card payoff
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PayoffArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Current card balance
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Card APR in percent
    #[arg(long, alias = "apr")]
    pub rate: Option<Decimal>,

    /// Fixed monthly payment; solves for months to payoff
    #[arg(long, conflicts_with = "months")]
    pub payment: Option<Decimal>,

    /// Target months to payoff; solves for the payment
    #[arg(long)]
    pub months: Option<u32>,
}

pub fn run_payoff(args: PayoffArgs) -> CliResult<Value> {
    let card: PayoffInput = input::load(args.input.as_deref(), || {
        let plan = match (args.payment, args.months) {
            (Some(monthly_payment), _) => PayoffPlan::FixedPayment { monthly_payment },
            (None, Some(months)) => PayoffPlan::TargetMonths { months },
            (None, None) => return Err("--payment or --months is required (or provide --input)".into()),
        };
        Ok(PayoffInput {
            balance: args.balance.ok_or_else(|| input::missing("balance"))?,
            annual_rate_percent: args.rate.ok_or_else(|| input::missing("rate"))?,
            plan,
        })
    })?;
    let result = payoff::analyze_payoff(&card)?;
    Ok(serde_json::to_value(result)?)
}
