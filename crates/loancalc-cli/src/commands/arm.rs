use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loancalc_core::arm::two_phase::{self, ArmInput};

use super::CliResult;
use crate::input;

/// Arguments for adjustable-rate mortgage analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ArmArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Rate during the fixed intro period, in percent
    #[arg(long)]
    pub intro_rate: Option<Decimal>,

    /// Rate after the reset, in percent
    #[arg(long)]
    pub adjusted_rate: Option<Decimal>,

    /// Full loan term in years
    #[arg(long, default_value_t = 30)]
    pub term_years: u32,

    /// Fixed intro period in years (5 for a 5/1 ARM)
    #[arg(long, default_value_t = 5)]
    pub intro_years: u32,
}

pub fn run_arm(args: ArmArgs) -> CliResult<Value> {
    let loan: ArmInput = input::load(args.input.as_deref(), || {
        Ok(ArmInput {
            loan_amount: args.loan_amount.ok_or_else(|| input::missing("loan-amount"))?,
            intro_rate_percent: args.intro_rate.ok_or_else(|| input::missing("intro-rate"))?,
            adjusted_rate_percent: args
                .adjusted_rate
                .ok_or_else(|| input::missing("adjusted-rate"))?,
            term_years: args.term_years,
            intro_years: args.intro_years,
        })
    })?;
    let result = two_phase::analyze_arm(&loan)?;
    Ok(serde_json::to_value(result)?)
}
