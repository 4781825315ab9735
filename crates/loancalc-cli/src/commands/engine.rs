use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use loancalc_core::engine::fees::{self, FeeBreakdown, FeeSpec};
use loancalc_core::engine::schedule::{self, AnnualSummary, SimulationResult};
use loancalc_core::engine::{solver, viability};
use loancalc_core::types::{warning_messages, with_metadata, LoanWarning, Money, Rate};
use loancalc_core::LoanError;

use super::CliResult;
use crate::input;

// ---------------------------------------------------------------------------
// payment
// ---------------------------------------------------------------------------

/// Arguments for solving the level payment
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PaymentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (6.5 = 6.5%)
    #[arg(long, alias = "apr")]
    pub rate: Option<Decimal>,

    /// Number of monthly payments
    #[arg(long, alias = "months")]
    pub periods: Option<u32>,
}

#[derive(Deserialize)]
struct PaymentRequest {
    principal: Money,
    annual_rate_percent: Decimal,
    periods: u32,
}

#[derive(Serialize)]
struct PaymentResult {
    payment: Money,
    periodic_rate: Rate,
    periods: u32,
    total_of_payments: Money,
}

pub fn run_payment(args: PaymentArgs) -> CliResult<Value> {
    let req: PaymentRequest = input::load(args.input.as_deref(), || {
        Ok(PaymentRequest {
            principal: args.principal.ok_or_else(|| input::missing("principal"))?,
            annual_rate_percent: args.rate.ok_or_else(|| input::missing("rate"))?,
            periods: args.periods.ok_or_else(|| input::missing("periods"))?,
        })
    })?;

    let start = Instant::now();
    let payment = solver::solve_payment(req.principal, req.annual_rate_percent, req.periods);
    let mut warnings = Vec::new();
    if req.principal <= Decimal::ZERO {
        warnings.push(LoanWarning::NoPrincipal);
    } else if req.periods == 0 {
        warnings.push(LoanWarning::NoHorizon);
    }

    let result = PaymentResult {
        payment,
        periodic_rate: solver::periodic_rate(req.annual_rate_percent),
        periods: req.periods,
        total_of_payments: payment * Decimal::from(req.periods),
    };
    let output = with_metadata(
        "Level annuity payment",
        &serde_json::json!({
            "principal": req.principal.to_string(),
            "annual_rate_percent": req.annual_rate_percent.to_string(),
        }),
        warning_messages(&warnings),
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

// ---------------------------------------------------------------------------
// periods
// ---------------------------------------------------------------------------

/// Arguments for solving the payoff time
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PeriodsArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "apr")]
    pub rate: Option<Decimal>,

    /// Fixed monthly payment
    #[arg(long)]
    pub payment: Option<Decimal>,
}

#[derive(Deserialize)]
struct PeriodsRequest {
    principal: Money,
    annual_rate_percent: Decimal,
    payment: Money,
}

#[derive(Serialize)]
struct PeriodsResult {
    /// `None` when the payment never retires the loan.
    periods: Option<u32>,
    years: Option<u32>,
    extra_months: Option<u32>,
}

pub fn run_periods(args: PeriodsArgs) -> CliResult<Value> {
    let req: PeriodsRequest = input::load(args.input.as_deref(), || {
        Ok(PeriodsRequest {
            principal: args.principal.ok_or_else(|| input::missing("principal"))?,
            annual_rate_percent: args.rate.ok_or_else(|| input::missing("rate"))?,
            payment: args.payment.ok_or_else(|| input::missing("payment"))?,
        })
    })?;

    let start = Instant::now();
    let mut warnings = Vec::new();
    let periods = match solver::solve_periods(req.principal, req.annual_rate_percent, req.payment)
    {
        Ok(n) => Some(n),
        Err(LoanError::NoPrincipal) => {
            warnings.push(LoanWarning::NoPrincipal);
            None
        }
        Err(LoanError::NonAmortizingPayment { .. }) => {
            warnings.push(LoanWarning::NonAmortizingPayment);
            None
        }
        Err(e) => return Err(e.into()),
    };

    let result = PeriodsResult {
        periods,
        years: periods.map(|n| n / solver::PERIODS_PER_YEAR),
        extra_months: periods.map(|n| n % solver::PERIODS_PER_YEAR),
    };
    let output = with_metadata(
        "Payoff time for a fixed payment (closed form, rounded up)",
        &serde_json::json!({
            "principal": req.principal.to_string(),
            "annual_rate_percent": req.annual_rate_percent.to_string(),
            "payment": req.payment.to_string(),
        }),
        warning_messages(&warnings),
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

// ---------------------------------------------------------------------------
// principal
// ---------------------------------------------------------------------------

/// Arguments for solving the principal a payment can carry
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PrincipalArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Annual interest rate in percent
    #[arg(long, alias = "apr")]
    pub rate: Option<Decimal>,

    /// Number of monthly payments
    #[arg(long, alias = "months")]
    pub periods: Option<u32>,

    /// Monthly payment the borrower can afford
    #[arg(long)]
    pub payment: Option<Decimal>,
}

#[derive(Deserialize)]
struct PrincipalRequest {
    annual_rate_percent: Decimal,
    periods: u32,
    payment: Money,
}

#[derive(Debug, Serialize)]
struct PrincipalResult {
    principal: Money,
    periods: u32,
    total_of_payments: Money,
    total_interest: Money,
}

fn present_value(req: &PrincipalRequest) -> PrincipalResult {
    let principal = solver::solve_principal(req.annual_rate_percent, req.periods, req.payment);
    let total_of_payments = req
        .payment
        .max(Decimal::ZERO)
        .saturating_mul(Decimal::from(req.periods));
    PrincipalResult {
        principal,
        periods: req.periods,
        total_of_payments,
        total_interest: (total_of_payments - principal).max(Decimal::ZERO),
    }
}

pub fn run_principal(args: PrincipalArgs) -> CliResult<Value> {
    let req: PrincipalRequest = input::load(args.input.as_deref(), || {
        Ok(PrincipalRequest {
            annual_rate_percent: args.rate.ok_or_else(|| input::missing("rate"))?,
            periods: args.periods.ok_or_else(|| input::missing("periods"))?,
            payment: args.payment.ok_or_else(|| input::missing("payment"))?,
        })
    })?;

    let start = Instant::now();
    let mut warnings = Vec::new();
    if req.periods == 0 {
        warnings.push(LoanWarning::NoHorizon);
    }
    let result = present_value(&req);

    let output = with_metadata(
        "Present value of level payments",
        &serde_json::json!({
            "annual_rate_percent": req.annual_rate_percent.to_string(),
            "payment": req.payment.to_string(),
        }),
        warning_messages(&warnings),
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

// ---------------------------------------------------------------------------
// schedule
// ---------------------------------------------------------------------------

/// Arguments for simulating an amortization schedule
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "apr")]
    pub rate: Option<Decimal>,

    /// Number of periods to simulate
    #[arg(long, alias = "months")]
    pub periods: Option<u32>,

    /// Fixed monthly payment (solved from --periods when omitted)
    #[arg(long)]
    pub payment: Option<Decimal>,
}

#[derive(Deserialize)]
struct ScheduleRequest {
    principal: Money,
    annual_rate_percent: Decimal,
    periods: u32,
    #[serde(default)]
    payment: Option<Money>,
}

#[derive(Serialize)]
struct ScheduleOutput {
    payment: Money,
    #[serde(flatten)]
    simulation: SimulationResult,
    annual_summary: Vec<AnnualSummary>,
}

pub fn run_schedule(args: ScheduleArgs) -> CliResult<Value> {
    let req: ScheduleRequest = input::load(args.input.as_deref(), || {
        Ok(ScheduleRequest {
            principal: args.principal.ok_or_else(|| input::missing("principal"))?,
            annual_rate_percent: args.rate.ok_or_else(|| input::missing("rate"))?,
            periods: args.periods.ok_or_else(|| input::missing("periods"))?,
            payment: args.payment,
        })
    })?;

    let start = Instant::now();
    let payment = req
        .payment
        .unwrap_or_else(|| solver::solve_payment(req.principal, req.annual_rate_percent, req.periods));
    let simulation = schedule::simulate(req.principal, req.annual_rate_percent, payment, req.periods);
    let annual_summary = schedule::summarize_by_year(&simulation.rows);
    let warnings: Vec<LoanWarning> = simulation.warning.into_iter().collect();

    let output = with_metadata(
        "Month-by-month amortization simulation",
        &serde_json::json!({
            "principal": req.principal.to_string(),
            "annual_rate_percent": req.annual_rate_percent.to_string(),
            "horizon_periods": req.periods,
            "payment_solved": req.payment.is_none(),
            "hard_cap_periods": schedule::HARD_CAP_PERIODS,
        }),
        warning_messages(&warnings),
        start.elapsed().as_micros() as u64,
        ScheduleOutput {
            payment,
            simulation,
            annual_summary,
        },
    );
    Ok(serde_json::to_value(output)?)
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

/// Arguments for checking whether a payment amortizes
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ClassifyArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Outstanding balance
    #[arg(long, alias = "balance")]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "apr")]
    pub rate: Option<Decimal>,

    /// Proposed monthly payment
    #[arg(long)]
    pub payment: Option<Decimal>,
}

#[derive(Deserialize)]
struct ClassifyRequest {
    principal: Money,
    annual_rate_percent: Decimal,
    payment: Money,
}

pub fn run_classify(args: ClassifyArgs) -> CliResult<Value> {
    let req: ClassifyRequest = input::load(args.input.as_deref(), || {
        Ok(ClassifyRequest {
            principal: args.principal.ok_or_else(|| input::missing("principal"))?,
            annual_rate_percent: args.rate.ok_or_else(|| input::missing("rate"))?,
            payment: args.payment.ok_or_else(|| input::missing("payment"))?,
        })
    })?;

    let start = Instant::now();
    let verdict = viability::classify(
        req.principal,
        solver::periodic_rate(req.annual_rate_percent),
        req.payment,
    );
    let warnings: Vec<LoanWarning> = verdict.reason.into_iter().collect();

    let output = with_metadata(
        "Payment viability: payment must exceed first-period interest",
        &serde_json::json!({
            "principal": req.principal.to_string(),
            "annual_rate_percent": req.annual_rate_percent.to_string(),
            "payment": req.payment.to_string(),
        }),
        warning_messages(&warnings),
        start.elapsed().as_micros() as u64,
        verdict,
    );
    Ok(serde_json::to_value(output)?)
}

// ---------------------------------------------------------------------------
// fees
// ---------------------------------------------------------------------------

/// Arguments for resolving origination fees
#[derive(Args)]
pub struct FeesArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed before fees
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Flat fee amount (repeatable)
    #[arg(long = "flat-fee")]
    pub flat_fees: Vec<Decimal>,

    /// Fee as a fraction of principal, 0.03 = 3% (repeatable)
    #[arg(long = "percent-fee")]
    pub percent_fees: Vec<Decimal>,

    /// Roll the flag-supplied fees into the loan instead of paying upfront
    #[arg(long)]
    pub financed: bool,
}

#[derive(Deserialize)]
struct FeesRequest {
    principal: Money,
    #[serde(default)]
    fees: Vec<FeeSpec>,
}

pub fn run_fees(args: FeesArgs) -> CliResult<Value> {
    let req: FeesRequest = input::load(args.input.as_deref(), || {
        let fees = args
            .flat_fees
            .iter()
            .map(|&amount| FeeSpec::flat(amount, args.financed))
            .chain(
                args.percent_fees
                    .iter()
                    .map(|&fraction| FeeSpec::percent_of_principal(fraction, args.financed)),
            )
            .collect();
        Ok(FeesRequest {
            principal: args.principal.ok_or_else(|| input::missing("principal"))?,
            fees,
        })
    })?;

    let start = Instant::now();
    fees::validate_fees(&req.fees)?;
    let breakdown: FeeBreakdown = fees::apply_fees(req.principal, &req.fees);

    let output = with_metadata(
        "Origination fees: financed fees added to principal, upfront fees reported separately",
        &serde_json::json!({
            "principal": req.principal.to_string(),
            "fee_count": req.fees.len(),
        }),
        Vec::new(),
        start.elapsed().as_micros() as u64,
        breakdown,
    );
    Ok(serde_json::to_value(output)?)
}
