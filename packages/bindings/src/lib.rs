use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use loancalc_core::engine::{cutoff, fees, schedule, solver, viability};
use loancalc_core::types::{LoanTerms, Money};
use loancalc_core::FeeSpec;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse<T: serde::de::DeserializeOwned>(input_json: &str) -> NapiResult<T> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

fn render<T: serde::Serialize>(output: &T) -> NapiResult<String> {
    serde_json::to_string(output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct LoanRequest {
    principal: Money,
    annual_rate_percent: Decimal,
    #[serde(default)]
    periods: u32,
    #[serde(default)]
    payment: Option<Money>,
}

impl LoanRequest {
    fn payment_or_solved(&self) -> Money {
        self.payment.unwrap_or_else(|| {
            solver::solve_payment(self.principal, self.annual_rate_percent, self.periods)
        })
    }
}

/// Level payment for `{principal, annual_rate_percent, periods}`.
#[napi]
pub fn solve_payment(input_json: String) -> NapiResult<String> {
    let req: LoanRequest = parse(&input_json)?;
    let payment = solver::solve_payment(req.principal, req.annual_rate_percent, req.periods);
    render(&serde_json::json!({ "payment": payment }))
}

/// Payoff periods for `{principal, annual_rate_percent, payment}`; `null`
/// when the payment never retires the loan.
#[napi]
pub fn solve_periods(input_json: String) -> NapiResult<String> {
    let req: LoanRequest = parse(&input_json)?;
    let payment = req
        .payment
        .ok_or_else(|| to_napi_error("payment is required"))?;
    let periods = solver::solve_periods(req.principal, req.annual_rate_percent, payment).ok();
    render(&serde_json::json!({ "periods": periods }))
}

#[derive(Deserialize)]
struct PrincipalRequest {
    annual_rate_percent: Decimal,
    periods: u32,
    payment: Money,
}

/// Largest principal `{annual_rate_percent, periods, payment}` can retire.
#[napi]
pub fn solve_principal(input_json: String) -> NapiResult<String> {
    let req: PrincipalRequest = parse(&input_json)?;
    let principal = solver::solve_principal(req.annual_rate_percent, req.periods, req.payment);
    render(&serde_json::json!({ "principal": principal }))
}

#[napi]
pub fn classify_payment(input_json: String) -> NapiResult<String> {
    let req: LoanRequest = parse(&input_json)?;
    let payment = req
        .payment
        .ok_or_else(|| to_napi_error("payment is required"))?;
    let verdict = viability::classify(
        req.principal,
        solver::periodic_rate(req.annual_rate_percent),
        payment,
    );
    render(&verdict)
}

/// Schedule over `periods`, solving the payment when none is given.
#[napi]
pub fn simulate_schedule(input_json: String) -> NapiResult<String> {
    let req: LoanRequest = parse(&input_json)?;
    let result = schedule::simulate(
        req.principal,
        req.annual_rate_percent,
        req.payment_or_solved(),
        req.periods,
    );
    render(&result)
}

#[derive(Deserialize)]
struct CutoffRequest {
    principal: Money,
    annual_rate_percent: Decimal,
    /// Term the payment is sized over.
    periods: u32,
    cutoff_periods: u32,
    #[serde(default)]
    payment: Option<Money>,
}

#[napi]
pub fn simulate_to_cutoff(input_json: String) -> NapiResult<String> {
    let req: CutoffRequest = parse(&input_json)?;
    let terms = LoanTerms::new(req.principal, req.annual_rate_percent, req.periods);
    let payment = req.payment.unwrap_or_else(|| terms.payment());
    render(&cutoff::simulate_to_cutoff(&terms, payment, req.cutoff_periods))
}

#[derive(Deserialize)]
struct FeesRequest {
    principal: Money,
    #[serde(default)]
    fees: Vec<FeeSpec>,
}

#[napi]
pub fn apply_fees(input_json: String) -> NapiResult<String> {
    let req: FeesRequest = parse(&input_json)?;
    fees::validate_fees(&req.fees).map_err(to_napi_error)?;
    render(&fees::apply_fees(req.principal, &req.fees))
}

// ---------------------------------------------------------------------------
// Calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn balloon_loan(input_json: String) -> NapiResult<String> {
    let input: loancalc_core::balloon::balloon_loan::BalloonLoanInput = parse(&input_json)?;
    let output =
        loancalc_core::balloon::balloon_loan::analyze_balloon_loan(&input).map_err(to_napi_error)?;
    render(&output)
}

#[napi]
pub fn sba_term_loan(input_json: String) -> NapiResult<String> {
    let input: loancalc_core::sba::term_loan::TermLoanInput = parse(&input_json)?;
    let output = loancalc_core::sba::term_loan::analyze_term_loan(&input).map_err(to_napi_error)?;
    render(&output)
}

#[napi]
pub fn credit_card_payoff(input_json: String) -> NapiResult<String> {
    let input: loancalc_core::credit_card::payoff::PayoffInput = parse(&input_json)?;
    let output =
        loancalc_core::credit_card::payoff::analyze_payoff(&input).map_err(to_napi_error)?;
    render(&output)
}

#[napi]
pub fn adjustable_rate_mortgage(input_json: String) -> NapiResult<String> {
    let input: loancalc_core::arm::two_phase::ArmInput = parse(&input_json)?;
    let output = loancalc_core::arm::two_phase::analyze_arm(&input).map_err(to_napi_error)?;
    render(&output)
}
