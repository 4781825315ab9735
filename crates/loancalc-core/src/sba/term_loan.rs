//! SBA-style fully amortizing term loan with origination fees.
//!
//! Fees (guarantee, packaging, closing) are either rolled into the financed
//! balance or paid at closing. Only financed fees accrue interest.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::engine::fees::{self, FeeBreakdown, FeeSpec};
use crate::engine::schedule::{self, AnnualSummary, ScheduleRow};
use crate::engine::solver::PERIODS_PER_YEAR;
use crate::error::LoanError;
use crate::types::{
    warning_messages, with_metadata, ComputationOutput, LoanTerms, LoanWarning, Money,
};
use crate::LoanResult;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermLoanInput {
    pub loan_amount: Money,
    pub annual_rate_percent: Decimal,
    pub term_years: u32,
    #[serde(default)]
    pub term_months: u32,
    #[serde(default)]
    pub fees: Vec<FeeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermLoanOutput {
    pub financed_principal: Money,
    pub monthly_payment: Money,
    pub term_periods: u32,
    pub total_interest: Option<Money>,
    pub total_paid: Option<Money>,
    pub upfront_fees: Money,
    /// Interest plus every fee, financed or not.
    pub total_cost_of_borrowing: Option<Money>,
    pub fees: FeeBreakdown,
    pub schedule: Vec<ScheduleRow>,
    pub annual_summary: Vec<AnnualSummary>,
    pub warnings: Vec<LoanWarning>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Amortize the loan plus financed fees over the full term.
pub fn analyze_term_loan(input: &TermLoanInput) -> LoanResult<ComputationOutput<TermLoanOutput>> {
    let start = Instant::now();
    validate_term_loan_input(input)?;

    let fee_breakdown = fees::apply_fees(input.loan_amount, &input.fees);
    let term_periods = input
        .term_years
        .saturating_mul(PERIODS_PER_YEAR)
        .saturating_add(input.term_months);
    let terms = LoanTerms::new(
        fee_breakdown.financed_principal,
        input.annual_rate_percent,
        term_periods,
    );
    let monthly_payment = terms.payment();

    let mut warnings: Vec<LoanWarning> = Vec::new();
    let simulation = if term_periods == 0 && terms.principal > Decimal::ZERO {
        warnings.push(LoanWarning::NoHorizon);
        None
    } else {
        let sim = schedule::simulate(
            terms.principal,
            terms.annual_rate_percent,
            monthly_payment,
            term_periods,
        );
        warnings.extend(sim.warning);
        Some(sim)
    };

    let (schedule_rows, total_interest, total_paid) = match simulation {
        Some(sim) => (sim.rows, sim.total_interest, sim.total_paid),
        None => (Vec::new(), None, None),
    };
    let all_fees = fee_breakdown.financed_fees_total + fee_breakdown.upfront_fees_total;
    let total_cost_of_borrowing = total_interest.map(|interest| interest + all_fees);
    let annual_summary = schedule::summarize_by_year(&schedule_rows);

    let output = TermLoanOutput {
        financed_principal: fee_breakdown.financed_principal,
        monthly_payment,
        term_periods,
        total_interest,
        total_paid,
        upfront_fees: fee_breakdown.upfront_fees_total,
        total_cost_of_borrowing,
        fees: fee_breakdown,
        schedule: schedule_rows,
        annual_summary,
        warnings: warnings.clone(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "SBA Term Loan: fully amortizing with financed and upfront fees",
        &serde_json::json!({
            "loan_amount": input.loan_amount.to_string(),
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "term_periods": term_periods,
            "fee_count": input.fees.len(),
        }),
        warning_messages(&warnings),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_term_loan_input(input: &TermLoanInput) -> LoanResult<()> {
    if input.loan_amount < Decimal::ZERO {
        return Err(LoanError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount cannot be negative".into(),
        });
    }
    if input.annual_rate_percent < Decimal::ZERO {
        return Err(LoanError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if input.term_months >= PERIODS_PER_YEAR {
        return Err(LoanError::InvalidInput {
            field: "term_months".into(),
            reason: "Month component must be between 0 and 11".into(),
        });
    }
    fees::validate_fees(&input.fees)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
