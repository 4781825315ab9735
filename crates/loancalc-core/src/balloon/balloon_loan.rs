//! Balloon loan calculator.
//!
//! The payment is sized as if the loan amortized over the full amortization
//! term, but the schedule stops at the balloon due date and whatever is left
//! becomes a lump-sum payment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::engine::cutoff::{self, BalloonStatus};
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
pub struct BalloonLoanInput {
    pub loan_amount: Money,
    /// APR in percent (6.5 = 6.5%).
    pub annual_rate_percent: Decimal,
    /// Term the payment is sized over.
    pub amortization_years: u32,
    #[serde(default)]
    pub amortization_months: u32,
    /// Time until the remaining balance falls due.
    pub balloon_due_years: u32,
    #[serde(default)]
    pub balloon_due_months: u32,
    #[serde(default)]
    pub fees: Vec<FeeSpec>,
}

impl BalloonLoanInput {
    pub fn amortization_periods(&self) -> u32 {
        self.amortization_years
            .saturating_mul(PERIODS_PER_YEAR)
            .saturating_add(self.amortization_months)
    }

    pub fn balloon_due_period(&self) -> u32 {
        self.balloon_due_years
            .saturating_mul(PERIODS_PER_YEAR)
            .saturating_add(self.balloon_due_months)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalloonLoanOutput {
    pub financed_principal: Money,
    pub monthly_payment: Money,
    pub amortization_periods: u32,
    pub balloon_due_period: u32,
    pub balloon_amount: Option<Money>,
    pub balloon_status: BalloonStatus,
    /// Scheduled payments plus the balloon.
    pub total_payments: Option<Money>,
    pub total_interest: Option<Money>,
    pub upfront_fees: Money,
    pub fees: FeeBreakdown,
    pub schedule: Vec<ScheduleRow>,
    pub annual_summary: Vec<AnnualSummary>,
    pub warnings: Vec<LoanWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_message: Option<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Size the payment over the amortization term and run it to the balloon date.
pub fn analyze_balloon_loan(
    input: &BalloonLoanInput,
) -> LoanResult<ComputationOutput<BalloonLoanOutput>> {
    let start = Instant::now();
    validate_balloon_input(input)?;

    let fee_breakdown = fees::apply_fees(input.loan_amount, &input.fees);
    let amortization_periods = input.amortization_periods();
    let balloon_due_period = input.balloon_due_period();
    let terms = LoanTerms::new(
        fee_breakdown.financed_principal,
        input.annual_rate_percent,
        amortization_periods,
    );
    let monthly_payment = terms.payment();

    let mut warnings: Vec<LoanWarning> = Vec::new();
    let mut validation_message = None;
    let mut schedule_rows = Vec::new();
    let mut balloon_amount = None;
    let mut balloon_status = BalloonStatus::Undetermined;
    let mut total_payments = None;
    let mut total_interest = None;

    if terms.principal <= Decimal::ZERO {
        warnings.push(LoanWarning::NoPrincipal);
    } else if amortization_periods == 0 {
        warnings.push(LoanWarning::NoHorizon);
    } else {
        let result = cutoff::simulate_to_cutoff(&terms, monthly_payment, balloon_due_period);
        warnings.extend(result.simulation.warning);
        validation_message = result.validation_message;
        balloon_amount = result.balloon_amount;
        balloon_status = result.balloon_status;
        total_interest = result.simulation.total_interest;
        total_payments = match (result.simulation.total_paid, result.balloon_amount) {
            (Some(paid), Some(balloon)) => Some(paid + balloon),
            _ => None,
        };
        schedule_rows = result.simulation.rows;
    }

    let annual_summary = schedule::summarize_by_year(&schedule_rows);

    let mut envelope_warnings = warning_messages(&warnings);
    if let Some(msg) = &validation_message {
        envelope_warnings.push(msg.clone());
    }
    if balloon_status == BalloonStatus::FullyAmortized {
        envelope_warnings.push(format!(
            "Loan fully amortizes in {} months, before the balloon due date",
            schedule_rows.len()
        ));
    }

    let output = BalloonLoanOutput {
        financed_principal: fee_breakdown.financed_principal,
        monthly_payment,
        amortization_periods,
        balloon_due_period,
        balloon_amount,
        balloon_status,
        total_payments,
        total_interest,
        upfront_fees: fee_breakdown.upfront_fees_total,
        fees: fee_breakdown,
        schedule: schedule_rows,
        annual_summary,
        warnings,
        validation_message,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Balloon Loan: level payment over amortization term, residual due at cutoff",
        &serde_json::json!({
            "loan_amount": input.loan_amount.to_string(),
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "amortization_periods": amortization_periods,
            "balloon_due_period": balloon_due_period,
            "periods_per_year": PERIODS_PER_YEAR,
        }),
        envelope_warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_balloon_input(input: &BalloonLoanInput) -> LoanResult<()> {
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
    if input.amortization_months >= PERIODS_PER_YEAR || input.balloon_due_months >= PERIODS_PER_YEAR
    {
        return Err(LoanError::InvalidInput {
            field: "months".into(),
            reason: "Month components must be between 0 and 11".into(),
        });
    }
    fees::validate_fees(&input.fees)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
