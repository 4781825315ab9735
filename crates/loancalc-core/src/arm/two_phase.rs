//! Adjustable-rate mortgage with one reset.
//!
//! The intro phase and the adjusted phase are two independent runs of the
//! same engine. The balance carried across the reset comes from the closed
//! form; the simulated balance is reported beside it as a consistency check.

use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::engine::cutoff;
use crate::engine::schedule::{self, ScheduleRow};
use crate::engine::solver::{self, PERIODS_PER_YEAR};
use crate::error::LoanError;
use crate::types::{
    warning_messages, with_metadata, ComputationOutput, LoanTerms, LoanWarning, Money,
};
use crate::LoanResult;

/// Closed-form and simulated reset balances further apart than this are
/// flagged.
const RESET_BALANCE_TOLERANCE: Money = dec!(0.01);

const CLOSED_FORM_OVERFLOW_NOTE: &str =
    "Closed-form reset balance exceeds decimal range; simulated balance used instead";

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmInput {
    pub loan_amount: Money,
    pub intro_rate_percent: Decimal,
    pub adjusted_rate_percent: Decimal,
    pub term_years: u32,
    /// Length of the fixed intro period (5 for a 5/1 ARM).
    pub intro_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmPhase {
    pub rate_percent: Decimal,
    pub periods: u32,
    pub monthly_payment: Money,
    pub total_interest: Option<Money>,
    pub total_paid: Option<Money>,
    pub schedule: Vec<ScheduleRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmOutput {
    pub intro: ArmPhase,
    pub adjusted: ArmPhase,
    pub payment_change: Money,
    /// Closed-form balance at the reset; this is what phase two amortizes.
    pub balance_at_reset: Money,
    /// Balance the iterative schedule reached at the reset.
    pub simulated_balance_at_reset: Option<Money>,
    pub reset_balance_difference: Option<Money>,
    pub total_interest: Option<Money>,
    pub total_paid: Option<Money>,
    pub warnings: Vec<LoanWarning>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn analyze_arm(input: &ArmInput) -> LoanResult<ComputationOutput<ArmOutput>> {
    let start = Instant::now();
    validate_arm_input(input)?;

    let mut warnings: Vec<LoanWarning> = Vec::new();
    let mut notes: Vec<String> = Vec::new();

    let total_periods = input.term_years.saturating_mul(PERIODS_PER_YEAR);
    let intro_periods = input.intro_years.saturating_mul(PERIODS_PER_YEAR);
    let adjusted_periods = total_periods - intro_periods;

    if input.loan_amount <= Decimal::ZERO {
        warnings.push(LoanWarning::NoPrincipal);
    } else if total_periods == 0 {
        warnings.push(LoanWarning::NoHorizon);
    }
    let amortizable = warnings.is_empty();

    // Phase one: sized over the whole term at the intro rate.
    let intro_terms = LoanTerms::new(input.loan_amount, input.intro_rate_percent, total_periods);
    let intro_payment = intro_terms.payment();
    let mut intro = ArmPhase {
        rate_percent: input.intro_rate_percent,
        periods: intro_periods,
        monthly_payment: intro_payment,
        total_interest: Some(Decimal::ZERO),
        total_paid: Some(Decimal::ZERO),
        schedule: Vec::new(),
    };
    let mut simulated_balance_at_reset = None;
    let balance_at_reset = if amortizable && intro_periods > 0 {
        let run = cutoff::simulate_to_cutoff(&intro_terms, intro_payment, intro_periods);
        warnings.extend(run.simulation.warning);
        simulated_balance_at_reset = run.balloon_amount;
        intro.total_interest = run.simulation.total_interest;
        intro.total_paid = run.simulation.total_paid;
        intro.schedule = run.simulation.rows;
        let closed_form = solver::remaining_balance(
            input.loan_amount,
            input.intro_rate_percent,
            intro_payment,
            intro_periods,
        );
        match (closed_form, simulated_balance_at_reset) {
            (Some(balance), _) => balance,
            (None, Some(simulated)) => {
                warn!("closed-form reset balance out of decimal range; using simulated {simulated}");
                notes.push(CLOSED_FORM_OVERFLOW_NOTE.to_string());
                simulated
            }
            (None, None) => {
                notes.push(CLOSED_FORM_OVERFLOW_NOTE.to_string());
                input.loan_amount
            }
        }
    } else {
        input.loan_amount.max(Decimal::ZERO)
    };

    let reset_balance_difference =
        simulated_balance_at_reset.map(|sim| (sim - balance_at_reset).abs());
    if let Some(diff) = reset_balance_difference {
        if diff > RESET_BALANCE_TOLERANCE {
            notes.push(format!("Closed-form and simulated reset balances differ by {diff}"));
        }
    }

    // Phase two: remaining balance re-amortized over the remaining term.
    let adjusted_payment =
        solver::solve_payment(balance_at_reset, input.adjusted_rate_percent, adjusted_periods);
    let mut adjusted = ArmPhase {
        rate_percent: input.adjusted_rate_percent,
        periods: adjusted_periods,
        monthly_payment: adjusted_payment,
        total_interest: Some(Decimal::ZERO),
        total_paid: Some(Decimal::ZERO),
        schedule: Vec::new(),
    };
    if amortizable && adjusted_periods > 0 && balance_at_reset > Decimal::ZERO {
        let run = schedule::simulate(
            balance_at_reset,
            input.adjusted_rate_percent,
            adjusted_payment,
            adjusted_periods,
        );
        warnings.extend(run.warning);
        adjusted.total_interest = run.total_interest;
        adjusted.total_paid = run.total_paid;
        adjusted.schedule = run
            .rows
            .into_iter()
            .map(|row| ScheduleRow {
                period: row.period + intro_periods,
                ..row
            })
            .collect();
    }

    let payment_change = if adjusted_periods > 0 {
        adjusted_payment - intro_payment
    } else {
        Decimal::ZERO
    };
    let total_interest = sum_options(intro.total_interest, adjusted.total_interest);
    let total_paid = sum_options(intro.total_paid, adjusted.total_paid);

    let output = ArmOutput {
        intro,
        adjusted,
        payment_change,
        balance_at_reset,
        simulated_balance_at_reset,
        reset_balance_difference,
        total_interest,
        total_paid,
        warnings: warnings.clone(),
    };

    let mut envelope_warnings = warning_messages(&warnings);
    envelope_warnings.extend(notes);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Adjustable-Rate Mortgage: intro and adjusted phases as independent amortizations",
        &serde_json::json!({
            "loan_amount": input.loan_amount.to_string(),
            "intro_rate_percent": input.intro_rate_percent.to_string(),
            "adjusted_rate_percent": input.adjusted_rate_percent.to_string(),
            "term_periods": total_periods,
            "intro_periods": intro_periods,
            "reset_balance_method": "closed_form",
        }),
        envelope_warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_arm_input(input: &ArmInput) -> LoanResult<()> {
    if input.loan_amount < Decimal::ZERO {
        return Err(LoanError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount cannot be negative".into(),
        });
    }
    if input.intro_rate_percent < Decimal::ZERO || input.adjusted_rate_percent < Decimal::ZERO {
        return Err(LoanError::InvalidInput {
            field: "rate_percent".into(),
            reason: "Interest rates cannot be negative".into(),
        });
    }
    if input.intro_years > input.term_years {
        return Err(LoanError::InvalidInput {
            field: "intro_years".into(),
            reason: "Intro period cannot exceed the loan term".into(),
        });
    }
    Ok(())
}

fn sum_options(a: Option<Money>, b: Option<Money>) -> Option<Money> {
    Some(a? + b?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
