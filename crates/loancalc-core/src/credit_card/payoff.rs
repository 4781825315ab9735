//! Credit card payoff calculator.
//!
//! Either the borrower fixes a monthly payment and we solve for how long the
//! balance takes to clear, or they fix a payoff horizon and we solve for the
//! payment. A fixed payment that cannot cover the monthly interest is
//! reported, never simulated.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::engine::schedule::{self, ScheduleRow};
use crate::engine::solver::{self, PERIODS_PER_YEAR};
use crate::engine::viability;
use crate::error::LoanError;
use crate::types::{warning_messages, with_metadata, ComputationOutput, LoanWarning, Money};
use crate::LoanResult;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// Which side of the payment/duration relationship the borrower fixes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PayoffPlan {
    FixedPayment { monthly_payment: Money },
    TargetMonths { months: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffInput {
    pub balance: Money,
    pub annual_rate_percent: Decimal,
    pub plan: PayoffPlan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffOutput {
    pub monthly_payment: Money,
    /// `None` when the payment never clears the balance.
    pub months_to_payoff: Option<u32>,
    pub payoff_years: Option<u32>,
    pub payoff_extra_months: Option<u32>,
    pub total_interest: Option<Money>,
    pub total_paid: Option<Money>,
    pub first_month_interest: Money,
    /// Smallest payment that still reduces the balance.
    pub minimum_viable_payment: Money,
    pub schedule: Vec<ScheduleRow>,
    pub warnings: Vec<LoanWarning>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn analyze_payoff(input: &PayoffInput) -> LoanResult<ComputationOutput<PayoffOutput>> {
    let start = Instant::now();
    validate_payoff_input(input)?;

    let r = solver::periodic_rate(input.annual_rate_percent);
    let mut warnings: Vec<LoanWarning> = Vec::new();

    let (monthly_payment, months_to_payoff) = match input.plan {
        PayoffPlan::FixedPayment { monthly_payment } => {
            match solver::solve_periods(input.balance, input.annual_rate_percent, monthly_payment) {
                Ok(months) => (monthly_payment, Some(months)),
                Err(LoanError::NoPrincipal) => {
                    warnings.push(LoanWarning::NoPrincipal);
                    (monthly_payment, None)
                }
                Err(LoanError::NonAmortizingPayment { .. }) => {
                    warnings.push(LoanWarning::NonAmortizingPayment);
                    (monthly_payment, None)
                }
                Err(e) => return Err(e),
            }
        }
        PayoffPlan::TargetMonths { months } => {
            let payment = solver::solve_payment(input.balance, input.annual_rate_percent, months);
            if input.balance <= Decimal::ZERO {
                warnings.push(LoanWarning::NoPrincipal);
                (payment, None)
            } else if months == 0 {
                warnings.push(LoanWarning::NoHorizon);
                (payment, None)
            } else {
                (payment, Some(months))
            }
        }
    };

    let check = viability::classify(input.balance, r, monthly_payment);

    let mut schedule_rows = Vec::new();
    let mut total_interest = None;
    let mut total_paid = None;
    if let Some(months) = months_to_payoff {
        let sim = schedule::simulate(
            input.balance,
            input.annual_rate_percent,
            monthly_payment,
            months,
        );
        warnings.extend(sim.warning);
        // A truncated run has not paid the card off; its totals would mislead.
        if sim.is_amortized() {
            total_interest = sim.total_interest;
            total_paid = sim.total_paid;
        }
        schedule_rows = sim.rows;
    }

    let output = PayoffOutput {
        monthly_payment,
        months_to_payoff,
        payoff_years: months_to_payoff.map(|m| m / PERIODS_PER_YEAR),
        payoff_extra_months: months_to_payoff.map(|m| m % PERIODS_PER_YEAR),
        total_interest,
        total_paid,
        first_month_interest: check.first_period_interest,
        minimum_viable_payment: check.minimum_payment,
        schedule: schedule_rows,
        warnings: warnings.clone(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Credit Card Payoff: fixed payment to payoff time, or target months to payment",
        &serde_json::json!({
            "balance": input.balance.to_string(),
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "plan": input.plan,
        }),
        warning_messages(&warnings),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_payoff_input(input: &PayoffInput) -> LoanResult<()> {
    if input.balance < Decimal::ZERO {
        return Err(LoanError::InvalidInput {
            field: "balance".into(),
            reason: "Balance cannot be negative".into(),
        });
    }
    if input.annual_rate_percent < Decimal::ZERO {
        return Err(LoanError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if let PayoffPlan::FixedPayment { monthly_payment } = input.plan {
        if monthly_payment < Decimal::ZERO {
            return Err(LoanError::InvalidInput {
                field: "monthly_payment".into(),
                reason: "Monthly payment cannot be negative".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
