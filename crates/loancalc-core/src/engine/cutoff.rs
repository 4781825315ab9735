//! Early termination of a schedule at a balloon or refinance date.

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::schedule::{self, SimulationResult, SimulationStatus};
use crate::engine::solver;
use crate::types::{LoanTerms, LoanWarning, Money};

pub const INVALID_CUTOFF_MESSAGE: &str = "balloon due time must be greater than 0";

/// What is owed at the cutoff date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalloonStatus {
    /// A residual balance is due at the cutoff.
    Due,
    /// The loan is repaid on or before the cutoff; nothing is due.
    FullyAmortized,
    /// No schedule could be built (invalid cutoff, no principal, or a
    /// payment that never amortizes).
    Undetermined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutoffResult {
    #[serde(flatten)]
    pub simulation: SimulationResult,
    pub cutoff_periods: u32,
    /// Periods the payment needs to fully retire the loan, if it ever does.
    pub full_amortization_periods: Option<u32>,
    pub balloon_amount: Option<Money>,
    pub balloon_status: BalloonStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_message: Option<String>,
}

/// Simulate `terms` with a fixed `payment` until `cutoff_periods`, reporting
/// the balance left at that point as the balloon.
///
/// The schedule runs for `min(cutoff_periods, full_amortization_periods)`.
/// When the loan is repaid before the cutoff the balloon is zero and the
/// status is [`BalloonStatus::FullyAmortized`].
pub fn simulate_to_cutoff(terms: &LoanTerms, payment: Money, cutoff_periods: u32) -> CutoffResult {
    if cutoff_periods == 0 {
        let mut simulation = schedule::simulate(terms.principal, terms.annual_rate_percent, payment, 0);
        simulation.warning = Some(LoanWarning::NoHorizon);
        return CutoffResult {
            simulation,
            cutoff_periods,
            full_amortization_periods: None,
            balloon_amount: None,
            balloon_status: BalloonStatus::Undetermined,
            validation_message: Some(INVALID_CUTOFF_MESSAGE.to_string()),
        };
    }

    let full_amortization_periods =
        match solver::solve_periods(terms.principal, terms.annual_rate_percent, payment) {
            Ok(n) => Some(n),
            Err(e) => {
                debug!("simulate_to_cutoff: payoff length unavailable ({e})");
                None
            }
        };

    let horizon = full_amortization_periods
        .map(|full| full.min(cutoff_periods))
        .unwrap_or(cutoff_periods);
    let simulation =
        schedule::simulate(terms.principal, terms.annual_rate_percent, payment, horizon);

    let (balloon_amount, balloon_status) = match simulation.status {
        SimulationStatus::Amortized => (Some(Decimal::ZERO), BalloonStatus::FullyAmortized),
        SimulationStatus::Outstanding => (simulation.ending_balance, BalloonStatus::Due),
        SimulationStatus::NonAmortizing | SimulationStatus::Empty => {
            (None, BalloonStatus::Undetermined)
        }
    };
    debug!(
        "simulate_to_cutoff: cutoff={cutoff_periods} full={full_amortization_periods:?} balloon={balloon_amount:?}"
    );

    CutoffResult {
        simulation,
        cutoff_periods,
        full_amortization_periods,
        balloon_amount,
        balloon_status,
        validation_message: None,
    }
}
