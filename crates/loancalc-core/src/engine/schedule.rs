//! Period-by-period amortization of a fixed payment.
//!
//! The simulator never loops on a payment that cannot reduce the balance:
//! viability is checked before the first row is produced, and the number of
//! rows is bounded by [`HARD_CAP_PERIODS`] whatever horizon the caller asks
//! for.

use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::engine::solver::{self, PERIODS_PER_YEAR};
use crate::engine::viability;
use crate::types::{LoanWarning, Money};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// 100 years of monthly payments.
pub const HARD_CAP_PERIODS: u32 = 1200;

/// A balance at or below one cent is treated as repaid.
pub const DUST_THRESHOLD: Money = dec!(0.01);

/// Tolerance for the `interest + principal == payment` row invariant.
pub const SPLIT_TOLERANCE: Decimal = dec!(0.000001);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One period of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based period index.
    pub period: u32,
    /// Amount actually paid this period (interest + principal portion).
    pub payment: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub ending_balance: Money,
}

/// How a simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    /// Balance reached the dust threshold.
    Amortized,
    /// Horizon (or hard cap) ended with a balance still outstanding.
    Outstanding,
    /// Payment never reduces the balance; no rows were produced.
    NonAmortizing,
    /// Nothing to simulate (no principal or no horizon).
    Empty,
}

/// Output of [`simulate`].
///
/// For a non-amortizing payment the balance and totals are undefined and
/// reported as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub rows: Vec<ScheduleRow>,
    pub total_interest: Option<Money>,
    pub total_paid: Option<Money>,
    pub ending_balance: Option<Money>,
    pub status: SimulationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<LoanWarning>,
}

impl SimulationResult {
    fn empty(principal: Money, warning: LoanWarning) -> Self {
        Self {
            rows: Vec::new(),
            total_interest: Some(Decimal::ZERO),
            total_paid: Some(Decimal::ZERO),
            ending_balance: Some(principal.max(Decimal::ZERO)),
            status: SimulationStatus::Empty,
            warning: Some(warning),
        }
    }

    fn non_amortizing() -> Self {
        Self {
            rows: Vec::new(),
            total_interest: None,
            total_paid: None,
            ending_balance: None,
            status: SimulationStatus::NonAmortizing,
            warning: Some(LoanWarning::NonAmortizingPayment),
        }
    }

    /// Number of rows produced.
    pub fn periods(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn is_amortized(&self) -> bool {
        self.status == SimulationStatus::Amortized
    }
}

/// Per-year roll-up of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualSummary {
    pub year: u32,
    pub interest: Money,
    pub principal: Money,
    pub payments: Money,
    pub ending_balance: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Amortize `principal` with a fixed `payment` for up to `horizon_periods`.
///
/// Each period charges `balance · r` of interest and applies the rest of the
/// payment to principal, clamped so the final payment never overshoots the
/// balance. Stops early once the balance is dust, and never produces more
/// than [`HARD_CAP_PERIODS`] rows.
pub fn simulate(
    principal: Money,
    annual_rate_percent: Decimal,
    payment: Money,
    horizon_periods: u32,
) -> SimulationResult {
    if principal <= Decimal::ZERO {
        return SimulationResult::empty(principal, LoanWarning::NoPrincipal);
    }
    if horizon_periods == 0 {
        return SimulationResult::empty(principal, LoanWarning::NoHorizon);
    }

    let r = solver::periodic_rate(annual_rate_percent);
    let check = viability::classify(principal, r, payment);
    if !check.viable {
        warn!(
            "payment {payment} does not exceed first-period interest {}; skipping simulation",
            check.first_period_interest
        );
        return SimulationResult::non_amortizing();
    }

    let truncated = horizon_periods > HARD_CAP_PERIODS;
    let horizon = horizon_periods.min(HARD_CAP_PERIODS);
    if truncated {
        warn!("horizon {horizon_periods} exceeds hard cap; truncating to {HARD_CAP_PERIODS}");
    }

    let mut rows: Vec<ScheduleRow> = Vec::with_capacity(horizon as usize);
    let mut balance = principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    for period in 1..=horizon {
        let interest = balance * r;
        let principal_portion = (payment - interest).max(Decimal::ZERO).min(balance);
        let actual_payment = interest + principal_portion;
        balance = (balance - principal_portion).max(Decimal::ZERO);

        // The classifier bounded `balance · r`; running totals can still
        // outgrow the decimal range on near-maximal principals.
        total_interest = total_interest.saturating_add(interest);
        total_paid = total_paid.saturating_add(actual_payment);

        rows.push(ScheduleRow {
            period,
            payment: actual_payment,
            interest_portion: interest,
            principal_portion,
            ending_balance: balance,
        });

        if balance <= DUST_THRESHOLD {
            break;
        }
    }

    let status = if balance <= DUST_THRESHOLD {
        SimulationStatus::Amortized
    } else {
        SimulationStatus::Outstanding
    };
    debug!(
        "simulate: principal={principal} r={r} payment={payment} rows={} status={status:?}",
        rows.len()
    );

    SimulationResult {
        rows,
        total_interest: Some(total_interest),
        total_paid: Some(total_paid),
        ending_balance: Some(balance),
        status,
        warning: truncated.then_some(LoanWarning::HorizonTruncated),
    }
}

/// Roll schedule rows up into 12-period years.
pub fn summarize_by_year(rows: &[ScheduleRow]) -> Vec<AnnualSummary> {
    let mut summaries: Vec<AnnualSummary> = Vec::new();

    for row in rows {
        let year = (row.period - 1) / PERIODS_PER_YEAR + 1;
        match summaries.last_mut() {
            Some(current) if current.year == year => {
                current.interest += row.interest_portion;
                current.principal += row.principal_portion;
                current.payments += row.payment;
                current.ending_balance = row.ending_balance;
            }
            _ => summaries.push(AnnualSummary {
                year,
                interest: row.interest_portion,
                principal: row.principal_portion,
                payments: row.payment,
                ending_balance: row.ending_balance,
            }),
        }
    }

    summaries
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::solver::solve_payment;

    fn thirty_year_loan() -> (Money, Decimal, Money) {
        let principal = dec!(100000);
        let rate = dec!(6);
        (principal, rate, solve_payment(principal, rate, 360))
    }

    #[test]
    fn test_full_schedule_amortizes_in_term() {
        let (p, rate, pmt) = thirty_year_loan();
        let result = simulate(p, rate, pmt, 360);

        assert_eq!(result.status, SimulationStatus::Amortized);
        assert_eq!(result.rows.len(), 360);
        assert_eq!(result.warning, None);
        assert!(result.ending_balance.unwrap() <= DUST_THRESHOLD);
        // Total interest on $100k at 6% / 30y is ~$115,838
        let interest = result.total_interest.unwrap();
        assert!(
            (interest - dec!(115838.19)).abs() < dec!(1),
            "Total interest {interest} should be ~115838"
        );
    }

    #[test]
    fn test_first_row_split() {
        let (p, rate, pmt) = thirty_year_loan();
        let result = simulate(p, rate, pmt, 360);
        let first = &result.rows[0];

        assert_eq!(first.period, 1);
        assert_eq!(first.interest_portion, dec!(500));
        assert_eq!(first.principal_portion, pmt - dec!(500));
        assert_eq!(first.ending_balance, p - first.principal_portion);
    }

    #[test]
    fn test_row_invariants_hold() {
        let (p, rate, pmt) = thirty_year_loan();
        let result = simulate(p, rate, pmt, 360);
        let mut prior = p;
        for row in &result.rows {
            assert!(row.ending_balance >= Decimal::ZERO);
            assert!(row.principal_portion <= prior + SPLIT_TOLERANCE);
            assert!(
                (row.interest_portion + row.principal_portion - row.payment).abs() < SPLIT_TOLERANCE
            );
            assert_eq!(row.ending_balance, (prior - row.principal_portion).max(Decimal::ZERO));
            prior = row.ending_balance;
        }
    }

    #[test]
    fn test_totals_match_rows() {
        let (p, rate, pmt) = thirty_year_loan();
        let result = simulate(p, rate, pmt, 360);
        let interest: Money = result.rows.iter().map(|r| r.interest_portion).sum();
        let paid: Money = result.rows.iter().map(|r| r.payment).sum();
        assert_eq!(result.total_interest, Some(interest));
        assert_eq!(result.total_paid, Some(paid));
    }

    #[test]
    fn test_overpayment_clamped_on_final_row() {
        // $1000 at 0% paid $300/mo: last row only needs $100
        let result = simulate(dec!(1000), dec!(0), dec!(300), 12);
        assert_eq!(result.rows.len(), 4);
        let last = result.rows.last().unwrap();
        assert_eq!(last.payment, dec!(100));
        assert_eq!(last.principal_portion, dec!(100));
        assert_eq!(last.ending_balance, Decimal::ZERO);
        assert_eq!(result.total_paid, Some(dec!(1000)));
    }

    #[test]
    fn test_zero_rate_linear() {
        let result = simulate(dec!(12000), dec!(0), dec!(1000), 12);
        assert_eq!(result.status, SimulationStatus::Amortized);
        assert_eq!(result.rows.len(), 12);
        assert_eq!(result.total_interest, Some(Decimal::ZERO));
        assert!(result.rows.iter().all(|r| r.payment == dec!(1000)));
    }

    #[test]
    fn test_short_horizon_leaves_balance_outstanding() {
        let (p, rate, pmt) = thirty_year_loan();
        let result = simulate(p, rate, pmt, 60);
        assert_eq!(result.status, SimulationStatus::Outstanding);
        assert_eq!(result.rows.len(), 60);
        let bal = result.ending_balance.unwrap();
        assert!(bal > dec!(93000) && bal < dec!(93100));
    }

    #[test]
    fn test_no_principal_is_empty() {
        let result = simulate(Decimal::ZERO, dec!(5), dec!(100), 12);
        assert!(result.rows.is_empty());
        assert_eq!(result.status, SimulationStatus::Empty);
        assert_eq!(result.warning, Some(LoanWarning::NoPrincipal));
    }

    #[test]
    fn test_no_horizon_is_empty() {
        let result = simulate(dec!(1000), dec!(5), dec!(100), 0);
        assert!(result.rows.is_empty());
        assert_eq!(result.warning, Some(LoanWarning::NoHorizon));
        assert_eq!(result.ending_balance, Some(dec!(1000)));
    }

    #[test]
    fn test_non_amortizing_does_not_loop() {
        let result = simulate(dec!(100000), dec!(8), dec!(500), 360);
        assert!(result.rows.is_empty());
        assert_eq!(result.status, SimulationStatus::NonAmortizing);
        assert_eq!(result.warning, Some(LoanWarning::NonAmortizingPayment));
        assert_eq!(result.ending_balance, None);
        assert_eq!(result.total_interest, None);
    }

    #[test]
    fn test_hard_cap_truncates() {
        // $101/mo against $100 of interest needs ~4600 months
        let result = simulate(dec!(100000), dec!(1.2), dec!(101), 100_000);
        assert_eq!(result.rows.len(), HARD_CAP_PERIODS as usize);
        assert_eq!(result.warning, Some(LoanWarning::HorizonTruncated));
        assert_eq!(result.status, SimulationStatus::Outstanding);
    }

    #[test]
    fn test_hard_cap_warning_even_when_loan_finishes_early() {
        let result = simulate(dec!(12000), dec!(0), dec!(1000), 5000);
        assert_eq!(result.rows.len(), 12);
        assert_eq!(result.status, SimulationStatus::Amortized);
        assert_eq!(result.warning, Some(LoanWarning::HorizonTruncated));
    }

    #[test]
    fn test_summarize_by_year() {
        let result = simulate(dec!(12000), dec!(0), dec!(500), 24);
        let years = summarize_by_year(&result.rows);
        assert_eq!(years.len(), 2);
        assert_eq!(years[0].year, 1);
        assert_eq!(years[0].principal, dec!(6000));
        assert_eq!(years[0].ending_balance, dec!(6000));
        assert_eq!(years[1].ending_balance, Decimal::ZERO);
    }

    #[test]
    fn test_summarize_partial_year() {
        let result = simulate(dec!(1500), dec!(0), dec!(100), 15);
        let years = summarize_by_year(&result.rows);
        assert_eq!(years.len(), 2);
        assert_eq!(years[1].payments, dec!(300));
    }
}
