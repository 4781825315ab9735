//! Property-based tests for amortization invariants.
//!
//! Loans are generated in whole cents and hundredths of a percent so the
//! inputs look like what a borrower would type.

use loancalc_core::engine::schedule::{HARD_CAP_PERIODS, SPLIT_TOLERANCE};
use loancalc_core::engine::solver;
use loancalc_core::{
    classify, simulate, simulate_to_cutoff, solve_payment, solve_periods, BalloonStatus,
    LoanTerms, SimulationStatus,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Principal between $100.00 and $2,000,000.00
fn principal_strategy() -> impl Strategy<Value = Decimal> {
    (10_000i64..=200_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// APR between 0.00% and 30.00%
fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=3_000i64).prop_map(|bps| Decimal::new(bps, 2))
}

/// Term between 1 and 480 months
fn term_strategy() -> impl Strategy<Value = u32> {
    1u32..=480u32
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every row keeps a non-negative balance and never repays more than is owed.
    #[test]
    fn row_balance_invariant(
        principal in principal_strategy(),
        rate in rate_strategy(),
        term in term_strategy(),
    ) {
        let payment = solve_payment(principal, rate, term);
        let result = simulate(principal, rate, payment, term);
        let mut prior = principal;
        for row in &result.rows {
            prop_assert!(row.ending_balance >= Decimal::ZERO);
            prop_assert!(row.principal_portion <= prior + SPLIT_TOLERANCE);
            prior = row.ending_balance;
        }
    }

    /// Interest plus principal equals the payment on every row.
    #[test]
    fn payment_split_invariant(
        principal in principal_strategy(),
        rate in rate_strategy(),
        term in term_strategy(),
    ) {
        let payment = solve_payment(principal, rate, term);
        let result = simulate(principal, rate, payment, term);
        for row in &result.rows {
            let diff = (row.interest_portion + row.principal_portion - row.payment).abs();
            prop_assert!(diff < SPLIT_TOLERANCE, "period {} split off by {}", row.period, diff);
        }
    }

    /// A solved payment retires the loan within its term.
    #[test]
    fn solved_payment_amortizes(
        principal in principal_strategy(),
        rate in rate_strategy(),
        term in term_strategy(),
    ) {
        let payment = solve_payment(principal, rate, term);
        let result = simulate(principal, rate, payment, term);
        prop_assert_eq!(result.status, SimulationStatus::Amortized);
        prop_assert!(result.rows.len() as u32 <= term);
    }

    /// Solving for periods from a solved payment recovers the term.
    #[test]
    fn payoff_time_round_trip(
        principal in principal_strategy(),
        rate in rate_strategy(),
        term in term_strategy(),
    ) {
        let payment = solve_payment(principal, rate, term);
        let periods = solve_periods(principal, rate, payment).unwrap();
        prop_assert_eq!(periods, term);
    }

    /// No horizon, however large, yields more than the hard cap of rows.
    #[test]
    fn hard_cap_bounds_schedule(
        principal in principal_strategy(),
        rate in rate_strategy(),
        payment_cents in 1i64..=1_000_000i64,
        horizon in 1u32..=200_000u32,
    ) {
        let payment = Decimal::new(payment_cents, 2);
        let result = simulate(principal, rate, payment, horizon);
        prop_assert!(result.rows.len() <= HARD_CAP_PERIODS as usize);
    }

    /// The classifier and the simulator agree on which payments amortize.
    #[test]
    fn classifier_guards_simulator(
        principal in principal_strategy(),
        rate in rate_strategy(),
        payment_cents in 1i64..=1_000_000i64,
    ) {
        let payment = Decimal::new(payment_cents, 2);
        let viable = classify(principal, solver::periodic_rate(rate), payment).viable;
        let result = simulate(principal, rate, payment, 12);
        prop_assert_eq!(viable, result.status != SimulationStatus::NonAmortizing);
        if !viable {
            prop_assert!(result.rows.is_empty());
            prop_assert!(result.ending_balance.is_none());
        }
    }

    /// The balloon is the full schedule's balance at the cutoff, or zero once
    /// the loan has amortized.
    #[test]
    fn balloon_matches_full_schedule(
        principal in principal_strategy(),
        rate in rate_strategy(),
        term in 2u32..=480u32,
        cutoff_seed in any::<u32>(),
    ) {
        let terms = LoanTerms::new(principal, rate, term);
        let payment = terms.payment();
        let full = simulate(principal, rate, payment, term);
        let cutoff = cutoff_seed % (term + 24) + 1;
        let result = simulate_to_cutoff(&terms, payment, cutoff);

        if (cutoff as usize) < full.rows.len() {
            prop_assert_eq!(result.balloon_status, BalloonStatus::Due);
            prop_assert_eq!(
                result.balloon_amount,
                Some(full.rows[(cutoff - 1) as usize].ending_balance)
            );
        } else {
            prop_assert_eq!(result.balloon_status, BalloonStatus::FullyAmortized);
            prop_assert_eq!(result.balloon_amount, Some(Decimal::ZERO));
        }
    }
}
