use loancalc_core::engine::schedule::{self, HARD_CAP_PERIODS, SPLIT_TOLERANCE};
use loancalc_core::engine::solver;
use loancalc_core::{
    apply_fees, classify, simulate, simulate_to_cutoff, solve_payment, solve_periods,
    BalloonStatus, FeeSpec, LoanError, LoanTerms, LoanWarning, SimulationStatus,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Payment solver
// ===========================================================================

#[test]
fn test_zero_rate_payment() {
    assert_eq!(solve_payment(dec!(12000), dec!(0), 12), dec!(1000));
}

#[test]
fn test_standard_annuity_payment() {
    let payment = solve_payment(dec!(100000), dec!(6), 360);
    assert!((payment - dec!(599.55)).abs() < dec!(0.01), "payment {payment}");
}

#[test]
fn test_payoff_time_round_trip() {
    let cases = [
        (dec!(100000), dec!(6), 360u32),
        (dec!(25000), dec!(4.9), 60),
        (dec!(8000), dec!(24.99), 18),
        (dec!(450000), dec!(3.125), 180),
        (dec!(9000), dec!(0), 36),
    ];
    for (principal, rate, n) in cases {
        let payment = solve_payment(principal, rate, n);
        let periods = solve_periods(principal, rate, payment).unwrap();
        assert_eq!(periods, n, "round trip for {principal} @ {rate}% over {n}");
    }
}

#[test]
fn test_solve_periods_rejects_non_amortizing() {
    let err = solve_periods(dec!(100000), dec!(8), dec!(500)).unwrap_err();
    assert!(matches!(err, LoanError::NonAmortizingPayment { .. }));
    assert!(err.to_string().contains("does not exceed first-period interest"));
}

// ===========================================================================
// Viability
// ===========================================================================

#[test]
fn test_classify_non_amortizing() {
    let v = classify(dec!(100000), dec!(0.08) / dec!(12), dec!(500));
    assert!(!v.viable);
    assert_eq!(v.reason, Some(LoanWarning::NonAmortizingPayment));
}

#[test]
fn test_classify_agrees_with_simulator() {
    let r = solver::periodic_rate(dec!(8));
    for payment in [dec!(500), dec!(666.66), dec!(666.67), dec!(700), dec!(1000)] {
        let viable = classify(dec!(100000), r, payment).viable;
        let sim = simulate(dec!(100000), dec!(8), payment, 600);
        assert_eq!(
            viable,
            sim.status != SimulationStatus::NonAmortizing,
            "payment {payment}"
        );
    }
}

// ===========================================================================
// Simulator
// ===========================================================================

#[test]
fn test_hard_cap_bounds_rows() {
    let result = simulate(dec!(100000), dec!(1.2), dec!(101), 100_000);
    assert!(result.rows.len() <= HARD_CAP_PERIODS as usize);
    assert_eq!(result.warning, Some(LoanWarning::HorizonTruncated));
}

#[test]
fn test_interest_beyond_decimal_range_is_non_amortizing() {
    let principal = dec!(1_000_000_000_000_000_000_000_000);
    let payment = dec!(1_000_000_000_000_000_000_000_000_000);
    let result = simulate(principal, dec!(100000000), payment, 12);
    assert_eq!(result.status, SimulationStatus::NonAmortizing);
    assert!(result.rows.is_empty());
    assert_eq!(result.warning, Some(LoanWarning::NonAmortizingPayment));
}

#[test]
fn test_schedule_rows_satisfy_invariants() {
    let payment = solve_payment(dec!(35000), dec!(9.75), 84);
    let result = simulate(dec!(35000), dec!(9.75), payment, 84);
    let mut prior = dec!(35000);
    for row in &result.rows {
        assert!(row.ending_balance >= Decimal::ZERO);
        assert!(row.interest_portion >= Decimal::ZERO);
        assert!(row.principal_portion >= Decimal::ZERO);
        assert!(row.principal_portion <= prior + SPLIT_TOLERANCE);
        assert!((row.interest_portion + row.principal_portion - row.payment).abs() < SPLIT_TOLERANCE);
        prior = row.ending_balance;
    }
    assert_eq!(result.status, SimulationStatus::Amortized);
}

#[test]
fn test_simulation_is_deterministic() {
    let a = simulate(dec!(72000), dec!(5.5), dec!(800), 240);
    let b = simulate(dec!(72000), dec!(5.5), dec!(800), 240);
    assert_eq!(a, b);
}

#[test]
fn test_present_value_inverts_payment() {
    for (principal, rate, n) in [(dec!(100000), dec!(6), 360u32), (dec!(9000), dec!(0), 36)] {
        let payment = solve_payment(principal, rate, n);
        let recovered = solver::solve_principal(rate, n, payment);
        assert!((recovered - principal).abs() < dec!(0.000001), "{principal} @ {rate}%");
    }
}

#[test]
fn test_closed_form_balance_matches_simulation() {
    let principal = dec!(300000);
    let rate = dec!(5);
    let payment = solve_payment(principal, rate, 360);
    let full = simulate(principal, rate, payment, 360);
    for k in [1u32, 12, 60, 84, 120, 240, 359] {
        let closed = solver::remaining_balance(principal, rate, payment, k).unwrap();
        let simulated = full.rows[(k - 1) as usize].ending_balance;
        assert!(
            (closed - simulated).abs() < dec!(0.000001),
            "period {k}: closed {closed} vs simulated {simulated}"
        );
    }
}

#[test]
fn test_annual_summary_totals_match_schedule() {
    let payment = solve_payment(dec!(50000), dec!(7), 60);
    let result = simulate(dec!(50000), dec!(7), payment, 60);
    let years = schedule::summarize_by_year(&result.rows);
    assert_eq!(years.len(), 5);
    let interest: Decimal = years.iter().map(|y| y.interest).sum();
    assert!((interest - result.total_interest.unwrap()).abs() < dec!(0.000001));
}

// ===========================================================================
// Cutoff policy
// ===========================================================================

#[test]
fn test_balloon_cutoff_idempotence() {
    let terms = LoanTerms::new(dec!(180000), dec!(6.25), 360);
    let payment = terms.payment();
    let full = simulate(terms.principal, terms.annual_rate_percent, payment, 360);
    for cutoff in [1u32, 36, 60, 84, 120, 359] {
        let result = simulate_to_cutoff(&terms, payment, cutoff);
        assert_eq!(result.balloon_status, BalloonStatus::Due);
        assert_eq!(
            result.balloon_amount,
            Some(full.rows[(cutoff - 1) as usize].ending_balance),
            "cutoff {cutoff}"
        );
        assert_eq!(result.simulation.rows, full.rows[..cutoff as usize].to_vec());
    }
}

#[test]
fn test_full_amortization_balloon_is_zero() {
    let terms = LoanTerms::new(dec!(40000), dec!(5), 48);
    let payment = terms.payment();
    for cutoff in [48u32, 49, 120, 5000] {
        let result = simulate_to_cutoff(&terms, payment, cutoff);
        assert_eq!(result.balloon_status, BalloonStatus::FullyAmortized);
        assert_eq!(result.balloon_amount, Some(Decimal::ZERO));
        assert_eq!(result.simulation.rows.len(), 48);
    }
}

#[test]
fn test_zero_cutoff_reports_validation_message() {
    let terms = LoanTerms::new(dec!(40000), dec!(5), 48);
    let result = simulate_to_cutoff(&terms, terms.payment(), 0);
    assert!(result.simulation.rows.is_empty());
    assert_eq!(
        result.validation_message.as_deref(),
        Some("balloon due time must be greater than 0")
    );
}

// ===========================================================================
// Fee financing
// ===========================================================================

#[test]
fn test_financed_percentage_fee() {
    let out = apply_fees(dec!(100000), &[FeeSpec::percent_of_principal(dec!(0.03), true)]);
    assert_eq!(out.financed_principal, dec!(103000));
}

#[test]
fn test_fees_feed_the_solver() {
    let fees = vec![
        FeeSpec::percent_of_principal(dec!(0.03), true),
        FeeSpec::flat(dec!(500), false),
    ];
    let out = apply_fees(dec!(100000), &fees);
    let with_fees = solve_payment(out.financed_principal, dec!(6), 360);
    let without = solve_payment(dec!(100000), dec!(6), 360);
    // Payment scales linearly with principal
    assert!((with_fees - without * dec!(1.03)).abs() < dec!(0.000001));
    assert_eq!(out.upfront_fees_total, dec!(500));
}
