//! Closed-form level-payment algebra.
//!
//! Given three of {principal, periodic rate, period count, periodic payment}
//! these functions return the fourth without iterating. The rate itself has
//! no closed form and is always an input.

use log::{debug, warn};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanError;
use crate::types::{Money, Rate};
use crate::LoanResult;

/// Every calculator in the catalog compounds monthly.
pub const PERIODS_PER_YEAR: u32 = 12;

/// Raw period counts are rounded to this many places before `ceil`, so an
/// exact round trip (payment solved for n periods) does not become n + 1.
const PERIOD_ROUNDING_DP: u32 = 6;

/// Convert an APR percentage (6 = 6%) into the monthly decimal rate.
/// Negative inputs are treated as zero.
pub fn periodic_rate(annual_rate_percent: Decimal) -> Rate {
    if annual_rate_percent <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    annual_rate_percent / dec!(100) / Decimal::from(PERIODS_PER_YEAR)
}

/// `(1 + r)^-n`, or zero when `(1 + r)^n` overflows the decimal range.
fn discount_factor(rate: Rate, periods: u32) -> Decimal {
    match (Decimal::ONE + rate).checked_powu(u64::from(periods)) {
        Some(growth) if !growth.is_zero() => Decimal::ONE / growth,
        _ => Decimal::ZERO,
    }
}

/// Level periodic payment that retires `principal` over `periods_total`.
///
/// Returns zero when there is nothing to amortize (non-positive principal or
/// zero periods).
pub fn solve_payment(principal: Money, annual_rate_percent: Decimal, periods_total: u32) -> Money {
    if principal <= Decimal::ZERO || periods_total == 0 {
        return Decimal::ZERO;
    }

    let r = periodic_rate(annual_rate_percent);
    if r.is_zero() {
        return principal / Decimal::from(periods_total);
    }

    // P·r·(1+r)^n / ((1+r)^n − 1), rewritten over the discount factor so the
    // numerator cannot overflow on long terms.
    let discount = discount_factor(r, periods_total);
    let payment = principal
        .checked_mul(r)
        .and_then(|interest| interest.checked_div(Decimal::ONE - discount))
        .unwrap_or_else(|| {
            warn!("solve_payment: payment for principal={principal} r={r} exceeds decimal range");
            Decimal::MAX
        });
    debug!("solve_payment: principal={principal} r={r} n={periods_total} -> {payment}");
    payment
}

/// Number of whole periods a fixed payment needs to retire `principal`.
///
/// Fails with [`LoanError::NonAmortizingPayment`] when the payment does not
/// exceed the first period's interest, since the balance would never shrink.
pub fn solve_periods(
    principal: Money,
    annual_rate_percent: Decimal,
    payment: Money,
) -> LoanResult<u32> {
    if principal <= Decimal::ZERO {
        return Err(LoanError::NoPrincipal);
    }

    let r = periodic_rate(annual_rate_percent);
    // Interest beyond the decimal range can never be covered by a payment.
    let first_period_interest = principal.checked_mul(r).unwrap_or(Decimal::MAX);

    // Covers the zero-rate case too: a zero payment never reduces anything.
    if payment <= first_period_interest || payment <= Decimal::ZERO {
        return Err(LoanError::NonAmortizingPayment {
            payment,
            first_period_interest,
        });
    }

    let raw = if r.is_zero() {
        principal / payment
    } else {
        // Strictly inside (0, 1) given the guard above.
        let remaining_fraction = Decimal::ONE - first_period_interest / payment;
        let numerator = remaining_fraction
            .checked_ln()
            .ok_or_else(|| LoanError::NonAmortizingPayment {
                payment,
                first_period_interest,
            })?;
        let denominator = (Decimal::ONE + r).checked_ln().ok_or_else(|| {
            LoanError::InvalidInput {
                field: "annual_rate_percent".into(),
                reason: "Periodic growth factor has no logarithm".into(),
            }
        })?;
        if denominator.is_zero() {
            return Err(LoanError::InvalidInput {
                field: "annual_rate_percent".into(),
                reason: "Periodic rate too small to resolve".into(),
            });
        }
        -numerator / denominator
    };

    let periods = raw
        .round_dp(PERIOD_ROUNDING_DP)
        .ceil()
        .to_u32()
        .unwrap_or(u32::MAX);
    debug!("solve_periods: principal={principal} r={r} payment={payment} -> {periods}");
    Ok(periods)
}

/// Present value of `periods` level payments: the largest principal a given
/// payment can retire over the term.
pub fn solve_principal(annual_rate_percent: Decimal, periods: u32, payment: Money) -> Money {
    if payment <= Decimal::ZERO || periods == 0 {
        return Decimal::ZERO;
    }

    let r = periodic_rate(annual_rate_percent);
    let principal = if r.is_zero() {
        payment.checked_mul(Decimal::from(periods))
    } else {
        payment
            .checked_mul(Decimal::ONE - discount_factor(r, periods))
            .and_then(|annuity| annuity.checked_div(r))
    };
    principal.unwrap_or(Decimal::MAX)
}

/// Closed-form balance after `periods_elapsed` level payments:
/// `P(1+r)^k − pmt·((1+r)^k − 1)/r`, floored at zero.
///
/// `None` when an intermediate term leaves the decimal range, which happens
/// on long horizons at high rates even for loans that amortize. Callers fall
/// back to the simulated balance.
pub fn remaining_balance(
    principal: Money,
    annual_rate_percent: Decimal,
    payment: Money,
    periods_elapsed: u32,
) -> Option<Money> {
    if principal <= Decimal::ZERO {
        return Some(Decimal::ZERO);
    }

    let r = periodic_rate(annual_rate_percent);
    let k = Decimal::from(periods_elapsed);
    let balance = if r.is_zero() {
        principal.checked_sub(payment.checked_mul(k)?)?
    } else {
        let growth = (Decimal::ONE + r).checked_powu(u64::from(periods_elapsed))?;
        let accrued = principal.checked_mul(growth)?;
        let repaid = payment.checked_mul(growth - Decimal::ONE)?.checked_div(r)?;
        accrued.checked_sub(repaid)?
    };
    Some(balance.max(Decimal::ZERO))
}
