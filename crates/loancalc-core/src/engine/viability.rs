use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{LoanWarning, Money, Rate};

/// Outcome of the pre-flight check on a fixed payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viability {
    pub viable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<LoanWarning>,
    /// Interest accruing in period one on the full principal.
    pub first_period_interest: Money,
    /// Smallest payment that still reduces the balance in period one.
    pub minimum_payment: Money,
}

/// Smallest increment a payment can move by.
const CENT: Decimal = dec!(0.01);

/// Decide whether `payment` ever reduces `principal` at `periodic_rate`.
///
/// A payment that does not exceed the first period's interest leaves the
/// balance flat or growing; the schedule must not be simulated in that case.
/// A non-positive payment is treated the same way even at a zero rate.
/// Interest that overflows the decimal range saturates at `Decimal::MAX`,
/// which no payment exceeds.
pub fn classify(principal: Money, periodic_rate: Rate, payment: Money) -> Viability {
    let r = periodic_rate.max(Decimal::ZERO);
    let first_period_interest = principal
        .max(Decimal::ZERO)
        .checked_mul(r)
        .unwrap_or(Decimal::MAX);
    let minimum_payment = first_period_interest.saturating_add(CENT);

    if principal <= Decimal::ZERO {
        return Viability {
            viable: false,
            reason: Some(LoanWarning::NoPrincipal),
            first_period_interest,
            minimum_payment: Decimal::ZERO,
        };
    }

    let viable = payment > Decimal::ZERO && payment > first_period_interest;
    Viability {
        viable,
        reason: (!viable).then_some(LoanWarning::NonAmortizingPayment),
        first_period_interest,
        minimum_payment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_below_interest_not_viable() {
        // $500 against $666.67 of monthly interest on $100k at 8%
        let v = classify(dec!(100000), dec!(0.08) / dec!(12), dec!(500));
        assert!(!v.viable);
        assert_eq!(v.reason, Some(LoanWarning::NonAmortizingPayment));
        assert!((v.first_period_interest - dec!(666.67)).abs() < dec!(0.01));
    }

    #[test]
    fn test_payment_equal_to_interest_not_viable() {
        let v = classify(dec!(10000), dec!(0.01), dec!(100));
        assert!(!v.viable);
    }

    #[test]
    fn test_payment_above_interest_viable() {
        let v = classify(dec!(10000), dec!(0.01), dec!(100.01));
        assert!(v.viable);
        assert_eq!(v.reason, None);
        assert_eq!(v.minimum_payment, dec!(100.01));
    }

    #[test]
    fn test_zero_rate_any_positive_payment_viable() {
        let v = classify(dec!(5000), Decimal::ZERO, dec!(1));
        assert!(v.viable);
        assert_eq!(v.first_period_interest, Decimal::ZERO);
    }

    #[test]
    fn test_zero_payment_zero_rate_not_viable() {
        let v = classify(dec!(5000), Decimal::ZERO, Decimal::ZERO);
        assert!(!v.viable);
        assert_eq!(v.reason, Some(LoanWarning::NonAmortizingPayment));
    }

    #[test]
    fn test_no_principal() {
        let v = classify(Decimal::ZERO, dec!(0.01), dec!(100));
        assert!(!v.viable);
        assert_eq!(v.reason, Some(LoanWarning::NoPrincipal));
    }

    #[test]
    fn test_interest_beyond_decimal_range_not_viable() {
        let principal = dec!(1_000_000_000_000_000_000_000_000);
        let v = classify(principal, dec!(83333.33), dec!(1_000_000_000_000_000_000_000_000_000));
        assert!(!v.viable);
        assert_eq!(v.reason, Some(LoanWarning::NonAmortizingPayment));
        assert_eq!(v.first_period_interest, Decimal::MAX);
        assert_eq!(v.minimum_payment, Decimal::MAX);
    }
}
