use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::engine::solver;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.005 = 0.5% per period).
pub type Rate = Decimal;

/// Terms of a level-payment loan.
///
/// The annual rate is carried as a percentage (6 = 6% APR) because that is
/// what borrowers type; every engine entry point converts it through
/// [`solver::periodic_rate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_rate_percent: Decimal,
    pub periods_total: u32,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate_percent: Decimal, periods_total: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            periods_total,
        }
    }

    pub fn periodic_rate(&self) -> Rate {
        solver::periodic_rate(self.annual_rate_percent)
    }

    /// Level payment that retires the loan over `periods_total`.
    pub fn payment(&self) -> Money {
        solver::solve_payment(self.principal, self.annual_rate_percent, self.periods_total)
    }
}

/// Result-level status codes. Engine conditions are reported through these
/// rather than through `Err`, so a form can keep rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanWarning {
    NoPrincipal,
    /// Reserved for calculators that need a positive rate; every current
    /// calculator accepts a zero rate, so none raises it.
    NoRate,
    NoHorizon,
    NonAmortizingPayment,
    HorizonTruncated,
}

impl LoanWarning {
    pub fn code(&self) -> &'static str {
        match self {
            LoanWarning::NoPrincipal => "NO_PRINCIPAL",
            LoanWarning::NoRate => "NO_RATE",
            LoanWarning::NoHorizon => "NO_HORIZON",
            LoanWarning::NonAmortizingPayment => "NON_AMORTIZING_PAYMENT",
            LoanWarning::HorizonTruncated => "HORIZON_TRUNCATED",
        }
    }
}

impl fmt::Display for LoanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LoanWarning::NoPrincipal => "Loan amount must be greater than 0",
            LoanWarning::NoRate => "Interest rate must be greater than 0",
            LoanWarning::NoHorizon => "Loan term must be greater than 0",
            LoanWarning::NonAmortizingPayment => "Monthly payment is too low to reduce balance",
            LoanWarning::HorizonTruncated => {
                "Schedule truncated at 1200 periods (100 years of monthly payments)"
            }
        };
        f.write_str(text)
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Render warning codes as display text for the envelope.
pub fn warning_messages(warnings: &[LoanWarning]) -> Vec<String> {
    warnings.iter().map(|w| w.to_string()).collect()
}
