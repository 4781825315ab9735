use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LoanError;
use crate::types::{Money, Rate};
use crate::LoanResult;

/// How a fee is quoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeAmount {
    /// Fixed currency amount.
    Flat(Money),
    /// Fraction of the original principal (0.03 = 3%).
    PercentOfPrincipal(Rate),
}

/// A single origination fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub amount: FeeAmount,
    /// Rolled into the loan balance when true, paid at closing otherwise.
    #[serde(default)]
    pub financed: bool,
}

impl FeeSpec {
    pub fn flat(amount: Money, financed: bool) -> Self {
        Self {
            label: None,
            amount: FeeAmount::Flat(amount),
            financed,
        }
    }

    pub fn percent_of_principal(fraction: Rate, financed: bool) -> Self {
        Self {
            label: None,
            amount: FeeAmount::PercentOfPrincipal(fraction),
            financed,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Currency amount of this fee against `principal`.
    pub fn resolve(&self, principal: Money) -> Money {
        match self.amount {
            FeeAmount::Flat(amount) => amount,
            FeeAmount::PercentOfPrincipal(fraction) => principal * fraction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFee {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub amount: Money,
    pub financed: bool,
}

/// Principal after rolling in financed fees, plus what is still owed upfront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub original_principal: Money,
    pub financed_principal: Money,
    pub financed_fees_total: Money,
    pub upfront_fees_total: Money,
    pub fees: Vec<ResolvedFee>,
}

/// Split `fees` into the financed balance and the upfront total.
///
/// Percentage fees are taken on the original principal, never on the
/// financed one. Upfront fees are reported only and do not touch the
/// amortized balance.
pub fn apply_fees(principal: Money, fees: &[FeeSpec]) -> FeeBreakdown {
    let mut financed_fees_total = Decimal::ZERO;
    let mut upfront_fees_total = Decimal::ZERO;
    let mut resolved: Vec<ResolvedFee> = Vec::with_capacity(fees.len());

    for fee in fees {
        let amount = fee.resolve(principal);
        if fee.financed {
            financed_fees_total += amount;
        } else {
            upfront_fees_total += amount;
        }
        resolved.push(ResolvedFee {
            label: fee.label.clone(),
            amount,
            financed: fee.financed,
        });
    }

    FeeBreakdown {
        original_principal: principal,
        financed_principal: principal + financed_fees_total,
        financed_fees_total,
        upfront_fees_total,
        fees: resolved,
    }
}

/// Reject negative fee quotes before they reach [`apply_fees`].
pub fn validate_fees(fees: &[FeeSpec]) -> LoanResult<()> {
    for (i, fee) in fees.iter().enumerate() {
        let negative = match fee.amount {
            FeeAmount::Flat(amount) => amount < Decimal::ZERO,
            FeeAmount::PercentOfPrincipal(fraction) => fraction < Decimal::ZERO,
        };
        if negative {
            return Err(LoanError::InvalidInput {
                field: format!("fees[{i}]"),
                reason: "Fee amount cannot be negative".into(),
            });
        }
    }
    Ok(())
}
