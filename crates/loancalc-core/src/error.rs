use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("No principal: loan amount must be greater than 0")]
    NoPrincipal,

    #[error("Non-amortizing payment: payment {payment} does not exceed first-period interest {first_period_interest}")]
    NonAmortizingPayment {
        payment: Decimal,
        first_period_interest: Decimal,
    },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LoanError {
    fn from(e: serde_json::Error) -> Self {
        LoanError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_non_amortizing_message_names_both_amounts() {
        let err = LoanError::NonAmortizingPayment {
            payment: dec!(500),
            first_period_interest: dec!(666.67),
        };
        assert_eq!(
            err.to_string(),
            "Non-amortizing payment: payment 500 does not exceed first-period interest 666.67"
        );
    }

    #[test]
    fn test_json_errors_become_serialization_errors() {
        let err: LoanError = serde_json::from_str::<Decimal>("{").unwrap_err().into();
        assert!(matches!(err, LoanError::SerializationError(_)));
    }
}
