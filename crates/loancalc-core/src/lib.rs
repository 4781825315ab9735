pub mod engine;
pub mod error;
pub mod types;

#[cfg(feature = "balloon")]
pub mod balloon;

#[cfg(feature = "sba")]
pub mod sba;

#[cfg(feature = "credit_card")]
pub mod credit_card;

#[cfg(feature = "arm")]
pub mod arm;

pub use engine::cutoff::{simulate_to_cutoff, BalloonStatus, CutoffResult};
pub use engine::fees::{apply_fees, FeeAmount, FeeBreakdown, FeeSpec};
pub use engine::schedule::{simulate, ScheduleRow, SimulationResult, SimulationStatus};
pub use engine::solver::{solve_payment, solve_periods};
pub use engine::viability::{classify, Viability};
pub use error::LoanError;
pub use types::*;

/// Standard result type for all loancalc operations
pub type LoanResult<T> = Result<T, LoanError>;
