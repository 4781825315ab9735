pub mod arm;
pub mod balloon;
pub mod credit_card;
pub mod engine;
pub mod sba;

/// Every subcommand yields the JSON envelope or a printable error.
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;
