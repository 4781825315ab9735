pub mod cutoff;
pub mod fees;
pub mod schedule;
pub mod solver;
pub mod viability;
