pub mod term_loan;
