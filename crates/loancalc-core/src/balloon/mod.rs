pub mod balloon_loan;
