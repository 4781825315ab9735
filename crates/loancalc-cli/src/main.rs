mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::arm::ArmArgs;
use commands::balloon::BalloonArgs;
use commands::credit_card::PayoffArgs;
use commands::engine::{
    ClassifyArgs, FeesArgs, PaymentArgs, PeriodsArgs, PrincipalArgs, ScheduleArgs,
};
use commands::sba::TermLoanArgs;

/// Loan payment, payoff and amortization calculations
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Loan payment, payoff and amortization calculations",
    long_about = "A CLI for fixed-rate loan arithmetic with decimal precision. Solves for \
                  payments and payoff times, simulates amortization schedules, and \
                  analyzes balloon, SBA term, credit card and adjustable-rate loans."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log progress to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve for the level payment that retires a loan
    Payment(PaymentArgs),
    /// Solve for the number of payments a fixed payment needs
    Periods(PeriodsArgs),
    /// Solve for the largest principal a payment can retire
    Principal(PrincipalArgs),
    /// Simulate a month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Check whether a payment reduces the balance at all
    Classify(ClassifyArgs),
    /// Split origination fees into financed and upfront amounts
    Fees(FeesArgs),
    /// Balloon loan: payment over the amortization term, residual at the due date
    Balloon(BalloonArgs),
    /// SBA-style term loan with financed fees
    Sba(TermLoanArgs),
    /// Credit card payoff by fixed payment or target months
    CreditCard(PayoffArgs),
    /// Adjustable-rate mortgage with one reset
    Arm(ArmArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: commands::CliResult<serde_json::Value> = match cli.command {
        Commands::Payment(args) => commands::engine::run_payment(args),
        Commands::Periods(args) => commands::engine::run_periods(args),
        Commands::Principal(args) => commands::engine::run_principal(args),
        Commands::Schedule(args) => commands::engine::run_schedule(args),
        Commands::Classify(args) => commands::engine::run_classify(args),
        Commands::Fees(args) => commands::engine::run_fees(args),
        Commands::Balloon(args) => commands::balloon::run_balloon(args),
        Commands::Sba(args) => commands::sba::run_term_loan(args),
        Commands::CreditCard(args) => commands::credit_card::run_payoff(args),
        Commands::Arm(args) => commands::arm::run_arm(args),
        Commands::Version => {
            println!("loancalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
