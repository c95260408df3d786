mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loan::{AnalyzeArgs, LoanTermsArgs};
use commands::records::{PortfolioArgs, UpdateRecordArgs};

/// Fixed-rate loan amortization calculations
#[derive(Parser)]
#[command(
    name = "amort",
    version,
    about = "Fixed-rate loan amortization calculations",
    long_about = "A CLI for amortizing fixed-rate, fixed-payment loans with decimal \
                  precision. Computes monthly payments, remaining capital, installment \
                  tables and total cost, and refreshes stored credit records."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Level monthly payment for a loan
    Payment(LoanTermsArgs),
    /// Capital still owed at a valuation date
    Remaining(LoanTermsArgs),
    /// Month-by-month installment table
    Schedule(LoanTermsArgs),
    /// Total paid, total interest and effective rate
    TotalCost(LoanTermsArgs),
    /// Full loan analysis with consistency warnings
    Analyze(AnalyzeArgs),
    /// Recompute the derived fields of a stored credit record
    UpdateRecord(UpdateRecordArgs),
    /// Outstanding debt across a set of credit records
    Portfolio(PortfolioArgs),
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

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::loan::run_payment(args),
        Commands::Remaining(args) => commands::loan::run_remaining(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::TotalCost(args) => commands::loan::run_total_cost(args),
        Commands::Analyze(args) => commands::loan::run_analyze(args),
        Commands::UpdateRecord(args) => commands::records::run_update_record(args),
        Commands::Portfolio(args) => commands::records::run_portfolio(args),
        Commands::Version => {
            println!("amort {}", env!("CARGO_PKG_VERSION"));
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
