use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use amortization_core::calendar::today;
use amortization_core::records::{self, CreditRecord};

use crate::input;

/// Arguments for recomputing a single credit record
#[derive(Args)]
pub struct UpdateRecordArgs {
    /// Path to a JSON/YAML credit record (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Valuation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

/// Arguments for aggregating outstanding debt across records
#[derive(Args)]
pub struct PortfolioArgs {
    /// Path to a JSON/YAML array of credit records (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Valuation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

pub fn run_update_record(args: UpdateRecordArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let record: CreditRecord = input::load(args.input.as_deref())?
        .ok_or("--input <record.json> or stdin required for record update")?;
    let as_of = args.as_of.unwrap_or_else(today);
    let report = records::update_credit_calculations_as_of(record, as_of);
    Ok(serde_json::to_value(report)?)
}

pub fn run_portfolio(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let credits: Vec<CreditRecord> = input::load(args.input.as_deref())?
        .ok_or("--input <records.json> or stdin required for portfolio totals")?;
    let as_of = args.as_of.unwrap_or_else(today);
    let summary = records::total_outstanding(&credits, as_of);
    Ok(serde_json::to_value(summary)?)
}
