use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use amortization_core::calendar::today;
use amortization_core::loan::analysis::{self, LoanInput};
use amortization_core::loan::{
    amortization_schedule, assess_terms, monthly_payment, remaining_capital, total_cost,
};

use crate::input;

/// Loan terms shared by every loan subcommand
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanTermsArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (3.5 = 3.5%)
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Duration in months
    #[arg(long, alias = "months")]
    pub duration_months: Option<u32>,

    /// First installment date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Valuation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

/// Arguments for the full loan analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub terms: LoanTermsArgs,

    /// Include the installment table
    #[arg(long)]
    pub schedule: bool,
}

impl LoanTermsArgs {
    /// Terms from `--input`/stdin when given, otherwise from the flags.
    fn resolve(&self, needs_start: bool) -> Result<LoanInput, Box<dyn std::error::Error>> {
        if let Some(loaded) = input::load::<LoanInput>(self.input.as_deref())? {
            return Ok(loaded);
        }
        let start_date = match self.start_date {
            Some(d) => d,
            None if needs_start => return Err("--start-date is required (or provide --input)".into()),
            None => today(),
        };
        Ok(LoanInput {
            principal: self.principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: self.annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            duration_months: self.duration_months
                .ok_or("--duration-months is required (or provide --input)")?,
            start_date,
            as_of: self.as_of,
            include_schedule: false,
        })
    }
}

pub fn run_payment(args: LoanTermsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = args.resolve(false)?;
    let n = i64::from(loan.duration_months);
    Ok(json!({
        "principal": loan.principal,
        "annual_rate": loan.annual_rate,
        "duration_months": loan.duration_months,
        "monthly_payment": monthly_payment(loan.principal, loan.annual_rate, n),
        "terms": assess_terms(loan.principal, loan.annual_rate, n),
    }))
}

pub fn run_remaining(args: LoanTermsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = args.resolve(true)?;
    let as_of = loan.as_of.unwrap_or_else(today);
    let remaining = remaining_capital(
        loan.principal,
        loan.annual_rate,
        i64::from(loan.duration_months),
        loan.start_date,
        as_of,
    );
    Ok(json!({
        "as_of": as_of,
        "start_date": loan.start_date,
        "remaining_capital": remaining,
    }))
}

pub fn run_schedule(args: LoanTermsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = args.resolve(true)?;
    let schedule = amortization_schedule(
        loan.principal,
        loan.annual_rate,
        i64::from(loan.duration_months),
        loan.start_date,
    );
    Ok(serde_json::to_value(schedule)?)
}

pub fn run_total_cost(args: LoanTermsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = args.resolve(false)?;
    let cost = total_cost(loan.principal, loan.annual_rate, i64::from(loan.duration_months));
    Ok(serde_json::to_value(cost)?)
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut loan = args.terms.resolve(true)?;
    loan.include_schedule |= args.schedule;
    let result = analysis::analyze_loan(&loan)?;
    Ok(serde_json::to_value(result)?)
}
