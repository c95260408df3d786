use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::calendar::{add_months, months_elapsed, today};
use crate::loan::cost::{total_cost, CostSummary};
use crate::loan::remaining::remaining_capital;
use crate::loan::schedule::{amortization_schedule, Installment};
use crate::{CreditError, CreditResult, types::*};

const LONG_DURATION_MONTHS: u32 = 600;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: Money,
    /// Annual rate in percent (3.5 = 3.5%).
    pub annual_rate: Percent,
    pub duration_months: u32,
    pub start_date: NaiveDate,
    /// Valuation date for the balances. Defaults to today.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
    /// Attach the full installment table to the output.
    #[serde(default)]
    pub include_schedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalysis {
    pub monthly_payment: Money,
    pub cost: CostSummary,
    /// Due date of the last installment.
    pub end_date: NaiveDate,
    pub as_of: NaiveDate,
    pub months_elapsed: i64,
    /// Linear estimate: principal minus payments made so far.
    pub remaining_capital_estimate: Money,
    /// Balance after the installments due so far, per the amortization table.
    pub amortized_balance: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<Installment>>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyse a loan end to end: payment, lifetime cost, both balance measures
/// at the valuation date and, on request, the installment table.
pub fn analyze_loan(input: &LoanInput) -> CreditResult<ComputationOutput<LoanAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let n = i64::from(input.duration_months);
    let as_of = input.as_of.unwrap_or_else(today);

    let cost = total_cost(input.principal, input.annual_rate, n);
    let schedule = amortization_schedule(input.principal, input.annual_rate, n, input.start_date);
    let elapsed = months_elapsed(input.start_date, as_of);

    let estimate = remaining_capital(input.principal, input.annual_rate, n, input.start_date, as_of);
    let amortized = amortized_balance(input, &schedule, elapsed, as_of);

    let gap = (estimate - amortized).abs();
    if gap > dec!(0.01) {
        warnings.push(format!(
            "Linear remaining-capital estimate ({estimate}) differs from the amortized balance ({amortized}) by {gap}"
        ));
    }
    if input.duration_months > LONG_DURATION_MONTHS {
        warnings.push(format!(
            "Duration of {} months exceeds {} months",
            input.duration_months, LONG_DURATION_MONTHS
        ));
    }
    if input.start_date > as_of {
        warnings.push(format!("Loan starts after the valuation date {as_of}"));
    }

    let output = LoanAnalysis {
        monthly_payment: cost.monthly_payment,
        cost,
        end_date: add_months(input.start_date, input.duration_months - 1),
        as_of,
        months_elapsed: elapsed,
        remaining_capital_estimate: estimate,
        amortized_balance: amortized,
        schedule: input.include_schedule.then_some(schedule),
    };

    let elapsed_us = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "monthly_rate": (input.annual_rate / dec!(1200)).to_string(),
        "months_elapsed_convention": "inclusive of start month",
        "rounding": "2dp, half-even",
    });

    Ok(with_metadata(
        "Level-payment amortization (French annuity)",
        &assumptions,
        warnings,
        elapsed_us,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn amortized_balance(
    input: &LoanInput,
    schedule: &[Installment],
    elapsed: i64,
    as_of: NaiveDate,
) -> Money {
    if input.start_date > as_of || elapsed <= 0 {
        return round_money(input.principal);
    }
    let paid = usize::try_from(elapsed).unwrap_or(usize::MAX);
    if paid >= schedule.len() {
        return Decimal::ZERO;
    }
    schedule[paid - 1].remaining_balance
}

fn validate_input(input: &LoanInput) -> CreditResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(CreditError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive.".into(),
        });
    }
    if input.annual_rate < Decimal::ZERO {
        return Err(CreditError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Annual rate cannot be negative.".into(),
        });
    }
    if input.duration_months == 0 {
        return Err(CreditError::InvalidInput {
            field: "duration_months".into(),
            reason: "Duration must be at least one month.".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
