use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::add_months;
use crate::loan::payment::{assess_terms, checked_monthly_payment, monthly_rate};
use crate::types::*;

const MAX_PREALLOCATED_ROWS: u32 = 1200;

/// One scheduled payment of an amortizing loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    /// 1-based installment number.
    pub month: u32,
    pub date: NaiveDate,
    /// Amount due: `interest + capital`. This is the level monthly payment
    /// on every row but the last, which carries the settled amount.
    pub payment: Money,
    pub interest: Money,
    pub capital: Money,
    /// Capital still owed once this installment is paid.
    pub remaining_balance: Money,
}

/// Month-by-month amortization table for a level-payment loan.
///
/// Interest accrues on the outstanding balance each month and is rounded to
/// cents; the rest of the level payment repays capital. Rounding drift is
/// absorbed by the last installment: an overshoot shrinks its capital
/// portion, a residual enlarges it, so the table always closes at exactly
/// zero and the capital portions add up to the principal. Generation stops
/// early once the balance is repaid.
///
/// Installment `k` falls due `k - 1` months after `start_date`.
/// Degenerate terms, and amounts beyond the Decimal range, produce an
/// empty table.
pub fn amortization_schedule(
    principal: Money,
    annual_rate: Percent,
    duration_months: i64,
    start_date: NaiveDate,
) -> Vec<Installment> {
    if !assess_terms(principal, annual_rate, duration_months).is_valid() {
        return Vec::new();
    }
    let Ok(n) = u32::try_from(duration_months) else {
        return Vec::new();
    };
    build_schedule(principal, annual_rate, n, start_date).unwrap_or_default()
}

fn build_schedule(
    principal: Money,
    annual_rate: Percent,
    n: u32,
    start_date: NaiveDate,
) -> Option<Vec<Installment>> {
    let payment = checked_monthly_payment(principal, annual_rate, i64::from(n))?;
    let rate = monthly_rate(annual_rate);
    let mut balance = round_money(principal);
    let mut schedule = Vec::with_capacity(n.min(MAX_PREALLOCATED_ROWS) as usize);

    for month in 1..=n {
        let interest = round_money(balance.checked_mul(rate)?);
        let mut capital = payment.checked_sub(interest)?;
        balance = balance.checked_sub(capital)?;

        // Rounding overshoot on the way down
        if balance < Decimal::ZERO {
            capital += balance;
            balance = Decimal::ZERO;
        }
        // Residual left by a payment rounded down
        if month == n && balance > Decimal::ZERO {
            capital = capital.checked_add(balance)?;
            balance = Decimal::ZERO;
        }

        schedule.push(Installment {
            month,
            date: add_months(start_date, month - 1),
            payment: interest.checked_add(capital)?,
            interest,
            capital,
            remaining_balance: balance,
        });

        if balance.is_zero() {
            break;
        }
    }

    Some(schedule)
}
