use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calendar::{months_elapsed, today};
use crate::loan::payment::checked_monthly_payment;
use crate::types::*;

/// Outstanding capital as of `as_of`, estimated linearly.
///
/// Capital repaid is taken as `monthly_payment * months_elapsed`, treating
/// every installment as pure capital. This overstates early repayment
/// compared with the amortization schedule, whose early installments are
/// interest-heavy; the two figures are not interchangeable.
///
/// A loan that has not started yet owes its full principal; a loan past its
/// final month owes nothing. Figures beyond the Decimal range yield zero.
pub fn remaining_capital(
    principal: Money,
    annual_rate: Percent,
    duration_months: i64,
    start_date: NaiveDate,
    as_of: NaiveDate,
) -> Money {
    checked_remaining_capital(principal, annual_rate, duration_months, start_date, as_of)
        .unwrap_or(Decimal::ZERO)
}

/// [`remaining_capital`], with `None` when the payments overflow Decimal.
pub fn checked_remaining_capital(
    principal: Money,
    annual_rate: Percent,
    duration_months: i64,
    start_date: NaiveDate,
    as_of: NaiveDate,
) -> Option<Money> {
    if principal <= Decimal::ZERO {
        return Some(Decimal::ZERO);
    }
    if start_date > as_of {
        return Some(principal);
    }

    let elapsed = months_elapsed(start_date, as_of);
    if elapsed >= duration_months {
        return Some(Decimal::ZERO);
    }

    let payment = checked_monthly_payment(principal, annual_rate, duration_months)?;
    let capital_repaid = payment.checked_mul(Decimal::from(elapsed))?;

    Some(round_money((principal - capital_repaid).max(Decimal::ZERO)))
}

/// [`remaining_capital`] as of today's local date.
pub fn remaining_capital_today(
    principal: Money,
    annual_rate: Percent,
    duration_months: i64,
    start_date: NaiveDate,
) -> Money {
    remaining_capital(principal, annual_rate, duration_months, start_date, today())
}
