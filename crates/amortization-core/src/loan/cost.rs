use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::loan::payment::checked_monthly_payment;
use crate::types::*;

/// Lifetime cost of a loan paid exactly as scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    pub principal: Money,
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    /// Total interest as a percentage of principal.
    pub effective_rate: Percent,
}

/// Totals over `duration_months` level payments. When the totals leave the
/// Decimal range nothing is reported as paid and the rates read zero.
pub fn total_cost(principal: Money, annual_rate: Percent, duration_months: i64) -> CostSummary {
    checked_total_cost(principal, annual_rate, duration_months).unwrap_or_else(|| CostSummary {
        principal: round_money(principal),
        monthly_payment: Decimal::ZERO,
        total_paid: Decimal::ZERO,
        total_interest: Decimal::ZERO,
        effective_rate: Decimal::ZERO,
    })
}

/// [`total_cost`], with `None` when any total overflows Decimal.
pub fn checked_total_cost(
    principal: Money,
    annual_rate: Percent,
    duration_months: i64,
) -> Option<CostSummary> {
    let payment = checked_monthly_payment(principal, annual_rate, duration_months)?;
    let total_paid = payment.checked_mul(Decimal::from(duration_months.max(0)))?;
    let total_interest = total_paid.checked_sub(principal)?;

    let effective_rate = if principal > Decimal::ZERO {
        round_money(total_interest.checked_div(principal)?.checked_mul(dec!(100))?)
    } else {
        Decimal::ZERO
    };

    Some(CostSummary {
        principal: round_money(principal),
        monthly_payment: payment,
        total_paid: round_money(total_paid),
        total_interest: round_money(total_interest),
        effective_rate,
    })
}
