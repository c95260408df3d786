use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Classification of a set of loan terms.
///
/// The calculators answer degenerate terms with a neutral value (a zero
/// payment, an empty schedule); this tells callers which case they are in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermsStatus {
    Valid,
    NonPositivePrincipal,
    NegativeRate,
    NonPositiveDuration,
}

impl TermsStatus {
    pub fn is_valid(self) -> bool {
        self == TermsStatus::Valid
    }
}

pub fn assess_terms(principal: Money, annual_rate: Percent, duration_months: i64) -> TermsStatus {
    if principal <= Decimal::ZERO {
        TermsStatus::NonPositivePrincipal
    } else if annual_rate < Decimal::ZERO {
        TermsStatus::NegativeRate
    } else if duration_months <= 0 {
        TermsStatus::NonPositiveDuration
    } else {
        TermsStatus::Valid
    }
}

/// Convert an annual percentage into a monthly decimal rate (3.0 -> 0.0025).
pub fn monthly_rate(annual_rate: Percent) -> Rate {
    annual_rate / dec!(100) / dec!(12)
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
/// `None` once the factor leaves the Decimal range.
pub(crate) fn compound(rate: Rate, n: u32) -> Option<Decimal> {
    let factor = Decimal::ONE.checked_add(rate)?;
    if factor == Decimal::ONE {
        return Some(Decimal::ONE);
    }
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result.checked_mul(factor)?;
    }
    Some(result)
}

/// Level monthly installment for a fully amortizing loan, rounded to cents.
///
/// M = P * r * (1+r)^n / ((1+r)^n - 1), or P / n when the rate is zero.
/// Degenerate terms (see [`assess_terms`]) and payments beyond the Decimal
/// range yield zero.
pub fn monthly_payment(principal: Money, annual_rate: Percent, duration_months: i64) -> Money {
    checked_monthly_payment(principal, annual_rate, duration_months).unwrap_or(Decimal::ZERO)
}

/// [`monthly_payment`], with `None` when the payment overflows Decimal.
pub fn checked_monthly_payment(
    principal: Money,
    annual_rate: Percent,
    duration_months: i64,
) -> Option<Money> {
    if !assess_terms(principal, annual_rate, duration_months).is_valid() {
        return Some(Decimal::ZERO);
    }
    let Ok(n) = u32::try_from(duration_months) else {
        return Some(Decimal::ZERO);
    };

    let r = monthly_rate(annual_rate);
    if r.is_zero() {
        return Some(round_money(principal / Decimal::from(n)));
    }

    // For very long or very expensive loans (1+r)^n overflows and the
    // annuity factor has converged to 1, leaving an interest-only payment.
    let annuity = match compound(r, n) {
        Some(factor) if factor > Decimal::ONE => factor.checked_div(factor - Decimal::ONE)?,
        Some(_) => return Some(round_money(principal / Decimal::from(n))),
        None => Decimal::ONE,
    };

    principal.checked_mul(r)?.checked_mul(annuity).map(round_money)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_principal_pays_nothing() {
        assert_eq!(monthly_payment(Decimal::ZERO, dec!(3.0), 12), Decimal::ZERO);
        assert_eq!(monthly_payment(Decimal::ZERO, Decimal::ZERO, 240), Decimal::ZERO);
    }

    #[test]
    fn test_degenerate_terms_pay_nothing() {
        assert_eq!(monthly_payment(dec!(-500), dec!(3.0), 12), Decimal::ZERO);
        assert_eq!(monthly_payment(dec!(10_000), dec!(-1), 12), Decimal::ZERO);
        assert_eq!(monthly_payment(dec!(10_000), dec!(3.0), 0), Decimal::ZERO);
        assert_eq!(monthly_payment(dec!(10_000), dec!(3.0), -6), Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        assert_eq!(monthly_payment(dec!(5000), Decimal::ZERO, 10), dec!(500.00));
        // 1000 / 3 = 333.333.. -> 333.33
        assert_eq!(monthly_payment(dec!(1000), Decimal::ZERO, 3), dec!(333.33));
    }

    #[test]
    fn test_reference_consumer_loan() {
        // 10k at 3% over 12 months: r = 0.0025, (1.0025)^12 = 1.0304159569
        assert_eq!(monthly_payment(dec!(10_000), dec!(3.0), 12), dec!(846.94));
    }

    #[test]
    fn test_reference_car_loan() {
        // 5k at 6.5% over 60 months
        assert_eq!(monthly_payment(dec!(5000), dec!(6.5), 60), dec!(97.83));
    }

    #[test]
    fn test_payment_is_rounded_to_cents() {
        let pmt = monthly_payment(dec!(215_000), dec!(3.35), 300);
        assert_eq!(pmt, pmt.round_dp(2));
        assert!(pmt > dec!(1050) && pmt < dec!(1060), "PMT = {}", pmt);
    }

    #[test]
    fn test_overflowing_compound_falls_back_to_interest_only() {
        // 1200% a year is 100% a month; 2^1200 leaves the Decimal range
        let pmt = monthly_payment(dec!(1000), dec!(1200), 1200);
        assert_eq!(pmt, dec!(1000));
    }

    #[test]
    fn test_payment_beyond_decimal_range_is_zero() {
        // Interest alone on the largest principal exceeds Decimal::MAX
        assert_eq!(checked_monthly_payment(Decimal::MAX, dec!(3.0), 1), None);
        assert_eq!(monthly_payment(Decimal::MAX, dec!(3.0), 1), Decimal::ZERO);
        // 1e27 % a year on a million
        let rate = Decimal::from_scientific("1e27").unwrap();
        assert_eq!(checked_monthly_payment(dec!(1_000_000), rate, 12), None);
        assert_eq!(monthly_payment(dec!(1_000_000), rate, 12), Decimal::ZERO);
    }

    #[test]
    fn test_compound_bounds() {
        assert_eq!(compound(dec!(0.0025), 0), Some(Decimal::ONE));
        assert_eq!(compound(dec!(1), 10), Some(dec!(1024)));
        assert_eq!(compound(dec!(1), 1200), None);
    }

    #[test]
    fn test_assess_terms() {
        assert_eq!(assess_terms(dec!(1), dec!(0), 1), TermsStatus::Valid);
        assert_eq!(assess_terms(dec!(0), dec!(1), 1), TermsStatus::NonPositivePrincipal);
        assert_eq!(assess_terms(dec!(1), dec!(-0.1), 1), TermsStatus::NegativeRate);
        assert_eq!(assess_terms(dec!(1), dec!(1), 0), TermsStatus::NonPositiveDuration);
    }

    #[test]
    fn test_monthly_rate_conversion() {
        assert_eq!(monthly_rate(dec!(3.0)), dec!(0.0025));
        assert_eq!(monthly_rate(Decimal::ZERO), Decimal::ZERO);
    }
}
