use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::records::record::{CreditKind, CreditRecord};
use crate::records::updater::{update_credit_calculations_as_of, UpdateOutcome};
use crate::types::*;

/// Where a line's outstanding amount came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutstandingBasis {
    /// Remaining capital recomputed from the loan parameters.
    Computed,
    /// Parameters incomplete or malformed; the initial principal is counted.
    InitialPrincipal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioLine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub kind: CreditKind,
    pub outstanding: Money,
    pub monthly_payment: Money,
    pub basis: OutstandingBasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub lines: Vec<PortfolioLine>,
    pub total_outstanding: Money,
    pub total_monthly_payments: Money,
}

/// Total debt still owed across a household's credits as of `as_of`.
///
/// A credit is recomputed only when its principal, duration and start date
/// are all present and non-zero; otherwise, or when the recomputation
/// degrades, its initial principal counts in full.
pub fn total_outstanding(records: &[CreditRecord], as_of: NaiveDate) -> PortfolioSummary {
    let lines: Vec<PortfolioLine> = records.iter().map(|r| portfolio_line(r, as_of)).collect();

    let total_outstanding = round_money(saturating_total(lines.iter().map(|l| l.outstanding)));
    let total_monthly_payments =
        round_money(saturating_total(lines.iter().map(|l| l.monthly_payment)));

    PortfolioSummary {
        lines,
        total_outstanding,
        total_monthly_payments,
    }
}

fn portfolio_line(record: &CreditRecord, as_of: NaiveDate) -> PortfolioLine {
    let initial = initial_principal(record);

    let (outstanding, monthly_payment, basis) = if is_complete(record) {
        let report = update_credit_calculations_as_of(record.clone(), as_of);
        if report.outcome == UpdateOutcome::Degraded {
            (initial, record.monthly_payment_display(), OutstandingBasis::InitialPrincipal)
        } else {
            (
                report.record.remaining_capital_display(),
                report.record.monthly_payment_display(),
                OutstandingBasis::Computed,
            )
        }
    } else {
        (initial, record.monthly_payment_display(), OutstandingBasis::InitialPrincipal)
    };

    PortfolioLine {
        label: record.label.clone(),
        kind: record.kind.unwrap_or_default(),
        outstanding,
        monthly_payment,
        basis,
    }
}

/// Sum that pins at `Decimal::MAX` instead of overflowing.
fn saturating_total(amounts: impl Iterator<Item = Money>) -> Money {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn initial_principal(record: &CreditRecord) -> Money {
    record
        .principal
        .as_ref()
        .and_then(|p| p.to_decimal("principal").ok())
        .unwrap_or(Decimal::ZERO)
}

fn is_complete(record: &CreditRecord) -> bool {
    let has_principal = !initial_principal(record).is_zero();
    let has_duration = matches!(record.resolved_duration_months(), Ok(Some(n)) if n != 0);
    let has_start = record
        .start_date
        .as_deref()
        .is_some_and(|s| !s.trim().is_empty());
    has_principal && has_duration && has_start
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::record::NumericInput;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_complete_and_incomplete_credits() {
        let car = CreditRecord {
            kind: Some(CreditKind::Auto),
            label: Some("car".into()),
            ..CreditRecord::new(dec!(5000), dec!(6.5), 60, "01/2025")
        };
        let sofa = CreditRecord {
            kind: Some(CreditKind::Consumer),
            principal: Some(NumericInput::from(dec!(1500))),
            declared_monthly_payment: Some(dec!(50)),
            ..Default::default()
        };

        let summary = total_outstanding(&[car, sofa], date(2025, 12, 28));

        assert_eq!(summary.lines[0].basis, OutstandingBasis::Computed);
        assert_eq!(summary.lines[0].outstanding, dec!(3826.04));
        assert_eq!(summary.lines[1].basis, OutstandingBasis::InitialPrincipal);
        assert_eq!(summary.lines[1].outstanding, dec!(1500));
        assert_eq!(summary.total_outstanding, dec!(5326.04));
        assert_eq!(summary.total_monthly_payments, dec!(147.83));
    }

    #[test]
    fn test_malformed_credit_counts_initial_principal() {
        let record = CreditRecord::new(dec!(8000), "n/a", 48, "2024-03-01");
        let summary = total_outstanding(&[record], date(2025, 1, 1));
        assert_eq!(summary.lines[0].basis, OutstandingBasis::InitialPrincipal);
        assert_eq!(summary.total_outstanding, dec!(8000));
    }

    #[test]
    fn test_total_pins_at_decimal_max() {
        let huge = CreditRecord {
            principal: Some(NumericInput::from(dec!(50_000_000_000_000_000_000_000_000_000))),
            ..Default::default()
        };
        let summary = total_outstanding(&[huge.clone(), huge], date(2025, 1, 1));
        assert_eq!(summary.total_outstanding, Decimal::MAX);
    }

    #[test]
    fn test_empty_portfolio() {
        let summary = total_outstanding(&[], date(2025, 1, 1));
        assert!(summary.lines.is_empty());
        assert_eq!(summary.total_outstanding, Decimal::ZERO);
    }
}
