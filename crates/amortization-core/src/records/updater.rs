use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calendar::{months_elapsed, parse_start_date, today};
use crate::loan::{checked_monthly_payment, checked_remaining_capital};
use crate::records::record::CreditRecord;
use crate::{CreditError, CreditResult, types::*};

/// How a recomputation went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// Every input was present and well formed.
    Computed,
    /// Derived fields were computed, but some inputs were absent or
    /// unparsable dates and were replaced by defaults.
    Defaulted,
    /// A numeric input was malformed or drove a figure out of range;
    /// derived fields hold fallback values.
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateReport {
    pub record: CreditRecord,
    pub outcome: UpdateOutcome,
    /// Every problem absorbed during the recomputation.
    pub issues: Vec<CreditError>,
}

/// All derived fields, computed before any of them is written back.
struct DerivedFields {
    monthly_payment: Money,
    remaining_capital: Money,
    start_date: NaiveDate,
    months_elapsed: i64,
    months_remaining: i64,
    percentage_repaid: Decimal,
}

/// Recompute a record's derived fields as of today.
pub fn update_credit_calculations(record: CreditRecord) -> UpdateReport {
    update_credit_calculations_as_of(record, today())
}

/// Recompute a record's derived fields as of `as_of`.
///
/// Never fails. Absent numeric fields count as zero and an absent or
/// unparsable start date becomes `as_of`. A malformed number leaves the
/// monthly payment at its prior value (or zero), resets the remaining
/// capital to the principal, and writes no other derived field; so does
/// an input that pushes a derived figure beyond the Decimal range.
pub fn update_credit_calculations_as_of(mut record: CreditRecord, as_of: NaiveDate) -> UpdateReport {
    let mut issues = Vec::new();

    match derive_fields(&record, as_of, &mut issues) {
        Ok(derived) => {
            debug!(
                "credit recomputed: payment={} remaining={} elapsed={}",
                derived.monthly_payment, derived.remaining_capital, derived.months_elapsed
            );
            record.monthly_payment = Some(derived.monthly_payment);
            record.remaining_capital = Some(derived.remaining_capital);
            record.start_date_parsed = Some(derived.start_date);
            record.months_elapsed = Some(derived.months_elapsed);
            record.months_remaining = Some(derived.months_remaining);
            record.percentage_repaid = Some(derived.percentage_repaid);
        }
        Err(err) => {
            warn!("credit recomputation failed, keeping fallback values: {err}");
            let principal = record
                .principal
                .as_ref()
                .and_then(|p| p.to_decimal("principal").ok())
                .unwrap_or(Decimal::ZERO);
            record.monthly_payment = Some(record.monthly_payment.unwrap_or(Decimal::ZERO));
            record.remaining_capital = Some(principal);
            issues.push(err);
        }
    }

    let outcome = if issues.is_empty() {
        UpdateOutcome::Computed
    } else if issues.iter().any(|e| {
        matches!(e, CreditError::MalformedNumber { .. } | CreditError::Overflow { .. })
    }) {
        UpdateOutcome::Degraded
    } else {
        UpdateOutcome::Defaulted
    };

    UpdateReport {
        record,
        outcome,
        issues,
    }
}

fn derive_fields(
    record: &CreditRecord,
    as_of: NaiveDate,
    issues: &mut Vec<CreditError>,
) -> CreditResult<DerivedFields> {
    let principal = match &record.principal {
        Some(p) => p.to_decimal("principal")?,
        None => {
            issues.push(missing("principal"));
            Decimal::ZERO
        }
    };
    let annual_rate = match &record.annual_rate {
        Some(r) => r.to_decimal("annual_rate")?,
        None => {
            issues.push(missing("annual_rate"));
            Decimal::ZERO
        }
    };
    let duration = match record.resolved_duration_months()? {
        Some(n) => n,
        None => {
            issues.push(missing("duration_months"));
            0
        }
    };
    let start_date = resolve_start_date(record.start_date.as_deref(), as_of, issues);

    let payment = checked_monthly_payment(principal, annual_rate, duration)
        .ok_or_else(|| overflow("monthly_payment"))?;
    let remaining = checked_remaining_capital(principal, annual_rate, duration, start_date, as_of)
        .ok_or_else(|| overflow("remaining_capital"))?;
    let elapsed = months_elapsed(start_date, as_of);
    let months_remaining = duration
        .checked_sub(elapsed)
        .ok_or_else(|| overflow("months_remaining"))?
        .max(0);

    let percentage_repaid = if principal > Decimal::ZERO {
        ((principal - remaining) / principal * dec!(100)).round_dp(1)
    } else {
        Decimal::ZERO
    };

    Ok(DerivedFields {
        monthly_payment: payment,
        remaining_capital: remaining,
        start_date,
        months_elapsed: elapsed,
        months_remaining,
        percentage_repaid,
    })
}

fn resolve_start_date(
    text: Option<&str>,
    as_of: NaiveDate,
    issues: &mut Vec<CreditError>,
) -> NaiveDate {
    match text {
        None => {
            issues.push(missing("start_date"));
            as_of
        }
        Some(t) if t.trim().is_empty() => {
            issues.push(missing("start_date"));
            as_of
        }
        Some(t) => match parse_start_date(t) {
            Some(d) => d,
            None => {
                warn!("unparsable start date {t:?}, using {as_of}");
                issues.push(CreditError::MalformedDate { value: t.to_string() });
                as_of
            }
        },
    }
}

fn overflow(field: &str) -> CreditError {
    CreditError::Overflow {
        field: field.into(),
    }
}

fn missing(field: &str) -> CreditError {
    CreditError::MissingField {
        field: field.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::record::NumericInput;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_complete_record() {
        let record = CreditRecord::new(dec!(5000), dec!(6.5), 60, "2025-01");
        let report = update_credit_calculations_as_of(record, date(2025, 12, 28));
        let r = &report.record;

        assert_eq!(report.outcome, UpdateOutcome::Computed);
        assert!(report.issues.is_empty());
        assert_eq!(r.monthly_payment, Some(dec!(97.83)));
        assert_eq!(r.remaining_capital, Some(dec!(3826.04)));
        assert_eq!(r.start_date_parsed, Some(date(2025, 1, 1)));
        assert_eq!(r.months_elapsed, Some(12));
        assert_eq!(r.months_remaining, Some(48));
        // (5000 - 3826.04) / 5000 = 23.4792%
        assert_eq!(r.percentage_repaid, Some(dec!(23.5)));
    }

    #[test]
    fn test_unparsable_date_uses_as_of() {
        let record = CreditRecord::new(dec!(10_000), dec!(3.0), 12, "sometime in spring");
        let as_of = date(2025, 4, 10);
        let report = update_credit_calculations_as_of(record, as_of);

        assert_eq!(report.outcome, UpdateOutcome::Defaulted);
        assert_eq!(report.record.start_date_parsed, Some(as_of));
        assert_eq!(report.record.months_elapsed, Some(1));
        assert_eq!(report.record.monthly_payment, Some(dec!(846.94)));
        assert!(matches!(report.issues[0], CreditError::MalformedDate { .. }));
    }

    #[test]
    fn test_malformed_number_degrades() {
        let mut record = CreditRecord::new(dec!(10_000), "three percent", 12, "2025-01-01");
        record.monthly_payment = Some(dec!(850));
        record.months_elapsed = Some(7);
        let report = update_credit_calculations_as_of(record, date(2025, 6, 1));
        let r = &report.record;

        assert_eq!(report.outcome, UpdateOutcome::Degraded);
        assert_eq!(r.monthly_payment, Some(dec!(850)));
        assert_eq!(r.remaining_capital, Some(dec!(10_000)));
        // untouched
        assert_eq!(r.months_elapsed, Some(7));
        assert_eq!(r.start_date_parsed, None);
        assert_eq!(r.percentage_repaid, None);
    }

    #[test]
    fn test_malformed_principal_falls_back_to_zero() {
        let record = CreditRecord::new("lots", dec!(3.0), 12, "2025-01-01");
        let report = update_credit_calculations_as_of(record, date(2025, 6, 1));
        assert_eq!(report.outcome, UpdateOutcome::Degraded);
        assert_eq!(report.record.monthly_payment, Some(Decimal::ZERO));
        assert_eq!(report.record.remaining_capital, Some(Decimal::ZERO));
    }

    #[test]
    fn test_empty_record_defaults_everything() {
        let as_of = date(2025, 6, 1);
        let report = update_credit_calculations_as_of(CreditRecord::default(), as_of);
        let r = &report.record;

        assert_eq!(report.outcome, UpdateOutcome::Defaulted);
        assert_eq!(report.issues.len(), 4);
        assert_eq!(r.monthly_payment, Some(Decimal::ZERO));
        assert_eq!(r.remaining_capital, Some(Decimal::ZERO));
        assert_eq!(r.start_date_parsed, Some(as_of));
        assert_eq!(r.months_remaining, Some(0));
        assert_eq!(r.percentage_repaid, Some(Decimal::ZERO));
    }

    #[test]
    fn test_future_loan() {
        let record = CreditRecord::new(dec!(12_000), dec!(0), 12, "09/2025");
        let report = update_credit_calculations_as_of(record, date(2025, 6, 1));
        let r = &report.record;
        assert_eq!(r.remaining_capital, Some(dec!(12_000)));
        assert_eq!(r.months_elapsed, Some(-2));
        assert_eq!(r.months_remaining, Some(14));
        assert_eq!(r.percentage_repaid, Some(dec!(0.0)));
    }

    #[test]
    fn test_months_remaining_out_of_range_degrades() {
        let record = CreditRecord::new(dec!(1000), dec!(3.0), "9223372036854775807", "2026-08");
        let report = update_credit_calculations_as_of(record, date(2026, 6, 1));

        assert_eq!(report.outcome, UpdateOutcome::Degraded);
        assert_eq!(
            report.issues,
            vec![CreditError::Overflow {
                field: "months_remaining".into()
            }]
        );
        assert_eq!(report.record.remaining_capital, Some(dec!(1000)));
        assert_eq!(report.record.months_remaining, None);
    }

    #[test]
    fn test_duration_in_years() {
        let record = CreditRecord {
            principal: Some(NumericInput::from(dec!(215_000))),
            annual_rate: Some(NumericInput::from("3.35")),
            duration_years: Some(NumericInput::from(25)),
            start_date: Some("2024-10".into()),
            ..Default::default()
        };
        let report = update_credit_calculations_as_of(record, date(2024, 12, 28));
        assert_eq!(report.outcome, UpdateOutcome::Computed);
        assert_eq!(report.record.monthly_payment, Some(dec!(1059.12)));
        assert_eq!(report.record.remaining_capital, Some(dec!(211_822.64)));
        assert_eq!(report.record.months_remaining, Some(297));
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let record = CreditRecord::new(dec!(5000), dec!(6.5), 60, "2025-01-01");
        let as_of = date(2025, 12, 28);
        let once = update_credit_calculations_as_of(record, as_of);
        let twice = update_credit_calculations_as_of(once.record.clone(), as_of);
        assert_eq!(once.record, twice.record);
    }
}
