use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{CreditError, CreditResult, types::*};

/// A numeric field as the web tier hands it over: either a number or the
/// raw text a user typed into a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(Decimal),
    Text(String),
}

impl NumericInput {
    /// Coerce to a decimal, accepting plain and scientific notation.
    pub fn to_decimal(&self, field: &str) -> CreditResult<Decimal> {
        match self {
            NumericInput::Number(d) => Ok(*d),
            NumericInput::Text(s) => {
                let t = s.trim();
                Decimal::from_str(t)
                    .or_else(|_| Decimal::from_scientific(t))
                    .map_err(|_| CreditError::MalformedNumber {
                        field: field.into(),
                        value: s.clone(),
                    })
            }
        }
    }

    /// Coerce to a whole number of periods.
    ///
    /// Numbers are truncated toward zero; text must be an integer literal.
    pub fn to_count(&self, field: &str) -> CreditResult<i64> {
        let malformed = || self.malformed(field);
        match self {
            NumericInput::Number(d) => d.trunc().to_i64().ok_or_else(malformed),
            NumericInput::Text(s) => s.trim().parse::<i64>().map_err(|_| malformed()),
        }
    }
}

impl NumericInput {
    fn malformed(&self, field: &str) -> CreditError {
        CreditError::MalformedNumber {
            field: field.into(),
            value: match self {
                NumericInput::Number(d) => d.to_string(),
                NumericInput::Text(s) => s.clone(),
            },
        }
    }
}

impl From<Decimal> for NumericInput {
    fn from(d: Decimal) -> Self {
        NumericInput::Number(d)
    }
}

impl From<i32> for NumericInput {
    fn from(n: i32) -> Self {
        NumericInput::Number(Decimal::from(n))
    }
}

impl From<i64> for NumericInput {
    fn from(n: i64) -> Self {
        NumericInput::Number(Decimal::from(n))
    }
}

impl From<&str> for NumericInput {
    fn from(s: &str) -> Self {
        NumericInput::Text(s.to_string())
    }
}

/// What the credit finances. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditKind {
    Mortgage,
    Consumer,
    Auto,
    Works,
    #[default]
    Other,
}

/// A credit as persisted by the calling service.
///
/// The parameter fields are authored by the user; the derived fields are
/// owned by the updater and rewritten on every recomputation. `declared_*`
/// hold figures the user typed in themselves (e.g. from a bank statement)
/// and are never overwritten.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<CreditKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lender: Option<String>,

    // -- Parameters ---------------------------------------------------------
    pub principal: Option<NumericInput>,
    /// Annual rate in percent (3.5 = 3.5%).
    pub annual_rate: Option<NumericInput>,
    pub duration_months: Option<NumericInput>,
    /// Used only when `duration_months` is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_years: Option<NumericInput>,
    /// `YYYY-MM-DD`, `YYYY-MM` or `MM/YYYY`.
    pub start_date: Option<String>,

    // -- Declared by the user -----------------------------------------------
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_monthly_payment: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_remaining_capital: Option<Money>,

    // -- Derived --------------------------------------------------------------
    pub monthly_payment: Option<Money>,
    pub remaining_capital: Option<Money>,
    pub start_date_parsed: Option<NaiveDate>,
    pub months_elapsed: Option<i64>,
    pub months_remaining: Option<i64>,
    pub percentage_repaid: Option<Decimal>,
}

impl CreditRecord {
    pub fn new(
        principal: impl Into<NumericInput>,
        annual_rate: impl Into<NumericInput>,
        duration_months: impl Into<NumericInput>,
        start_date: &str,
    ) -> Self {
        Self {
            principal: Some(principal.into()),
            annual_rate: Some(annual_rate.into()),
            duration_months: Some(duration_months.into()),
            start_date: Some(start_date.to_string()),
            ..Default::default()
        }
    }

    /// Remaining capital to show: computed first, then declared, then zero.
    pub fn remaining_capital_display(&self) -> Money {
        self.remaining_capital
            .or(self.declared_remaining_capital)
            .unwrap_or(Decimal::ZERO)
    }

    /// Monthly payment to show: computed first, then declared, then zero.
    pub fn monthly_payment_display(&self) -> Money {
        self.monthly_payment
            .or(self.declared_monthly_payment)
            .unwrap_or(Decimal::ZERO)
    }

    /// Duration in months, from `duration_months` or else `duration_years`.
    /// `Ok(None)` when neither is present.
    pub fn resolved_duration_months(&self) -> CreditResult<Option<i64>> {
        if let Some(months) = &self.duration_months {
            return months.to_count("duration_months").map(Some);
        }
        match &self.duration_years {
            Some(years) => {
                let y = years.to_count("duration_years")?;
                y.checked_mul(12)
                    .map(Some)
                    .ok_or_else(|| years.malformed("duration_years"))
            }
            None => Ok(None),
        }
    }
}
