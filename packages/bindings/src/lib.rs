use amortization_core::calendar::today;
use amortization_core::loan;
use amortization_core::records::{self, CreditRecord};
use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Loan terms as sent by the web tier. Durations arrive as signed integers
/// so degenerate terms reach the calculators instead of failing to parse.
#[derive(Deserialize)]
struct LoanTerms {
    principal: Decimal,
    annual_rate: Decimal,
    duration_months: i64,
    #[serde(default)]
    start_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct RecordRequest {
    record: CreditRecord,
    #[serde(default)]
    as_of: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct PortfolioRequest {
    credits: Vec<CreditRecord>,
    #[serde(default)]
    as_of: Option<NaiveDate>,
}

fn parse<'a, T: Deserialize<'a>>(input_json: &'a str) -> NapiResult<T> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loan calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn monthly_payment(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = parse(&input_json)?;
    let payment = loan::monthly_payment(terms.principal, terms.annual_rate, terms.duration_months);
    serde_json::to_string(&serde_json::json!({
        "monthly_payment": payment,
        "terms": loan::assess_terms(terms.principal, terms.annual_rate, terms.duration_months),
    }))
    .map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = parse(&input_json)?;
    let start = terms
        .start_date
        .ok_or_else(|| to_napi_error("start_date is required for a schedule"))?;
    let schedule = loan::amortization_schedule(
        terms.principal,
        terms.annual_rate,
        terms.duration_months,
        start,
    );
    serde_json::to_string(&schedule).map_err(to_napi_error)
}

#[napi]
pub fn total_cost(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = parse(&input_json)?;
    let cost = loan::total_cost(terms.principal, terms.annual_rate, terms.duration_months);
    serde_json::to_string(&cost).map_err(to_napi_error)
}

#[napi]
pub fn analyze_loan(input_json: String) -> NapiResult<String> {
    let input: loan::analysis::LoanInput = parse(&input_json)?;
    let output = loan::analysis::analyze_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Credit records
// ---------------------------------------------------------------------------

#[napi]
pub fn update_credit_record(input_json: String) -> NapiResult<String> {
    let request: RecordRequest = parse(&input_json)?;
    let as_of = request.as_of.unwrap_or_else(today);
    let report = records::update_credit_calculations_as_of(request.record, as_of);
    serde_json::to_string(&report).map_err(to_napi_error)
}

#[napi]
pub fn portfolio_outstanding(input_json: String) -> NapiResult<String> {
    let request: PortfolioRequest = parse(&input_json)?;
    let as_of = request.as_of.unwrap_or_else(today);
    let summary = records::total_outstanding(&request.credits, as_of);
    serde_json::to_string(&summary).map_err(to_napi_error)
}
