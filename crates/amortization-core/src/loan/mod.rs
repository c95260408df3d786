//! Fixed-rate, fixed-payment loan mathematics.

pub mod cost;
pub mod payment;
pub mod remaining;
pub mod schedule;

#[cfg(feature = "analysis")]
pub mod analysis;

pub use cost::{checked_total_cost, total_cost, CostSummary};
pub use payment::{assess_terms, checked_monthly_payment, monthly_payment, monthly_rate, TermsStatus};
pub use remaining::{checked_remaining_capital, remaining_capital, remaining_capital_today};
pub use schedule::{amortization_schedule, Installment};
