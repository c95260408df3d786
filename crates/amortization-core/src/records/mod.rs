//! Caller-owned credit records and their recomputation.

pub mod portfolio;
pub mod record;
pub mod updater;

pub use portfolio::{total_outstanding, OutstandingBasis, PortfolioLine, PortfolioSummary};
pub use record::{CreditKind, CreditRecord, NumericInput};
pub use updater::{
    update_credit_calculations, update_credit_calculations_as_of, UpdateOutcome, UpdateReport,
};
