pub mod calendar;
pub mod error;
pub mod loan;
pub mod types;

#[cfg(feature = "records")]
pub mod records;

pub use error::CreditError;
pub use types::*;

/// Standard result type for all amortization operations
pub type CreditResult<T> = Result<T, CreditError>;
