pub mod loan;
pub mod records;
