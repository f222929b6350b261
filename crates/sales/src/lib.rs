//! Sales domain module (outbound unit sales).
//!
//! Pure domain types (no IO, no HTTP, no storage).

pub mod sale;

pub use sale::SaleRecord;
