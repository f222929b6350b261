//! Purchasing domain module (inbound inventory lots).
//!
//! This crate describes purchase records as they are read from the backend,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).
//! The purchase lifecycle itself is driven elsewhere; availability only reads
//! the status.

pub mod purchase;

pub use purchase::{PurchaseRecord, PurchaseStatus};
