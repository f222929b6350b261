//! Inventory availability module.
//!
//! This crate reconciles purchase and sale records into a per-name, per-size
//! stock snapshot, implemented purely as deterministic domain logic (no IO,
//! no HTTP, no storage). Fetching the records is the infrastructure layer's job.

pub mod availability;
pub mod policy;

pub use availability::{
    AggregationReport, AvailabilityMap, aggregate, aggregate_with_report, qty_for, total_for_name,
};
pub use policy::{CartDecision, CartLimit, ZeroStockPolicy};
