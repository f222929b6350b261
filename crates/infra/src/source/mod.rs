//! Data-source boundary for availability.
//!
//! An [`AvailabilitySource`] answers exactly two read queries: the purchase
//! lots that count as supply and every recorded sale. Implementations convert
//! backend rows into typed records here, so aggregation never sees partial input.

pub mod in_memory;
pub mod postgres;
pub mod rest;

pub use in_memory::InMemorySource;
pub use postgres::PostgresSource;
pub use rest::RestSource;

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use stockroom_purchasing::{PurchaseRecord, PurchaseStatus};
use stockroom_sales::SaleRecord;

/// The two reads availability depends on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Query {
    /// Purchases with status `arrived` or `listed`.
    Purchases,
    /// All sales.
    Sales,
}

impl Query {
    pub fn as_str(&self) -> &'static str {
        match self {
            Query::Purchases => "purchases",
            Query::Sales => "sales",
        }
    }
}

impl core::fmt::Display for Query {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single query failure.
///
/// Distinct from an empty result: sources return `Ok(vec![])` when no rows exist.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to decode rows: {0}")]
    Decode(String),

    #[error("database error: {0}")]
    Database(String),
}

/// Read access to purchase and sale records.
#[async_trait::async_trait]
pub trait AvailabilitySource: Send + Sync {
    /// Purchases whose status counts toward availability (`arrived`, `listed`).
    async fn active_purchases(&self) -> Result<Vec<PurchaseRecord>, SourceError>;

    /// Every sale, unfiltered.
    async fn sales(&self) -> Result<Vec<SaleRecord>, SourceError>;
}

#[async_trait::async_trait]
impl<S> AvailabilitySource for Arc<S>
where
    S: AvailabilitySource + ?Sized,
{
    async fn active_purchases(&self) -> Result<Vec<PurchaseRecord>, SourceError> {
        (**self).active_purchases().await
    }

    async fn sales(&self) -> Result<Vec<SaleRecord>, SourceError> {
        (**self).sales().await
    }
}

/// Purchase row as stored by the backend. `quantity` may be absent or null.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PurchaseRow {
    pub name: String,
    pub size: String,
    pub quantity: Option<i64>,
    pub status: PurchaseStatus,
}

impl From<PurchaseRow> for PurchaseRecord {
    fn from(row: PurchaseRow) -> Self {
        // Absent or null means nothing was recorded; a stored 0 stays 0.
        let quantity = row.quantity.unwrap_or(0);
        PurchaseRecord::new(row.name, row.size, quantity, row.status)
    }
}

/// Sale row as stored by the backend. `quantity` may be absent or null.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaleRow {
    pub product_name: String,
    pub size: String,
    pub quantity: Option<i64>,
}

impl From<SaleRow> for SaleRecord {
    fn from(row: SaleRow) -> Self {
        let quantity = row.quantity.unwrap_or(0);
        SaleRecord::new(row.product_name, row.size, quantity)
    }
}
