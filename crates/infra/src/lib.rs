//! Infrastructure layer: data sources, configuration, availability service.

pub mod config;
pub mod service;
pub mod source;

pub use config::{BackendConfig, SourceConfig};
pub use service::{AvailabilityError, AvailabilityService};
pub use source::{
    AvailabilitySource, InMemorySource, PostgresSource, PurchaseRow, Query, RestSource, SaleRow,
    SourceError,
};
