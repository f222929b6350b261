//! Availability read path (application-level orchestration).
//!
//! ```text
//! fetch_availability()
//!   ↓
//! 1. No source configured → empty map (soft condition, not an error)
//!   ↓
//! 2. Query purchases (arrived/listed) ┐ issued concurrently,
//!    Query sales (all)                ┘ both must succeed
//!   ↓
//! 3. Aggregate (pure, in-memory) → AvailabilityMap
//! ```
//!
//! ## Failure semantics
//!
//! - Either query failing fails the whole call with the query name and cause.
//!   Nothing is aggregated from the other query's rows.
//! - No retries, no caching, no coalescing of concurrent callers: each call
//!   issues its own pair of reads and reflects the backend at call time.
//! - No timeouts here; those belong to the source's client.
//! - Negative stock and unattributed sales are normalized by aggregation and
//!   only logged.

use std::sync::Arc;

use thiserror::Error;

use stockroom_inventory::{AvailabilityMap, aggregate_with_report};

use crate::config::{BackendConfig, SourceConfig};
use crate::source::{AvailabilitySource, PostgresSource, Query, RestSource, SourceError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    /// One of the two reads failed; no partial map is produced.
    #[error("{query} query failed: {source}")]
    Fetch {
        query: Query,
        #[source]
        source: SourceError,
    },
}

impl AvailabilityError {
    pub fn fetch(query: Query, source: SourceError) -> Self {
        Self::Fetch { query, source }
    }

    pub fn query(&self) -> Query {
        match self {
            Self::Fetch { query, .. } => *query,
        }
    }
}

/// Computes availability from an injected data source.
#[derive(Clone)]
pub struct AvailabilityService {
    source: Option<Arc<dyn AvailabilitySource>>,
}

impl core::fmt::Debug for AvailabilityService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AvailabilityService")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl AvailabilityService {
    pub fn new<S>(source: S) -> Self
    where
        S: AvailabilitySource + 'static,
    {
        Self {
            source: Some(Arc::new(source)),
        }
    }

    pub fn from_shared(source: Arc<dyn AvailabilitySource>) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// A service without a backend; every fetch yields an empty map.
    pub fn unconfigured() -> Self {
        Self { source: None }
    }

    /// Build the source selected by `config`.
    ///
    /// A Postgres backend gets a lazily-connecting pool, so this must run
    /// inside a tokio runtime.
    pub fn from_config(config: &SourceConfig) -> Result<Self, SourceError> {
        match config.backend() {
            BackendConfig::Rest { url, api_key } => {
                Ok(Self::new(RestSource::new(url.clone(), api_key.clone())))
            }
            BackendConfig::Postgres { url } => Ok(Self::new(PostgresSource::connect_lazy(url)?)),
            BackendConfig::Unconfigured => Ok(Self::unconfigured()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.source.is_some()
    }

    /// Fetch purchases and sales and aggregate them into a fresh snapshot.
    pub async fn fetch_availability(&self) -> Result<AvailabilityMap, AvailabilityError> {
        let Some(source) = &self.source else {
            tracing::debug!("availability source not configured; returning empty map");
            return Ok(AvailabilityMap::default());
        };

        let fetched = tokio::try_join!(
            async {
                source
                    .active_purchases()
                    .await
                    .map_err(|e| AvailabilityError::fetch(Query::Purchases, e))
            },
            async {
                source
                    .sales()
                    .await
                    .map_err(|e| AvailabilityError::fetch(Query::Sales, e))
            },
        );

        let (purchases, sales) = match fetched {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!(query = %err.query(), error = %err, "availability fetch failed");
                return Err(err);
            }
        };

        let (map, report) = aggregate_with_report(&purchases, &sales);

        tracing::debug!(
            purchases = purchases.len(),
            sales = sales.len(),
            products = map.len(),
            ignored_purchases = report.ignored_purchases,
            unattributed_sales = report.unattributed_sales,
            clamped_entries = report.clamped_entries,
            "availability aggregated"
        );

        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use stockroom_purchasing::{PurchaseRecord, PurchaseStatus};
    use stockroom_sales::SaleRecord;
    use tokio::sync::Barrier;

    use crate::source::InMemorySource;

    fn test_source() -> InMemorySource {
        InMemorySource::with_records(
            vec![
                PurchaseRecord::new("Cap", "M", 10, PurchaseStatus::Arrived),
                PurchaseRecord::new(" Hoodie", "S", 4, PurchaseStatus::Listed),
                PurchaseRecord::new("Hoodie", "L ", 6, PurchaseStatus::Arrived),
                PurchaseRecord::new("Shoe", "42", 3, PurchaseStatus::Pending),
            ],
            vec![
                SaleRecord::new("Cap", "M", 3),
                SaleRecord::new("Shoe", "42", 1),
            ],
        )
    }

    #[tokio::test]
    async fn fetch_aggregates_both_queries() {
        let service = AvailabilityService::new(test_source());

        let map = service.fetch_availability().await.unwrap();
        assert_eq!(map.qty_for("Cap", Some("M")), 7);
        assert_eq!(map.total_for_name("Hoodie"), 10);
        assert!(!map.is_tracked("Shoe"));
    }

    #[tokio::test]
    async fn unconfigured_service_returns_empty_map() {
        let service = AvailabilityService::unconfigured();
        assert!(!service.is_configured());

        let map = service.fetch_availability().await.unwrap();
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_config_builds_unconfigured_service() {
        let service = AvailabilityService::from_config(&SourceConfig::unconfigured()).unwrap();
        assert!(!service.is_configured());
    }

    #[tokio::test]
    async fn purchases_failure_fails_the_whole_fetch() {
        let source = Arc::new(test_source());
        source.fail(Query::Purchases, SourceError::Network("timed out".to_string()));
        let service = AvailabilityService::from_shared(source);

        let err = service.fetch_availability().await.unwrap_err();
        assert_eq!(
            err,
            AvailabilityError::fetch(Query::Purchases, SourceError::Network("timed out".to_string()))
        );
        assert!(err.to_string().starts_with("purchases query failed"));
    }

    #[tokio::test]
    async fn sales_failure_fails_the_whole_fetch() {
        let source = Arc::new(test_source());
        source.fail(
            Query::Sales,
            SourceError::Api {
                status: 401,
                body: "JWT expired".to_string(),
            },
        );
        let service = AvailabilityService::from_shared(source.clone());

        let err = service.fetch_availability().await.unwrap_err();
        assert_eq!(err.query(), Query::Sales);

        source.clear_failures();
        assert!(service.fetch_availability().await.is_ok());
    }

    #[tokio::test]
    async fn each_fetch_reflects_current_records() {
        let source = Arc::new(test_source());
        let service = AvailabilityService::from_shared(source.clone());

        let before = service.fetch_availability().await.unwrap();
        source.insert_sale(SaleRecord::new("Cap", "M", 7));
        let after = service.fetch_availability().await.unwrap();

        assert_eq!(before.qty_for("Cap", Some("M")), 7);
        assert_eq!(after.qty_for("Cap", Some("M")), 0);
    }

    /// Both reads block on a two-party barrier: the fetch only completes if
    /// they are in flight at the same time.
    struct RendezvousSource {
        barrier: Barrier,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl AvailabilitySource for RendezvousSource {
        async fn active_purchases(&self) -> Result<Vec<PurchaseRecord>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.barrier.wait().await;
            Ok(vec![PurchaseRecord::new("Cap", "M", 2, PurchaseStatus::Listed)])
        }

        async fn sales(&self) -> Result<Vec<SaleRecord>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.barrier.wait().await;
            Ok(vec![SaleRecord::new("Cap", "M", 1)])
        }
    }

    #[tokio::test]
    async fn queries_are_issued_concurrently() {
        let source = Arc::new(RendezvousSource {
            barrier: Barrier::new(2),
            calls: AtomicUsize::new(0),
        });
        let service = AvailabilityService::from_shared(source.clone());

        let map = tokio::time::timeout(Duration::from_secs(5), service.fetch_availability())
            .await
            .expect("queries were not issued concurrently")
            .unwrap();

        assert_eq!(map.qty_for("Cap", Some("M")), 1);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }
}
