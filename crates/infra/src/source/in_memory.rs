use std::sync::RwLock;

use stockroom_purchasing::PurchaseRecord;
use stockroom_sales::SaleRecord;

use super::{AvailabilitySource, Query, SourceError};

/// In-memory purchase/sale tables.
///
/// Intended for tests/dev. A failure can be scripted per query to exercise
/// the error path of callers.
#[derive(Debug, Default)]
pub struct InMemorySource {
    purchases: RwLock<Vec<PurchaseRecord>>,
    sales: RwLock<Vec<SaleRecord>>,
    purchases_failure: RwLock<Option<SourceError>>,
    sales_failure: RwLock<Option<SourceError>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(purchases: Vec<PurchaseRecord>, sales: Vec<SaleRecord>) -> Self {
        Self {
            purchases: RwLock::new(purchases),
            sales: RwLock::new(sales),
            ..Self::default()
        }
    }

    pub fn insert_purchase(&self, purchase: PurchaseRecord) {
        if let Ok(mut purchases) = self.purchases.write() {
            purchases.push(purchase);
        }
    }

    pub fn insert_sale(&self, sale: SaleRecord) {
        if let Ok(mut sales) = self.sales.write() {
            sales.push(sale);
        }
    }

    /// Make every subsequent call for `query` fail with `error`.
    pub fn fail(&self, query: Query, error: SourceError) {
        if let Ok(mut slot) = self.failure_slot(query).write() {
            *slot = Some(error);
        }
    }

    pub fn clear_failures(&self) {
        for query in [Query::Purchases, Query::Sales] {
            if let Ok(mut slot) = self.failure_slot(query).write() {
                *slot = None;
            }
        }
    }

    fn failure_slot(&self, query: Query) -> &RwLock<Option<SourceError>> {
        match query {
            Query::Purchases => &self.purchases_failure,
            Query::Sales => &self.sales_failure,
        }
    }

    fn check_failure(&self, query: Query) -> Result<(), SourceError> {
        let slot = self
            .failure_slot(query)
            .read()
            .map_err(|_| SourceError::Database("lock poisoned".to_string()))?;
        match slot.as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl AvailabilitySource for InMemorySource {
    async fn active_purchases(&self) -> Result<Vec<PurchaseRecord>, SourceError> {
        self.check_failure(Query::Purchases)?;
        let purchases = self
            .purchases
            .read()
            .map_err(|_| SourceError::Database("lock poisoned".to_string()))?;
        Ok(purchases
            .iter()
            .filter(|p| p.counts_toward_availability())
            .cloned()
            .collect())
    }

    async fn sales(&self) -> Result<Vec<SaleRecord>, SourceError> {
        self.check_failure(Query::Sales)?;
        let sales = self
            .sales
            .read()
            .map_err(|_| SourceError::Database("lock poisoned".to_string()))?;
        Ok(sales.clone())
    }
}
