//! Postgres-backed source.
//!
//! Reads the same `purchases` and `sales` tables the REST interface exposes,
//! over a direct connection pool. Columns are cast on the SQL side so that
//! enum-typed `status` and `integer` quantity columns decode uniformly.

use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use stockroom_core::DomainError;
use stockroom_purchasing::{PurchaseRecord, PurchaseStatus};
use stockroom_sales::SaleRecord;

use super::{AvailabilitySource, PurchaseRow, SaleRow, SourceError};

const ACTIVE_PURCHASES_SQL: &str = r#"
    SELECT name, size, quantity::bigint AS quantity, status::text AS status
    FROM purchases
    WHERE status::text = ANY($1)
"#;

const SALES_SQL: &str = r#"
    SELECT product_name, size, quantity::bigint AS quantity
    FROM sales
"#;

/// Postgres source over a shared `PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresSource {
    pool: PgPool,
}

impl PostgresSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a pool that connects on first use.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect_lazy(database_url: &str) -> Result<Self, SourceError> {
        let pool =
            PgPool::connect_lazy(database_url).map_err(|e| SourceError::Database(e.to_string()))?;
        Ok(Self::new(pool))
    }

    fn decode_purchase(row: &PgRow) -> Result<PurchaseRecord, SourceError> {
        let status: String = row.try_get("status").map_err(decode_err)?;
        let status: PurchaseStatus = status
            .parse()
            .map_err(|e: DomainError| SourceError::Decode(e.to_string()))?;

        let row = PurchaseRow {
            name: row.try_get("name").map_err(decode_err)?,
            size: row.try_get("size").map_err(decode_err)?,
            quantity: row.try_get("quantity").map_err(decode_err)?,
            status,
        };
        Ok(row.into())
    }

    fn decode_sale(row: &PgRow) -> Result<SaleRecord, SourceError> {
        let row = SaleRow {
            product_name: row.try_get("product_name").map_err(decode_err)?,
            size: row.try_get("size").map_err(decode_err)?,
            quantity: row.try_get("quantity").map_err(decode_err)?,
        };
        Ok(row.into())
    }
}

fn decode_err(e: sqlx::Error) -> SourceError {
    SourceError::Decode(e.to_string())
}

fn database_err(e: sqlx::Error) -> SourceError {
    SourceError::Database(e.to_string())
}

#[async_trait::async_trait]
impl AvailabilitySource for PostgresSource {
    async fn active_purchases(&self) -> Result<Vec<PurchaseRecord>, SourceError> {
        let statuses: Vec<&str> = PurchaseStatus::ACTIVE.iter().map(|s| s.as_str()).collect();

        let rows = sqlx::query(ACTIVE_PURCHASES_SQL)
            .bind(statuses)
            .fetch_all(&self.pool)
            .await
            .map_err(database_err)?;

        rows.iter().map(Self::decode_purchase).collect()
    }

    async fn sales(&self) -> Result<Vec<SaleRecord>, SourceError> {
        let rows = sqlx::query(SALES_SQL)
            .fetch_all(&self.pool)
            .await
            .map_err(database_err)?;

        rows.iter().map(Self::decode_sale).collect()
    }
}
