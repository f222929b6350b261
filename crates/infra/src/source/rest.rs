//! PostgREST-backed source (the hosted backend's REST interface).

use serde::de::DeserializeOwned;

use stockroom_purchasing::{PurchaseRecord, PurchaseStatus};
use stockroom_sales::SaleRecord;

use super::{AvailabilitySource, PurchaseRow, SaleRow, SourceError};

const PURCHASE_COLUMNS: &str = "name,size,quantity,status";
const SALE_COLUMNS: &str = "product_name,size,quantity";

/// Reads the `purchases` and `sales` tables through `{base_url}/rest/v1/`.
///
/// The key is sent both as `apikey` and as a bearer token, as the hosted
/// backend expects for anonymous-key access. Timeouts are whatever the
/// supplied `reqwest::Client` is configured with.
#[derive(Debug, Clone)]
pub struct RestSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestSource {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    /// `in.(arrived,listed)` filter for the purchase status column.
    fn active_status_filter() -> String {
        let statuses: Vec<&str> = PurchaseStatus::ACTIVE.iter().map(|s| s.as_str()).collect();
        format!("in.({})", statuses.join(","))
    }

    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, SourceError> {
        let resp = self
            .client
            .get(self.table_url(table))
            .query(params)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Api {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        // A null body is an empty table, not a failure.
        let rows: Option<Vec<T>> =
            serde_json::from_slice(&body).map_err(|e| SourceError::Decode(e.to_string()))?;
        Ok(rows.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl AvailabilitySource for RestSource {
    async fn active_purchases(&self) -> Result<Vec<PurchaseRecord>, SourceError> {
        let params = [
            ("select", PURCHASE_COLUMNS.to_string()),
            ("status", Self::active_status_filter()),
        ];
        let rows: Vec<PurchaseRow> = self.fetch_rows("purchases", &params).await?;
        Ok(rows.into_iter().map(PurchaseRecord::from).collect())
    }

    async fn sales(&self) -> Result<Vec<SaleRecord>, SourceError> {
        let params = [("select", SALE_COLUMNS.to_string())];
        let rows: Vec<SaleRow> = self.fetch_rows("sales", &params).await?;
        Ok(rows.into_iter().map(SaleRecord::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_tolerates_trailing_slash() {
        let a = RestSource::new("https://store.example.co", "key");
        let b = RestSource::new("https://store.example.co/", "key");
        assert_eq!(a.table_url("sales"), "https://store.example.co/rest/v1/sales");
        assert_eq!(a.table_url("sales"), b.table_url("sales"));
    }

    #[test]
    fn status_filter_lists_active_statuses() {
        assert_eq!(RestSource::active_status_filter(), "in.(arrived,listed)");
    }
}
