use serde::{Deserialize, Serialize};

use stockroom_core::{ValueObject, normalize_key};

/// One outbound sale.
///
/// A sale is attributed to stock only through its normalized
/// `(product_name, size)` pair; there is no product id link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub product_name: String,
    pub size: String,
    pub quantity: i64,
}

impl ValueObject for SaleRecord {}

impl SaleRecord {
    pub fn new(product_name: impl Into<String>, size: impl Into<String>, quantity: i64) -> Self {
        Self {
            product_name: product_name.into(),
            size: size.into(),
            quantity,
        }
    }

    /// Normalized `(product_name, size)` stock key.
    pub fn key(&self) -> (&str, &str) {
        (normalize_key(&self.product_name), normalize_key(&self.size))
    }
}
