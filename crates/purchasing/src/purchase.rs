use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, ValueObject, normalize_key};

/// Purchase lifecycle status.
///
/// `pending` lots are ordered but not received, `archived` lots are withdrawn.
/// Only `arrived` and `listed` lots are sellable supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pending,
    Arrived,
    Listed,
    Archived,
}

impl PurchaseStatus {
    /// Statuses that count toward availability, in the order the backend query lists them.
    pub const ACTIVE: [PurchaseStatus; 2] = [PurchaseStatus::Arrived, PurchaseStatus::Listed];

    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Arrived => "arrived",
            PurchaseStatus::Listed => "listed",
            PurchaseStatus::Archived => "archived",
        }
    }

    /// Whether a lot in this status is received, not withdrawn, and therefore sellable.
    pub fn counts_toward_availability(&self) -> bool {
        matches!(self, PurchaseStatus::Arrived | PurchaseStatus::Listed)
    }
}

impl core::fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PurchaseStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(PurchaseStatus::Pending),
            "arrived" => Ok(PurchaseStatus::Arrived),
            "listed" => Ok(PurchaseStatus::Listed),
            "archived" => Ok(PurchaseStatus::Archived),
            other => Err(DomainError::validation(format!(
                "unknown purchase status: {other}"
            ))),
        }
    }
}

/// One inbound inventory lot.
///
/// `name` and `size` are kept exactly as stored; use [`PurchaseRecord::key`]
/// for the normalized pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub name: String,
    pub size: String,
    pub quantity: i64,
    pub status: PurchaseStatus,
}

impl ValueObject for PurchaseRecord {}

impl PurchaseRecord {
    pub fn new(
        name: impl Into<String>,
        size: impl Into<String>,
        quantity: i64,
        status: PurchaseStatus,
    ) -> Self {
        Self {
            name: name.into(),
            size: size.into(),
            quantity,
            status,
        }
    }

    /// Normalized `(name, size)` stock key.
    pub fn key(&self) -> (&str, &str) {
        (normalize_key(&self.name), normalize_key(&self.size))
    }

    pub fn counts_toward_availability(&self) -> bool {
        self.status.counts_toward_availability()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_arrived_and_listed_count() {
        assert!(!PurchaseStatus::Pending.counts_toward_availability());
        assert!(PurchaseStatus::Arrived.counts_toward_availability());
        assert!(PurchaseStatus::Listed.counts_toward_availability());
        assert!(!PurchaseStatus::Archived.counts_toward_availability());

        assert!(PurchaseStatus::ACTIVE
            .iter()
            .all(PurchaseStatus::counts_toward_availability));
    }

    #[test]
    fn status_parses_wire_names() {
        assert_eq!("arrived".parse::<PurchaseStatus>().unwrap(), PurchaseStatus::Arrived);
        assert_eq!(" listed ".parse::<PurchaseStatus>().unwrap(), PurchaseStatus::Listed);

        let err = "Arrived".parse::<PurchaseStatus>().unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("Arrived") => {}
            _ => panic!("Expected validation error for case-mismatched status"),
        }
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&PurchaseStatus::Archived).unwrap();
        assert_eq!(json, "\"archived\"");

        let parsed: PurchaseStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, PurchaseStatus::Pending);
    }

    #[test]
    fn key_trims_name_and_size() {
        let p = PurchaseRecord::new(" Hoodie ", "L\n", 3, PurchaseStatus::Arrived);
        assert_eq!(p.key(), ("Hoodie", "L"));
        assert_eq!(p.name, " Hoodie ");
    }
}
