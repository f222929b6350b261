use std::collections::HashMap;

use serde::Serialize;

use stockroom_core::normalize_key;
use stockroom_purchasing::PurchaseRecord;
use stockroom_sales::SaleRecord;

/// Sellable stock snapshot: normalized product name -> normalized size -> units.
///
/// Built fresh by [`aggregate`] from purchase and sale records. Leaf values are
/// unsigned: over-selling is clamped to zero during aggregation, never stored.
/// A `(name, size)` pair is present only when at least one arrived/listed
/// purchase exists for it. Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AvailabilityMap {
    entries: HashMap<String, HashMap<String, u64>>,
}

/// Data anomalies observed while aggregating.
///
/// None of these are errors. They are the normal skew between two
/// independently-written record sets and are only reported for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregationReport {
    /// Purchases in `arrived`/`listed` status that were added to the map.
    pub counted_purchases: usize,
    /// Purchases skipped because of their status (`pending`, `archived`).
    pub ignored_purchases: usize,
    /// Sales subtracted from a tracked `(name, size)` pair.
    pub attributed_sales: usize,
    /// Sales dropped because nothing is tracked for their `(name, size)` pair.
    pub unattributed_sales: usize,
    /// Pairs whose remaining quantity went negative and was floored to zero.
    pub clamped_entries: usize,
}

impl AggregationReport {
    pub fn has_anomalies(&self) -> bool {
        self.unattributed_sales > 0 || self.clamped_entries > 0
    }
}

/// Reconcile purchases and sales into an [`AvailabilityMap`].
///
/// Pure and total: O(P + S), no side effects on the inputs.
pub fn aggregate(purchases: &[PurchaseRecord], sales: &[SaleRecord]) -> AvailabilityMap {
    aggregate_with_report(purchases, sales).0
}

/// Like [`aggregate`], also returning the anomaly counters.
pub fn aggregate_with_report(
    purchases: &[PurchaseRecord],
    sales: &[SaleRecord],
) -> (AvailabilityMap, AggregationReport) {
    let mut report = AggregationReport::default();
    let mut working: HashMap<String, HashMap<String, i64>> = HashMap::new();

    // 1) Supply: arrived/listed lots accumulate per (name, size).
    for purchase in purchases {
        if !purchase.counts_toward_availability() {
            report.ignored_purchases += 1;
            continue;
        }
        let (name, size) = purchase.key();
        let slot = working
            .entry(name.to_owned())
            .or_default()
            .entry(size.to_owned())
            .or_insert(0);
        *slot = slot.saturating_add(purchase.quantity);
        report.counted_purchases += 1;
    }

    // 2) Demand: only sales for tracked pairs are subtracted.
    for sale in sales {
        let (name, size) = sale.key();
        match working.get_mut(name).and_then(|sizes| sizes.get_mut(size)) {
            Some(slot) => {
                *slot = slot.saturating_sub(sale.quantity);
                report.attributed_sales += 1;
            }
            None => report.unattributed_sales += 1,
        }
    }

    // 3) Floor at zero.
    let mut entries = HashMap::with_capacity(working.len());
    for (name, sizes) in working {
        let mut clamped = HashMap::with_capacity(sizes.len());
        for (size, qty) in sizes {
            if qty < 0 {
                report.clamped_entries += 1;
            }
            clamped.insert(size, u64::try_from(qty).unwrap_or(0));
        }
        entries.insert(name, clamped);
    }

    (AvailabilityMap { entries }, report)
}

impl AvailabilityMap {
    /// Remaining units for a product.
    ///
    /// With `size == None` this is the total across every size of the name.
    /// Both `name` and `size` are normalized before lookup; unknown keys yield 0.
    pub fn qty_for(&self, name: &str, size: Option<&str>) -> u64 {
        let Some(sizes) = self.entries.get(normalize_key(name)) else {
            return 0;
        };
        match size {
            Some(size) => sizes.get(normalize_key(size)).copied().unwrap_or(0),
            None => sizes.values().fold(0u64, |acc, qty| acc.saturating_add(*qty)),
        }
    }

    /// Total remaining units for a product across all sizes (0 for unknown names).
    pub fn total_for_name(&self, name: &str) -> u64 {
        self.qty_for(name, None)
    }

    /// Whether any arrived/listed purchase exists for this product.
    ///
    /// Distinguishes "not tracked" from "tracked but sold out", which
    /// [`AvailabilityMap::qty_for`] reports identically as 0.
    pub fn is_tracked(&self, name: &str) -> bool {
        self.entries.contains_key(normalize_key(name))
    }

    /// Whether the exact `(name, size)` pair has a counted purchase.
    pub fn contains(&self, name: &str, size: &str) -> bool {
        self.entries
            .get(normalize_key(name))
            .is_some_and(|sizes| sizes.contains_key(normalize_key(size)))
    }

    /// `(size, units)` pairs for a product.
    pub fn sizes(&self, name: &str) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries
            .get(normalize_key(name))
            .into_iter()
            .flat_map(|sizes| sizes.iter().map(|(size, qty)| (size.as_str(), *qty)))
    }

    /// Keep only the names that have at least one unit left in any size.
    pub fn in_stock<T: AsRef<str>>(&self, names: impl IntoIterator<Item = T>) -> Vec<T> {
        names
            .into_iter()
            .filter(|name| self.total_for_name(name.as_ref()) > 0)
            .collect()
    }

    /// All `(name, size, units)` leaves.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, u64)> + '_ {
        self.entries.iter().flat_map(|(name, sizes)| {
            sizes
                .iter()
                .map(move |(size, qty)| (name.as_str(), size.as_str(), *qty))
        })
    }

    /// Number of tracked product names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Free-function form of [`AvailabilityMap::qty_for`].
pub fn qty_for(map: &AvailabilityMap, name: &str, size: Option<&str>) -> u64 {
    map.qty_for(name, size)
}

/// Free-function form of [`AvailabilityMap::total_for_name`].
pub fn total_for_name(map: &AvailabilityMap, name: &str) -> u64 {
    map.total_for_name(name)
}
