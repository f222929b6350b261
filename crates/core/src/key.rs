//! Normalization of free-text stock keys (product names, size labels).

/// Normalize a product name or size label for use as a stock key.
///
/// Only surrounding whitespace is removed. Keys are compared byte-for-byte
/// afterwards: no case folding, no inner-whitespace collapsing.
pub fn normalize_key(raw: &str) -> &str {
    raw.trim()
}
