//! Value object trait: equality by value, not identity.
//!
//! Purchase and sale records read from the backend are value objects: the
//! aggregation never looks at row identity, only at names, sizes, quantities
//! and statuses.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Two records
/// with the same attributes are interchangeable for aggregation purposes.
///
/// The trait requires:
/// - **Clone**: records are cheap to copy out of a source
/// - **PartialEq**: records are compared by their attribute values
/// - **Debug**: records show up in logs and test failures
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
