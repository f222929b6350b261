//! `stockroom-core`: shared domain building blocks.
//!
//! This crate contains **pure domain** primitives shared by the purchasing,
//! sales and inventory crates (no infrastructure concerns).

pub mod error;
pub mod key;
pub mod value_object;

pub use error::DomainError;
pub use key::normalize_key;
pub use value_object::ValueObject;
