//! Document-store backend.
//!
//! Criteria are MongoDB-style JSON filters. `{}` matches every document and
//! `{"$nor": [{}]}` matches none. `like` patterns become anchored,
//! case-insensitive regular expressions with every other character escaped.
//!
//! This backend has no subquery support; nested operations fail with
//! [`OperationError::NestedNotSupported`](crate::error::OperationError::NestedNotSupported).

mod provider;
mod query_builder;

pub use provider::{DocumentOperationProvider, typed_to_json};
pub use query_builder::{DocumentQuery, DocumentQueryBuilder};
