//! Backend implementations of [`OperationProvider`](crate::core::OperationProvider).
//!
//! Each backend is gated behind a feature flag; all are on by default.
//!
//! # Available Backends
//!
//! | Backend | Feature | Fragment |
//! |---------|---------|----------|
//! | SQL | `sql` | [`SqlPredicate`](sql::SqlPredicate) tree, rendered to parameterised SQL |
//! | Document | `document` | MongoDB-style criteria as `serde_json::Value` |
//! | Memory | `memory` | Closure evaluated against JSON rows |

#[cfg(feature = "sql")]
pub mod sql;

#[cfg(feature = "document")]
pub mod document;

#[cfg(feature = "memory")]
pub mod memory;
