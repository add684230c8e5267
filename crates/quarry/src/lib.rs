//! Quarry: dynamic predicate composition.
//!
//! This crate turns an untyped, wire-level description of search filters
//! (field name, raw value, operation code, logical grouping) into a
//! composable predicate for a storage backend, and derives paging and sorting
//! from the same kind of input.
//!
//! # Features
//!
//! - **Schema-less typing**: raw values are classified as long, double,
//!   boolean, instant or string on the fly
//! - **Two grouping levels**: conditions joined by an internal glue, groups
//!   joined by an external glue
//! - **Subqueries**: operation codes prefixed with `nst:` compare a field
//!   against a correlated subquery over the same entity
//! - **Overrides**: per-field builders that bypass the generic pipeline
//! - **Paging**: sort specifications checked against an allow-list
//!
//! Available backend features (all default):
//! - `sql` - parameterised SQL predicate trees
//! - `document` - MongoDB-style JSON criteria
//! - `memory` - closures evaluated against JSON rows
//!
//! # Architecture
//!
//! - [`types`] - the request model
//! - [`search`] - value typing, the operation registry, glue, sorting and overrides
//! - [`core`] - the [`OperationProvider`] backend seam and [`OperationService`]
//! - [`backends`] - backend implementations
//! - [`config`] - [`EngineConfig`]
//! - [`error`] - error types
//!
//! # Quick Start
//!
//! ```
//! use quarry::backends::sql::{SqlOperationProvider, SqlParam, SqlQueryBuilder};
//! use quarry::types::CommonOperationShell;
//! use quarry::OperationService;
//!
//! let shell: CommonOperationShell = serde_json::from_str(r#"{
//!     "baseSearchParams": [{"name": "status", "value": "active", "operation": "eq"}],
//!     "glue": "AND",
//!     "pageAttribute": {"offset": 10, "limit": 5, "sortBy": "-createdAt"}
//! }"#).unwrap();
//!
//! let service = OperationService::new(SqlOperationProvider::new("orders"));
//! let plan = service.build_common(&shell, &["createdAt"]).unwrap();
//!
//! assert_eq!(plan.page.offset, 10);
//! assert_eq!(plan.page.limit, 5);
//!
//! let statement = SqlQueryBuilder::new("orders").build(&plan.predicate, &plan.page);
//! assert_eq!(statement.params, vec![SqlParam::string("active")]);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod config;
pub mod core;
pub mod error;
pub mod search;
pub mod types;

// Re-export commonly used types at crate root
pub use config::EngineConfig;
pub use error::{FilterError, FilterResult};
pub use types::{
    BaseSearchParam, CommonOperationShell, ComplexSearchParam, GlueOperation,
    MultipleOperationShell, PageAttribute, PageRequest, ParamValue,
};

// Re-export the backend seam
pub use crate::core::{OperationProvider, OperationService, SearchPlan};

// Re-export registries
pub use search::{ManualOperation, ManualOperationProvider, ManualOperationRegistry, OperationType};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
