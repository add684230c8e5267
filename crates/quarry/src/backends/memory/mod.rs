//! In-memory backend.
//!
//! Predicates are closures over a [`RowScope`]: the row under test plus the
//! whole collection, which nested operations scan as their subquery. Rows are
//! `serde_json::Value` objects.
//!
//! # Example
//!
//! ```
//! use quarry::backends::memory::{MemoryOperationProvider, MemoryQuery};
//! use quarry::types::{BaseSearchParam, GlueOperation, PageRequest};
//! use quarry::OperationService;
//! use serde_json::json;
//!
//! let rows = vec![json!({"name": "Alice"}), json!({"name": "Bob"})];
//! let service = OperationService::new(MemoryOperationProvider::new());
//! let predicate = service
//!     .build_base_by_params(&[BaseSearchParam::new("name", "like", "ali")], GlueOperation::And)
//!     .unwrap();
//!
//! let result = MemoryQuery::new(&rows).execute(&predicate, &PageRequest::new(0, 10, vec![]));
//! assert_eq!(result, vec![&json!({"name": "Alice"})]);
//! ```

mod predicate;
mod provider;
mod query;

pub use predicate::{MemoryPredicate, RowScope, compare_field, compare_json, field_as, field_text};
pub use provider::MemoryOperationProvider;
pub use query::MemoryQuery;
