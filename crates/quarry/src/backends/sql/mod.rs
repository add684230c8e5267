//! Relational backend.
//!
//! [`SqlOperationProvider`] builds [`SqlPredicate`] trees. A tree is rendered
//! into a parameterised [`SqlFragment`] only when a [`SqlQueryBuilder`] (or
//! [`SqlPredicate::render`]) binds it to a table alias.
//!
//! # Example
//!
//! ```
//! use quarry::backends::sql::{SqlOperationProvider, SqlQueryBuilder};
//! use quarry::types::{BaseSearchParam, GlueOperation, PageRequest, SortOrder};
//! use quarry::OperationService;
//!
//! let service = OperationService::new(SqlOperationProvider::new("orders"));
//! let predicate = service
//!     .build_base_by_params(&[BaseSearchParam::eq("status", "active")], GlueOperation::And)
//!     .unwrap();
//!
//! let page = PageRequest::new(10, 5, vec![SortOrder::desc("createdAt")]);
//! let statement = SqlQueryBuilder::new("orders").build(&predicate, &page);
//! assert_eq!(
//!     statement.sql,
//!     r#"SELECT t0.* FROM "orders" t0 WHERE t0."status" = ?1 ORDER BY t0."createdAt" DESC LIMIT 5 OFFSET 10"#
//! );
//! ```

mod fragment;
mod predicate;
mod provider;
mod query_builder;

pub use fragment::{LIKE_ESCAPE, SqlFragment, SqlParam, escape_like, quote_identifier};
pub use predicate::{Comparison, RowBinding, SqlPredicate};
pub use provider::SqlOperationProvider;
pub use query_builder::SqlQueryBuilder;
