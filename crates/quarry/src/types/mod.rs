//! Core types of the filter request model.
//!
//! - [`BaseSearchParam`], [`ComplexSearchParam`], [`ParamValue`] - filter conditions
//! - [`GlueOperation`] - AND/OR glue between conditions and groups
//! - [`CommonOperationShell`], [`MultipleOperationShell`] - request shells
//! - [`PageAttribute`], [`PageRequest`], [`SortOrder`] - paging and sorting
//!
//! # Example
//!
//! ```
//! use quarry::types::{BaseSearchParam, ComplexSearchParam, GlueOperation, ParamValue};
//!
//! let group = ComplexSearchParam::new(
//!     vec![
//!         BaseSearchParam::eq("status", "active"),
//!         BaseSearchParam::new("age", "ge", 18i64),
//!     ],
//!     GlueOperation::And,
//! );
//!
//! assert_eq!(group.base_search_params[1].value, Some(ParamValue::Integer(18)));
//! ```

mod pagination;
mod search_params;
mod shell;

pub use pagination::{PageAttribute, PageRequest, SortDirection, SortOrder};
pub use search_params::{BaseSearchParam, ComplexSearchParam, GlueOperation, ParamValue};
pub use shell::{CommonOperationShell, MultipleOperationShell};
