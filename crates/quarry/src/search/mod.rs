//! Backend-independent search machinery.
//!
//! - [`value_type`] - schema-less value type inference
//! - [`operation`] - the operation code registry and nested operations
//! - [`glue`] - AND/OR combination
//! - [`sort`] - sort specification and page resolution
//! - [`manual`] - per-field manual overrides

pub mod glue;
pub mod manual;
pub mod operation;
pub mod sort;
pub mod value_type;

pub use manual::{ManualOperation, ManualOperationProvider, ManualOperationRegistry};
pub use operation::{NestedOperation, Operation, OperationProcess, OperationType};
pub use sort::{resolve_page, resolve_sort};
pub use value_type::{TypedValue, ValueType, cast, collection_cast};
