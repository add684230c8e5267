//! Engine configuration.
//!
//! [`EngineConfig`] carries the few tunables of predicate and page building.
//! It deserializes from any serde format, so it can be embedded in an
//! application's own configuration file.
//!
//! # Example
//!
//! ```
//! use quarry::EngineConfig;
//!
//! let config = EngineConfig::default()
//!     .with_default_limit(50)
//!     .with_nested_marker("sub:");
//!
//! assert_eq!(config.default_limit, 50);
//! assert_eq!(config.default_offset, 0);
//! ```

use serde::{Deserialize, Serialize};

/// Rows returned when a request carries no limit.
pub const DEFAULT_LIMIT: u32 = 200;

/// Rows skipped when a request carries no offset.
pub const DEFAULT_OFFSET: u64 = 0;

/// Operation-code prefix that marks a nested (subquery) operation.
pub const DEFAULT_NESTED_MARKER: &str = "nst:";

/// Maximum depth of nested groups inside one parameter.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 4;

/// Configuration for [`OperationService`](crate::core::OperationService).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Limit applied when the page attribute has none.
    pub default_limit: u32,

    /// Offset applied when the page attribute has none.
    pub default_offset: u64,

    /// Prefix on an operation code that selects the nested form.
    pub nested_marker: String,

    /// How many nested groups may be stacked inside one parameter.
    pub max_nesting_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            default_offset: DEFAULT_OFFSET,
            nested_marker: DEFAULT_NESTED_MARKER.to_string(),
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Sets the default limit.
    pub fn with_default_limit(mut self, limit: u32) -> Self {
        self.default_limit = limit;
        self
    }

    /// Sets the default offset.
    pub fn with_default_offset(mut self, offset: u64) -> Self {
        self.default_offset = offset;
        self
    }

    /// Sets the nested operation marker.
    pub fn with_nested_marker(mut self, marker: impl Into<String>) -> Self {
        self.nested_marker = marker.into();
        self
    }

    /// Sets the maximum nesting depth.
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Splits the nested marker off an operation code.
    ///
    /// Returns the remaining code when the marker is present.
    pub fn strip_nested_marker<'a>(&self, code: &'a str) -> Option<&'a str> {
        if self.nested_marker.is_empty() {
            return None;
        }
        code.strip_prefix(self.nested_marker.as_str())
    }
}
