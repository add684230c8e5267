//! Error types for predicate composition.
//!
//! All failures are raised synchronously at the point of detection and
//! propagated unchanged to the caller of the top-level build entry points.
//! They are grouped by category: operation dispatch, value typing, sorting,
//! parameter validation and startup configuration.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all predicate and page building.
#[derive(Error, Debug)]
pub enum FilterError {
    /// Operation code resolution and dispatch errors
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// Value type inference errors
    #[error(transparent)]
    Value(#[from] ValueError),

    /// Sort specification errors
    #[error(transparent)]
    Sort(#[from] SortError),

    /// Parameter validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Startup configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to operation codes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// No operation is registered under this wire code.
    #[error("operation {code} not found")]
    UnknownOperation { code: String },

    /// The code is valid but has no nested (subquery) form.
    #[error("nested operation {code} not supported")]
    UnsupportedNestedOperation { code: String },

    /// The backend cannot build subqueries.
    #[error("nested operations not supported by the {backend} backend")]
    NestedNotSupported { backend: String },

    /// Nested groups are nested deeper than the configured maximum.
    #[error("nesting depth {depth} exceeds maximum allowed depth {max}")]
    NestingTooDeep { depth: usize, max: usize },

    /// A paging pseudo-code was dispatched as a search operation.
    #[error("operation {code} is a paging operation and builds no predicate")]
    PagingOperation { code: String },
}

/// Errors raised while inferring or casting a raw value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// No value type accepts the raw value.
    #[error("cannot infer a value type for '{value}'")]
    NoMatchingType { value: String },

    /// A collection element does not fit the type inferred from the first element.
    #[error("cannot cast '{value}' to {value_type}")]
    CastFailed { value: String, value_type: String },

    /// The operation requires a value but the parameter has none.
    #[error("parameter '{field}' has no value")]
    MissingValue { field: String },

    /// Numeric input that is NaN or infinite.
    #[error("non-finite number '{value}'")]
    NonFiniteNumber { value: String },

    /// A pattern value cannot be compiled into a matcher.
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Errors related to sort specifications.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// At least one sort token does not match the field-name pattern.
    #[error("fields names: {tokens:?} - don't match the sort pattern")]
    InvalidTokens { tokens: Vec<String> },

    /// The field is not in the sort allow-list.
    #[error("not found parameter with name: {field}")]
    UnknownField { field: String },
}

/// Errors related to the shape of request parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The value of a nested operation is not a filter group.
    #[error("invalid nested value for parameter '{parameter}': {message}")]
    MalformedNestedValue { parameter: String, message: String },

    /// A paging pseudo-parameter carries an unusable value.
    #[error("invalid value '{value}' for paging operation {code}")]
    InvalidPagingValue { code: String, value: String },
}

/// Errors detected while wiring the engine at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Two manual operations were registered for the same field.
    #[error("duplicate manual operation registered for field '{field}'")]
    DuplicateManualOperation { field: String },
}

/// Result type alias for predicate and page building.
pub type FilterResult<T> = Result<T, FilterError>;
