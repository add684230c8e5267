//! Operation registry.
//!
//! Maps wire codes to [`OperationType`] variants and binds each searching
//! variant to the matching capability of an [`OperationProvider`].

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::core::OperationProvider;
use crate::error::{FilterResult, OperationError};
use crate::types::BaseSearchParam;

/// What an operation code is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationProcess {
    /// Builds a predicate fragment.
    Searching,
    /// Carries paging input; never reaches a backend.
    Paging,
}

/// A predicate-building function bound to a backend.
pub type Operation<P> =
    fn(&P, &BaseSearchParam) -> FilterResult<<P as OperationProvider>::Fragment>;

/// Operations addressable by wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    /// `eq`
    Eq,
    /// `notEq`
    NotEq,
    /// `like`
    Like,
    /// `in`
    In,
    /// `notIn`
    NotIn,
    /// `isNull`
    IsNull,
    /// `lt`
    Lt,
    /// `gt`
    Gt,
    /// `le`
    Le,
    /// `ge`
    Ge,
    /// `contains`
    Contains,
    /// `limit`
    Limit,
    /// `offset`
    Offset,
    /// `sortBy`
    SortBy,
}

static OPERATIONS: LazyLock<HashMap<&'static str, OperationType>> = LazyLock::new(|| {
    let operations: HashMap<_, _> = OperationType::ALL
        .into_iter()
        .map(|operation| (operation.code(), operation))
        .collect();
    tracing::info!(count = operations.len(), "Operation registry initialized");
    operations
});

impl OperationType {
    /// Every operation, searching first.
    pub const ALL: [OperationType; 14] = [
        OperationType::Eq,
        OperationType::NotEq,
        OperationType::Like,
        OperationType::In,
        OperationType::NotIn,
        OperationType::IsNull,
        OperationType::Lt,
        OperationType::Gt,
        OperationType::Le,
        OperationType::Ge,
        OperationType::Contains,
        OperationType::Limit,
        OperationType::Offset,
        OperationType::SortBy,
    ];

    /// Returns the wire code.
    pub fn code(self) -> &'static str {
        match self {
            OperationType::Eq => "eq",
            OperationType::NotEq => "notEq",
            OperationType::Like => "like",
            OperationType::In => "in",
            OperationType::NotIn => "notIn",
            OperationType::IsNull => "isNull",
            OperationType::Lt => "lt",
            OperationType::Gt => "gt",
            OperationType::Le => "le",
            OperationType::Ge => "ge",
            OperationType::Contains => "contains",
            OperationType::Limit => "limit",
            OperationType::Offset => "offset",
            OperationType::SortBy => "sortBy",
        }
    }

    /// Returns whether the code builds a predicate or carries paging.
    pub fn process(self) -> OperationProcess {
        match self {
            OperationType::Limit | OperationType::Offset | OperationType::SortBy => {
                OperationProcess::Paging
            }
            _ => OperationProcess::Searching,
        }
    }

    /// Resolves a wire code.
    ///
    /// An absent or blank code means `eq`. Lookup is exact and case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::UnknownOperation`] for unregistered codes.
    pub fn of<'a>(code: impl Into<Option<&'a str>>) -> Result<Self, OperationError> {
        let code = match code.into() {
            Some(code) if !code.trim().is_empty() => code,
            _ => return Ok(OperationType::Eq),
        };

        OPERATIONS
            .get(code)
            .copied()
            .ok_or_else(|| OperationError::UnknownOperation {
                code: code.to_string(),
            })
    }

    /// Binds this operation to the provider's capability.
    ///
    /// Paging operations have no builder and return `None`.
    pub fn operation<P: OperationProvider>(self) -> Option<Operation<P>> {
        let operation: Operation<P> = match self {
            OperationType::Eq => P::eq,
            OperationType::NotEq => P::not_eq,
            OperationType::Like => P::like,
            OperationType::In => P::in_values,
            OperationType::NotIn => P::not_in,
            OperationType::IsNull => P::is_null,
            OperationType::Lt => P::less_than,
            OperationType::Gt => P::greater_than,
            OperationType::Le => P::less_than_or_equals,
            OperationType::Ge => P::greater_than_or_equals,
            OperationType::Contains => P::contains,
            OperationType::Limit | OperationType::Offset | OperationType::SortBy => return None,
        };
        Some(operation)
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Operations that can compare a field against a subquery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NestedOperation {
    /// Field is among the subquery results.
    In,
    /// Field is not among the subquery results.
    NotIn,
    /// Field equals the single subquery result.
    Eq,
    /// Field differs from the single subquery result.
    NotEq,
    /// Field is null; the subquery is ignored.
    IsNull,
    /// Field is less than the single subquery result.
    Lt,
    /// Field is greater than the single subquery result.
    Gt,
    /// Field is less than or equal to the single subquery result.
    Le,
    /// Field is greater than or equal to the single subquery result.
    Ge,
}

impl NestedOperation {
    /// Resolves a wire code with the nesting marker already stripped.
    ///
    /// A blank code means `eq`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::UnsupportedNestedOperation`] for codes that
    /// have no nested form (including unknown codes).
    pub fn of(code: &str) -> Result<Self, OperationError> {
        let operation = match OperationType::of(code) {
            Ok(OperationType::In) => NestedOperation::In,
            Ok(OperationType::NotIn) => NestedOperation::NotIn,
            Ok(OperationType::Eq) => NestedOperation::Eq,
            Ok(OperationType::NotEq) => NestedOperation::NotEq,
            Ok(OperationType::IsNull) => NestedOperation::IsNull,
            Ok(OperationType::Lt) => NestedOperation::Lt,
            Ok(OperationType::Gt) => NestedOperation::Gt,
            Ok(OperationType::Le) => NestedOperation::Le,
            Ok(OperationType::Ge) => NestedOperation::Ge,
            _ => {
                return Err(OperationError::UnsupportedNestedOperation {
                    code: code.to_string(),
                });
            }
        };
        Ok(operation)
    }

    /// Returns the wire code without the marker.
    pub fn code(self) -> &'static str {
        self.operation_type().code()
    }

    /// Returns the flat operation this nested operation mirrors.
    pub fn operation_type(self) -> OperationType {
        match self {
            NestedOperation::In => OperationType::In,
            NestedOperation::NotIn => OperationType::NotIn,
            NestedOperation::Eq => OperationType::Eq,
            NestedOperation::NotEq => OperationType::NotEq,
            NestedOperation::IsNull => OperationType::IsNull,
            NestedOperation::Lt => OperationType::Lt,
            NestedOperation::Gt => OperationType::Gt,
            NestedOperation::Le => OperationType::Le,
            NestedOperation::Ge => OperationType::Ge,
        }
    }
}

impl fmt::Display for NestedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of_blank_is_eq() {
        assert_eq!(OperationType::of("").unwrap(), OperationType::Eq);
        assert_eq!(OperationType::of("   ").unwrap(), OperationType::Eq);
        assert_eq!(OperationType::of(None::<&str>).unwrap(), OperationType::Eq);
    }

    #[test]
    fn test_of_unknown() {
        let err = OperationType::of("bogus").unwrap_err();
        assert_eq!(err.to_string(), "operation bogus not found");
        // Codes are case-sensitive.
        assert!(OperationType::of("NOTEQ").is_err());
    }

    #[test]
    fn test_codes_are_unique_and_resolvable() {
        for operation in OperationType::ALL {
            assert_eq!(OperationType::of(operation.code()).unwrap(), operation);
        }
        assert_eq!(OPERATIONS.len(), OperationType::ALL.len());
    }

    #[test]
    fn test_process_tags() {
        assert_eq!(OperationType::Limit.process(), OperationProcess::Paging);
        assert_eq!(OperationType::SortBy.process(), OperationProcess::Paging);
        assert_eq!(OperationType::Contains.process(), OperationProcess::Searching);
    }

    #[test]
    fn test_nested_of() {
        assert_eq!(NestedOperation::of("in").unwrap(), NestedOperation::In);
        assert_eq!(NestedOperation::of("").unwrap(), NestedOperation::Eq);
        assert_eq!(NestedOperation::of("ge").unwrap(), NestedOperation::Ge);

        let err = NestedOperation::of("like").unwrap_err();
        assert_eq!(
            err,
            OperationError::UnsupportedNestedOperation {
                code: "like".to_string()
            }
        );
        assert_eq!(
            NestedOperation::of("contains").unwrap_err(),
            OperationError::UnsupportedNestedOperation {
                code: "contains".to_string()
            }
        );
        assert!(NestedOperation::of("limit").is_err());
        assert!(NestedOperation::of("bogus").is_err());
    }
}
