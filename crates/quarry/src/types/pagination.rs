//! Paging and sorting types.
//!
//! [`PageAttribute`] is what the caller asks for; [`PageRequest`] is the
//! resolved descriptor handed to the storage backend.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{FilterResult, OperationError, ValidationError};
use crate::search::{OperationProcess, OperationType};
use crate::types::{BaseSearchParam, ParamValue};

/// Requested paging and sorting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAttribute {
    /// Maximum number of rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Number of rows to skip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    /// Comma-delimited field names, `-` prefix for descending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
}

impl PageAttribute {
    /// Creates a page attribute.
    pub fn new(offset: Option<u64>, limit: Option<u32>, sort_by: Option<&str>) -> Self {
        Self {
            limit,
            offset,
            sort_by: sort_by.map(str::to_string),
        }
    }

    /// Collects the paging pseudo-parameters (`limit`, `offset`, `sortBy`)
    /// of a parameter list.
    ///
    /// Returns `None` when the list carries no paging parameter. Unknown
    /// operation codes are left for predicate building to report.
    pub fn from_params(params: &[BaseSearchParam]) -> FilterResult<Option<Self>> {
        let mut attribute = PageAttribute::default();
        let mut found = false;

        for param in params {
            let Ok(operation) = OperationType::of(param.operation.as_deref()) else {
                continue;
            };
            if operation.process() != OperationProcess::Paging {
                continue;
            }
            found = true;

            match operation {
                OperationType::Limit => {
                    let limit = paging_number(operation, param.value.as_ref())?;
                    attribute.limit = Some(u32::try_from(limit).map_err(|_| {
                        ValidationError::InvalidPagingValue {
                            code: operation.code().to_string(),
                            value: limit.to_string(),
                        }
                    })?);
                }
                OperationType::Offset => {
                    attribute.offset = Some(paging_number(operation, param.value.as_ref())?);
                }
                OperationType::SortBy => {
                    attribute.sort_by = param.value.as_ref().map(ParamValue::to_raw_string);
                }
                other => {
                    return Err(OperationError::PagingOperation {
                        code: other.code().to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(found.then_some(attribute))
    }

    /// Fills the fields missing here from `fallback`.
    pub fn or(self, fallback: PageAttribute) -> Self {
        Self {
            limit: self.limit.or(fallback.limit),
            offset: self.offset.or(fallback.offset),
            sort_by: self.sort_by.or(fallback.sort_by),
        }
    }
}

fn paging_number(operation: OperationType, value: Option<&ParamValue>) -> FilterResult<u64> {
    let invalid = |raw: String| ValidationError::InvalidPagingValue {
        code: operation.code().to_string(),
        value: raw,
    };

    match value {
        Some(ParamValue::Integer(i)) => u64::try_from(*i).map_err(|_| invalid(i.to_string()).into()),
        Some(ParamValue::Text(s)) => s.trim().parse::<u64>().map_err(|_| invalid(s.clone()).into()),
        Some(other) => Err(invalid(other.to_raw_string()).into()),
        None => Err(invalid(String::new()).into()),
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortOrder {
    /// The field to sort by.
    pub field: String,
    /// The direction.
    pub direction: SortDirection,
}

impl SortOrder {
    /// Ascending order on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending order on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// A resolved page descriptor.
///
/// `offset` is always the literal number of rows to skip. There is no page
/// index: backends that page by index must translate from the offset, never
/// the other way around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Rows to skip.
    pub offset: u64,
    /// Maximum rows to return.
    pub limit: u32,
    /// Sort keys, most significant first. Empty means unsorted.
    pub orders: Vec<SortOrder>,
}

impl PageRequest {
    /// Creates a page descriptor.
    pub fn new(offset: u64, limit: u32, orders: Vec<SortOrder>) -> Self {
        Self {
            offset,
            limit,
            orders,
        }
    }

    /// Returns true if no sort keys were requested.
    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }
}
