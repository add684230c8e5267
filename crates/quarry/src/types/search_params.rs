//! Search parameter types.
//!
//! This module defines the wire-level model of a filter request: one atomic
//! condition ([`BaseSearchParam`]), a glued group of conditions
//! ([`ComplexSearchParam`]) and the logical glue between them
//! ([`GlueOperation`]).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Logical operator joining predicate fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GlueOperation {
    /// Every fragment must match (default).
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    /// At least one fragment must match.
    #[serde(rename = "OR", alias = "or")]
    Or,
}

impl fmt::Display for GlueOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlueOperation::And => write!(f, "AND"),
            GlueOperation::Or => write!(f, "OR"),
        }
    }
}

impl FromStr for GlueOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AND" => Ok(GlueOperation::And),
            "OR" => Ok(GlueOperation::Or),
            _ => Err(format!("unknown glue operation: {}", s)),
        }
    }
}

/// The raw value of a search parameter.
///
/// Typed JSON scalars keep their type; only [`ParamValue::Text`] goes through
/// value type inference. Objects are either a nested filter group or, when
/// they do not have that shape, kept as raw JSON so the nested builder can
/// report a validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A JSON boolean.
    Bool(bool),
    /// A JSON integer.
    Integer(i64),
    /// A JSON floating point number.
    Float(f64),
    /// Untyped text, possibly a comma-delimited list.
    Text(String),
    /// An already typed date-time.
    Instant(DateTime<Utc>),
    /// A nested filter group.
    Group(ComplexSearchParam),
    /// Any other JSON structure.
    Structured(Value),
}

impl ParamValue {
    /// Returns the value as text, the way it appears on the wire.
    pub fn to_raw_string(&self) -> String {
        match self {
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Integer(i) => i.to_string(),
            ParamValue::Float(f) => f.to_string(),
            ParamValue::Text(s) => s.clone(),
            ParamValue::Instant(instant) => instant.to_rfc3339(),
            ParamValue::Group(group) => {
                serde_json::to_string(group).unwrap_or_else(|_| String::from("{}"))
            }
            ParamValue::Structured(value) => value.to_string(),
        }
    }

    /// Interprets the value as a nested filter group.
    pub fn to_group(&self, parameter: &str) -> Result<ComplexSearchParam, ValidationError> {
        match self {
            ParamValue::Group(group) => Ok(group.clone()),
            ParamValue::Structured(value) => serde_json::from_value(value.clone()).map_err(|e| {
                ValidationError::MalformedNestedValue {
                    parameter: parameter.to_string(),
                    message: e.to_string(),
                }
            }),
            other => Err(ValidationError::MalformedNestedValue {
                parameter: parameter.to_string(),
                message: format!("expected a filter group, found '{}'", other.to_raw_string()),
            }),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(value: DateTime<Utc>) -> Self {
        ParamValue::Instant(value)
    }
}

impl From<ComplexSearchParam> for ParamValue {
    fn from(value: ComplexSearchParam) -> Self {
        ParamValue::Group(value)
    }
}

/// One atomic filter condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseSearchParam {
    /// The field the condition applies to.
    pub name: String,

    /// The raw value, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ParamValue>,

    /// The operation wire code; absent or blank means `eq`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

impl BaseSearchParam {
    /// Creates a parameter with an explicit operation code.
    pub fn new(
        name: impl Into<String>,
        operation: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            operation: Some(operation.into()),
        }
    }

    /// Creates a parameter using the default (`eq`) operation.
    pub fn eq(name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            operation: None,
        }
    }

    /// Creates a parameter that carries no value.
    pub fn without_value(name: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            operation: Some(operation.into()),
        }
    }

    /// Returns the operation code, or an empty string when absent.
    pub fn operation_code(&self) -> &str {
        self.operation.as_deref().unwrap_or("")
    }
}

/// A group of conditions joined by one internal glue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ComplexSearchParam {
    /// The conditions of the group, in order.
    #[serde(default)]
    pub base_search_params: Vec<BaseSearchParam>,

    /// How the conditions are joined.
    #[serde(default)]
    pub internal_glue: GlueOperation,
}

impl ComplexSearchParam {
    /// Creates a group with the given glue.
    pub fn new(base_search_params: Vec<BaseSearchParam>, internal_glue: GlueOperation) -> Self {
        Self {
            base_search_params,
            internal_glue,
        }
    }

    /// Creates an AND group.
    pub fn all(base_search_params: Vec<BaseSearchParam>) -> Self {
        Self::new(base_search_params, GlueOperation::And)
    }

    /// Creates an OR group.
    pub fn any(base_search_params: Vec<BaseSearchParam>) -> Self {
        Self::new(base_search_params, GlueOperation::Or)
    }
}
