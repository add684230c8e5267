//! Value type inference.
//!
//! Raw parameter values carry no schema. [`cast`] classifies a value into one
//! of the [`ValueType`] variants and converts it; [`collection_cast`] does the
//! same for a comma-delimited list.
//!
//! # Inference order
//!
//! Variants are tried in [`ValueType::ALL`] order and the first whose check
//! accepts the value wins: LONG, DOUBLE, BOOLEAN, INSTANT, STRING. STRING's
//! check additionally rejects text that parses as an instant, so a timestamp
//! never degrades to plain text even if STRING were tried earlier.
//!
//! Typed JSON scalars (integers, floats, booleans) skip inference and keep
//! their own type.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::types::ParamValue;

/// Separator of list values.
pub const VALUE_SEPARATOR: char = ',';

/// Semantic type of a raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// 64-bit signed integer.
    Long,
    /// Finite double precision number.
    Double,
    /// Boolean, parsed leniently from text.
    Boolean,
    /// UTC date-time, parsed from RFC 3339 text.
    Instant,
    /// Any other text.
    String,
}

impl ValueType {
    /// All variants in inference priority order.
    pub const ALL: [ValueType; 5] = [
        ValueType::Long,
        ValueType::Double,
        ValueType::Boolean,
        ValueType::Instant,
        ValueType::String,
    ];

    /// Returns true if `value` can be cast to this type.
    pub fn check_value_type(self, value: &ParamValue) -> bool {
        match (self, value) {
            (ValueType::Long, ParamValue::Integer(_)) => true,
            (ValueType::Double, ParamValue::Float(f)) => f.is_finite(),
            (ValueType::Boolean, ParamValue::Bool(_)) => true,
            (ValueType::Instant, ParamValue::Instant(_)) => true,
            (_, ParamValue::Text(text)) => self.check_text(text),
            _ => false,
        }
    }

    fn check_text(self, text: &str) -> bool {
        match self {
            ValueType::Long => text.parse::<i64>().is_ok(),
            ValueType::Double => text.parse::<f64>().map(f64::is_finite).unwrap_or(false),
            ValueType::Boolean => parse_boolean(text).is_some(),
            ValueType::Instant => parse_instant(text).is_some(),
            ValueType::String => parse_instant(text).is_none(),
        }
    }

    /// Casts `value` to this type.
    pub fn simple_cast(self, value: &ParamValue) -> Result<TypedValue, ValueError> {
        let cast = match (self, value) {
            (ValueType::Long, ParamValue::Integer(i)) => Some(TypedValue::Long(*i)),
            (ValueType::Double, ParamValue::Float(f)) if f.is_finite() => {
                Some(TypedValue::Double(*f))
            }
            (ValueType::Double, ParamValue::Integer(i)) => Some(TypedValue::Double(*i as f64)),
            (ValueType::Boolean, ParamValue::Bool(b)) => Some(TypedValue::Boolean(*b)),
            (ValueType::Instant, ParamValue::Instant(instant)) => {
                Some(TypedValue::Instant(*instant))
            }
            (_, ParamValue::Text(text)) => self.cast_text(text),
            _ => None,
        };

        cast.ok_or_else(|| ValueError::CastFailed {
            value: value.to_raw_string(),
            value_type: self.to_string(),
        })
    }

    fn cast_text(self, text: &str) -> Option<TypedValue> {
        match self {
            ValueType::Long => text.parse().ok().map(TypedValue::Long),
            ValueType::Double => text
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(TypedValue::Double),
            ValueType::Boolean => parse_boolean(text).map(TypedValue::Boolean),
            ValueType::Instant => parse_instant(text).map(TypedValue::Instant),
            ValueType::String => Some(TypedValue::String(text.to_string())),
        }
    }

    /// Returns the first type, in priority order, that accepts `value`.
    pub fn infer(value: &ParamValue) -> Option<ValueType> {
        ValueType::ALL
            .into_iter()
            .find(|value_type| value_type.check_value_type(value))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Long => write!(f, "long"),
            ValueType::Double => write!(f, "double"),
            ValueType::Boolean => write!(f, "boolean"),
            ValueType::Instant => write!(f, "instant"),
            ValueType::String => write!(f, "string"),
        }
    }
}

/// A value after type inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypedValue {
    /// Text.
    String(String),
    /// Integer.
    Long(i64),
    /// Finite number.
    Double(f64),
    /// Boolean.
    Boolean(bool),
    /// UTC date-time.
    Instant(DateTime<Utc>),
}

impl TypedValue {
    /// Returns the type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            TypedValue::String(_) => ValueType::String,
            TypedValue::Long(_) => ValueType::Long,
            TypedValue::Double(_) => ValueType::Double,
            TypedValue::Boolean(_) => ValueType::Boolean,
            TypedValue::Instant(_) => ValueType::Instant,
        }
    }

    /// Orders two values of compatible types.
    ///
    /// Longs and doubles compare numerically; other types only compare with
    /// their own kind.
    pub fn compare(&self, other: &TypedValue) -> Option<Ordering> {
        match (self, other) {
            (TypedValue::String(a), TypedValue::String(b)) => Some(a.cmp(b)),
            (TypedValue::Long(a), TypedValue::Long(b)) => Some(a.cmp(b)),
            (TypedValue::Long(a), TypedValue::Double(b)) => (*a as f64).partial_cmp(b),
            (TypedValue::Double(a), TypedValue::Long(b)) => a.partial_cmp(&(*b as f64)),
            (TypedValue::Double(a), TypedValue::Double(b)) => a.partial_cmp(b),
            (TypedValue::Boolean(a), TypedValue::Boolean(b)) => Some(a.cmp(b)),
            (TypedValue::Instant(a), TypedValue::Instant(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::String(s) => write!(f, "{}", s),
            TypedValue::Long(i) => write!(f, "{}", i),
            TypedValue::Double(d) => write!(f, "{}", d),
            TypedValue::Boolean(b) => write!(f, "{}", b),
            TypedValue::Instant(instant) => write!(f, "{}", instant.to_rfc3339()),
        }
    }
}

/// Casts a raw value to the first type that accepts it.
pub fn cast(value: &ParamValue) -> Result<TypedValue, ValueError> {
    if let ParamValue::Float(f) = value
        && !f.is_finite()
    {
        return Err(ValueError::NonFiniteNumber {
            value: f.to_string(),
        });
    }

    let value_type = ValueType::infer(value).ok_or_else(|| ValueError::NoMatchingType {
        value: value.to_raw_string(),
    })?;
    value_type.simple_cast(value)
}

/// Casts a comma-delimited value to a list.
///
/// The type is inferred from the first element only and applied to every
/// element, so `"1,a"` fails on `a` instead of mixing types. Absent and blank
/// values yield an empty list; typed scalars yield a one-element list.
pub fn collection_cast(value: Option<&ParamValue>) -> Result<Vec<TypedValue>, ValueError> {
    let text = match value {
        None => return Ok(Vec::new()),
        Some(ParamValue::Text(text)) => text,
        Some(other) => return cast(other).map(|typed| vec![typed]),
    };

    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let elements: Vec<ParamValue> = text
        .split(VALUE_SEPARATOR)
        .map(|element| ParamValue::Text(element.to_string()))
        .collect();

    let value_type =
        ValueType::infer(&elements[0]).ok_or_else(|| ValueError::NoMatchingType {
            value: elements[0].to_raw_string(),
        })?;

    elements
        .iter()
        .map(|element| value_type.simple_cast(element))
        .collect()
}

/// Parses a boolean leniently.
///
/// Accepts `true/false`, `yes/no`, `on/off`, `y/n` and `t/f` in any case;
/// anything else is no match.
pub fn parse_boolean(text: &str) -> Option<bool> {
    match text.to_lowercase().as_str() {
        "true" | "yes" | "on" | "y" | "t" => Some(true),
        "false" | "no" | "off" | "n" | "f" => Some(false),
        _ => None,
    }
}

/// Parses an RFC 3339 / ISO-8601 instant.
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|instant| instant.with_timezone(&Utc))
}
