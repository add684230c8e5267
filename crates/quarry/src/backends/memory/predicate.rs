//! Closure predicates over JSON rows.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::search::TypedValue;
use crate::search::value_type::{parse_boolean, parse_instant};

/// The rows visible to a predicate.
///
/// `row` is the row under test; `collection` is the whole data set, which
/// subqueries scan.
#[derive(Debug, Clone, Copy)]
pub struct RowScope<'a> {
    /// The row under test.
    pub row: &'a Value,
    /// Every row of the entity.
    pub collection: &'a [Value],
}

impl<'a> RowScope<'a> {
    /// Creates a scope.
    pub fn new(row: &'a Value, collection: &'a [Value]) -> Self {
        Self { row, collection }
    }

    /// Returns the same collection focused on another row.
    pub fn with_row(&self, row: &'a Value) -> Self {
        Self {
            row,
            collection: self.collection,
        }
    }

    /// Returns a field of the row, `None` when missing or null.
    pub fn field(&self, name: &str) -> Option<&'a Value> {
        self.row.get(name).filter(|value| !value.is_null())
    }
}

type MatchFn = dyn Fn(&RowScope<'_>) -> bool + Send + Sync;

/// A predicate evaluated against rows in memory.
#[derive(Clone)]
pub struct MemoryPredicate(Arc<MatchFn>);

impl MemoryPredicate {
    /// Wraps a closure.
    pub fn new(matches: impl Fn(&RowScope<'_>) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(matches))
    }

    /// Matches every row.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Matches no row.
    pub fn never() -> Self {
        Self::new(|_| false)
    }

    /// Evaluates the predicate in a scope.
    pub fn matches(&self, scope: &RowScope<'_>) -> bool {
        (self.0)(scope)
    }

    /// Evaluates the predicate for `row` of `collection`.
    pub fn evaluate(&self, row: &Value, collection: &[Value]) -> bool {
        self.matches(&RowScope::new(row, collection))
    }
}

impl fmt::Debug for MemoryPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MemoryPredicate(..)")
    }
}

/// Reads a JSON field as a value of the same type as `target`.
///
/// Text fields are parsed into the target's type so that a field stored as
/// `"2024-01-01T00:00:00Z"` compares as an instant.
pub fn field_as(field: &Value, target: &TypedValue) -> Option<TypedValue> {
    match field {
        Value::Number(n) => n
            .as_i64()
            .map(TypedValue::Long)
            .or_else(|| n.as_f64().map(TypedValue::Double)),
        Value::Bool(b) => Some(TypedValue::Boolean(*b)),
        Value::String(s) => match target {
            TypedValue::String(_) => Some(TypedValue::String(s.clone())),
            TypedValue::Long(_) => s.parse().ok().map(TypedValue::Long),
            TypedValue::Double(_) => s.parse().ok().map(TypedValue::Double),
            TypedValue::Boolean(_) => parse_boolean(s).map(TypedValue::Boolean),
            TypedValue::Instant(_) => parse_instant(s).map(TypedValue::Instant),
        },
        _ => None,
    }
}

/// Compares a JSON field with a typed value.
pub fn compare_field(field: &Value, target: &TypedValue) -> Option<Ordering> {
    field_as(field, target)?.compare(target)
}

/// Compares two JSON values of the same kind for a predicate.
///
/// Numbers compare numerically and booleans as booleans. Two strings compare
/// chronologically when both parse as instants, otherwise lexicographically.
/// Values of different kinds are incomparable and yield `None`. This is a
/// pairwise test used by membership and comparison predicates; row sorting
/// uses the kind-ranked order in the query module instead.
pub fn compare_json(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (Value::String(x), Value::String(y)) => match (parse_instant(x), parse_instant(y)) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => Some(x.cmp(y)),
        },
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Renders a field as text for pattern matching.
pub fn field_text(field: &Value) -> Option<String> {
    match field {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
