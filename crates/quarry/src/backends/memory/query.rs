//! Filtering and paging of in-memory rows.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::{Number, Value};

use crate::search::value_type::parse_instant;
use crate::types::{PageRequest, SortDirection};

use super::predicate::{MemoryPredicate, RowScope};

/// Runs a predicate and a page over a slice of rows.
#[derive(Debug, Clone, Copy)]
pub struct MemoryQuery<'a> {
    rows: &'a [Value],
}

impl<'a> MemoryQuery<'a> {
    /// Creates a query over `rows`.
    pub fn new(rows: &'a [Value]) -> Self {
        Self { rows }
    }

    /// Returns every row matching `predicate`, in input order.
    pub fn filter(&self, predicate: &MemoryPredicate) -> Vec<&'a Value> {
        self.rows
            .iter()
            .filter(|row| predicate.matches(&RowScope::new(row, self.rows)))
            .collect()
    }

    /// Filters, sorts, skips `page.offset` rows and takes `page.limit`.
    ///
    /// Sorting is stable; missing and null fields sort first in ascending
    /// order and values of different kinds never compare equal.
    pub fn execute(&self, predicate: &MemoryPredicate, page: &PageRequest) -> Vec<&'a Value> {
        let mut matched = self.filter(predicate);

        if !page.is_unsorted() {
            matched.sort_by(|a, b| {
                page.orders
                    .iter()
                    .map(|order| {
                        let ordering = compare_field_values(a.get(&order.field), b.get(&order.field));
                        match order.direction {
                            SortDirection::Asc => ordering,
                            SortDirection::Desc => ordering.reverse(),
                        }
                    })
                    .find(|ordering| *ordering != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
        matched
            .into_iter()
            .skip(offset)
            .take(page.limit as usize)
            .collect()
    }
}

/// Orders two field values for sorting.
///
/// Kinds rank first: missing or null, booleans, numbers, strings, arrays,
/// objects. Strings that parse as instants sort before other strings and
/// compare chronologically; other strings compare lexicographically. All
/// arrays are equal, as are all objects.
fn compare_field_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    SortKey::of(a).cmp(&SortKey::of(b))
}

/// Sort position of one field value. Variant order is the kind rank.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey<'v> {
    Missing,
    Bool(bool),
    Number(NumberKey),
    Instant(DateTime<Utc>, &'v str),
    Text(&'v str),
    Array,
    Object,
}

impl<'v> SortKey<'v> {
    fn of(value: Option<&'v Value>) -> Self {
        match value {
            None | Some(Value::Null) => SortKey::Missing,
            Some(Value::Bool(b)) => SortKey::Bool(*b),
            Some(Value::Number(n)) => SortKey::Number(NumberKey::of(n)),
            Some(Value::String(s)) => match parse_instant(s) {
                Some(instant) => SortKey::Instant(instant, s),
                None => SortKey::Text(s),
            },
            Some(Value::Array(_)) => SortKey::Array,
            Some(Value::Object(_)) => SortKey::Object,
        }
    }
}

/// Numeric sort position.
///
/// Ordered by the `f64` value, then floats before integers, then the exact
/// integer. Integers too large for `f64` keep their exact order.
#[derive(Debug, Clone, Copy)]
struct NumberKey {
    approx: f64,
    exact: Option<i128>,
}

impl NumberKey {
    fn of(number: &Number) -> Self {
        let exact = number
            .as_i64()
            .map(i128::from)
            .or_else(|| number.as_u64().map(i128::from));
        Self {
            approx: number.as_f64().unwrap_or(0.0),
            exact,
        }
    }
}

impl Ord for NumberKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.approx
            .total_cmp(&other.approx)
            .then_with(|| self.exact.cmp(&other.exact))
    }
}

impl PartialOrd for NumberKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NumberKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NumberKey {}
