//! Document query assembly.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::types::{PageRequest, SortDirection};

/// A complete document query ready to be sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentQuery {
    /// The filter criteria.
    pub filter: Value,
    /// Sort keys in request order; `1` ascending, `-1` descending.
    pub sort: Map<String, Value>,
    /// Documents to skip.
    pub skip: u64,
    /// Maximum documents to return.
    pub limit: u32,
}

impl DocumentQuery {
    /// Returns the query as one JSON object.
    pub fn to_json(&self) -> Value {
        json!({
            "filter": self.filter,
            "sort": self.sort,
            "skip": self.skip,
            "limit": self.limit,
        })
    }
}

/// Builds document queries from criteria and a page.
#[derive(Debug, Clone, Default)]
pub struct DocumentQueryBuilder;

impl DocumentQueryBuilder {
    /// Creates a builder.
    pub fn new() -> Self {
        Self
    }

    /// Builds a complete query.
    pub fn build(&self, filter: Value, page: &PageRequest) -> DocumentQuery {
        DocumentQuery {
            filter,
            sort: self.build_sort(page),
            skip: page.offset,
            limit: page.limit,
        }
    }

    /// Builds the sort document.
    pub fn build_sort(&self, page: &PageRequest) -> Map<String, Value> {
        page.orders
            .iter()
            .map(|order| {
                let direction = match order.direction {
                    SortDirection::Asc => 1,
                    SortDirection::Desc => -1,
                };
                (order.field.clone(), json!(direction))
            })
            .collect()
    }
}
