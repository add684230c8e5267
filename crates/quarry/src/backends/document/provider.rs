//! [`OperationProvider`] producing MongoDB-style criteria.

use serde_json::{Value, json};

use crate::core::{
    OperationProvider, comparison_value, contains_tokens, like_pattern, like_to_regex,
    required_cast,
};
use crate::error::FilterResult;
use crate::search::{TypedValue, collection_cast};
use crate::types::{BaseSearchParam, GlueOperation};

/// Builds document criteria as JSON.
///
/// Criteria use the MongoDB query operators (`$eq`, `$in`, `$regex`, ...).
/// Subqueries are not supported.
#[derive(Debug, Clone, Default)]
pub struct DocumentOperationProvider;

impl DocumentOperationProvider {
    /// Creates a provider.
    pub fn new() -> Self {
        Self
    }

    fn operator(param: &BaseSearchParam, operator: &str, value: Value) -> Value {
        json!({ param.name.as_str(): { operator: value } })
    }

    fn range(&self, param: &BaseSearchParam, operator: &str) -> FilterResult<Value> {
        Ok(match comparison_value(param)? {
            Some(value) => Self::operator(param, operator, typed_to_json(&value)),
            None => self.find_all(),
        })
    }

    fn membership(&self, param: &BaseSearchParam, operator: &str) -> FilterResult<Value> {
        let values = collection_cast(param.value.as_ref())?;
        if values.is_empty() {
            return Ok(self.find_nothing());
        }

        let values: Vec<Value> = values.iter().map(typed_to_json).collect();
        Ok(Self::operator(param, operator, json!(values)))
    }

    fn regex(param: &BaseSearchParam, pattern: String) -> Value {
        json!({ param.name.as_str(): { "$regex": pattern, "$options": "i" } })
    }
}

/// Converts a typed value to its document representation.
///
/// Instants use the extended JSON form `{"$date": "<rfc3339>"}`.
pub fn typed_to_json(value: &TypedValue) -> Value {
    match value {
        TypedValue::String(s) => json!(s),
        TypedValue::Long(i) => json!(i),
        TypedValue::Double(f) => json!(f),
        TypedValue::Boolean(b) => json!(b),
        TypedValue::Instant(instant) => json!({ "$date": instant.to_rfc3339() }),
    }
}

impl OperationProvider for DocumentOperationProvider {
    type Fragment = Value;

    fn backend_name(&self) -> &'static str {
        "document"
    }

    fn like(&self, param: &BaseSearchParam) -> FilterResult<Value> {
        let pattern = like_pattern(param)?;
        Ok(Self::regex(param, like_to_regex(&pattern)))
    }

    fn eq(&self, param: &BaseSearchParam) -> FilterResult<Value> {
        let value = required_cast(param)?;
        Ok(Self::operator(param, "$eq", typed_to_json(&value)))
    }

    fn not_eq(&self, param: &BaseSearchParam) -> FilterResult<Value> {
        let value = required_cast(param)?;
        Ok(Self::operator(param, "$ne", typed_to_json(&value)))
    }

    fn in_values(&self, param: &BaseSearchParam) -> FilterResult<Value> {
        self.membership(param, "$in")
    }

    fn not_in(&self, param: &BaseSearchParam) -> FilterResult<Value> {
        self.membership(param, "$nin")
    }

    fn is_null(&self, param: &BaseSearchParam) -> FilterResult<Value> {
        Ok(json!({ param.name.as_str(): null }))
    }

    fn less_than(&self, param: &BaseSearchParam) -> FilterResult<Value> {
        self.range(param, "$lt")
    }

    fn greater_than(&self, param: &BaseSearchParam) -> FilterResult<Value> {
        self.range(param, "$gt")
    }

    fn less_than_or_equals(&self, param: &BaseSearchParam) -> FilterResult<Value> {
        self.range(param, "$lte")
    }

    fn greater_than_or_equals(&self, param: &BaseSearchParam) -> FilterResult<Value> {
        self.range(param, "$gte")
    }

    fn contains(&self, param: &BaseSearchParam) -> FilterResult<Value> {
        let criteria: Vec<Value> = contains_tokens(param)?
            .iter()
            .map(|token| Self::regex(param, regex::escape(token)))
            .collect();
        Ok(GlueOperation::And.glue_criteria(criteria))
    }

    fn find_all(&self) -> Value {
        json!({})
    }

    fn find_nothing(&self) -> Value {
        json!({ "$nor": [{}] })
    }

    fn and(&self, fragments: Vec<Value>) -> Value {
        GlueOperation::And.glue_criteria(fragments)
    }

    fn or(&self, fragments: Vec<Value>) -> Value {
        GlueOperation::Or.glue_criteria(fragments)
    }
}
