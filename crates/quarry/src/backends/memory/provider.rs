//! [`OperationProvider`] producing [`MemoryPredicate`] closures.

use std::cmp::Ordering;

use regex::RegexBuilder;

use crate::core::{
    OperationProvider, comparison_value, contains_tokens, like_pattern, like_to_regex,
    required_cast,
};
use crate::error::{FilterResult, ValueError};
use crate::search::{NestedOperation, TypedValue, collection_cast};
use crate::types::BaseSearchParam;

use super::predicate::{MemoryPredicate, compare_field, compare_json, field_text};

const EQUAL: &[Ordering] = &[Ordering::Equal];
const NOT_EQUAL: &[Ordering] = &[Ordering::Less, Ordering::Greater];
const LESS: &[Ordering] = &[Ordering::Less];
const LESS_OR_EQUAL: &[Ordering] = &[Ordering::Less, Ordering::Equal];
const GREATER: &[Ordering] = &[Ordering::Greater];
const GREATER_OR_EQUAL: &[Ordering] = &[Ordering::Greater, Ordering::Equal];

/// Builds predicates evaluated over `serde_json::Value` rows.
///
/// Null and missing fields behave like SQL `NULL`: only `isNull` matches
/// them. Values of incomparable types never match a comparison.
#[derive(Debug, Clone, Default)]
pub struct MemoryOperationProvider;

impl MemoryOperationProvider {
    /// Creates a provider.
    pub fn new() -> Self {
        Self
    }

    fn compare(
        param: &BaseSearchParam,
        target: TypedValue,
        accepted: &'static [Ordering],
    ) -> MemoryPredicate {
        let field = param.name.clone();
        MemoryPredicate::new(move |scope| {
            scope
                .field(&field)
                .and_then(|value| compare_field(value, &target))
                .is_some_and(|ordering| accepted.contains(&ordering))
        })
    }

    fn range(
        &self,
        param: &BaseSearchParam,
        accepted: &'static [Ordering],
    ) -> FilterResult<MemoryPredicate> {
        Ok(match comparison_value(param)? {
            Some(target) => Self::compare(param, target, accepted),
            None => self.find_all(),
        })
    }

    fn membership(
        &self,
        param: &BaseSearchParam,
        negated: bool,
    ) -> FilterResult<MemoryPredicate> {
        let values = collection_cast(param.value.as_ref())?;
        if values.is_empty() {
            return Ok(self.find_nothing());
        }

        let field = param.name.clone();
        Ok(MemoryPredicate::new(move |scope| {
            let Some(value) = scope.field(&field) else {
                return false;
            };
            let found = values
                .iter()
                .any(|target| compare_field(value, target) == Some(Ordering::Equal));
            found != negated
        }))
    }
}

impl OperationProvider for MemoryOperationProvider {
    type Fragment = MemoryPredicate;

    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn like(&self, param: &BaseSearchParam) -> FilterResult<MemoryPredicate> {
        let pattern = like_pattern(param)?;
        let matcher = RegexBuilder::new(&like_to_regex(&pattern))
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| ValueError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;

        let field = param.name.clone();
        Ok(MemoryPredicate::new(move |scope| {
            scope
                .field(&field)
                .and_then(field_text)
                .is_some_and(|text| matcher.is_match(&text))
        }))
    }

    fn eq(&self, param: &BaseSearchParam) -> FilterResult<MemoryPredicate> {
        Ok(Self::compare(param, required_cast(param)?, EQUAL))
    }

    fn not_eq(&self, param: &BaseSearchParam) -> FilterResult<MemoryPredicate> {
        Ok(Self::compare(param, required_cast(param)?, NOT_EQUAL))
    }

    fn in_values(&self, param: &BaseSearchParam) -> FilterResult<MemoryPredicate> {
        self.membership(param, false)
    }

    fn not_in(&self, param: &BaseSearchParam) -> FilterResult<MemoryPredicate> {
        self.membership(param, true)
    }

    fn is_null(&self, param: &BaseSearchParam) -> FilterResult<MemoryPredicate> {
        let field = param.name.clone();
        Ok(MemoryPredicate::new(move |scope| scope.field(&field).is_none()))
    }

    fn less_than(&self, param: &BaseSearchParam) -> FilterResult<MemoryPredicate> {
        self.range(param, LESS)
    }

    fn greater_than(&self, param: &BaseSearchParam) -> FilterResult<MemoryPredicate> {
        self.range(param, GREATER)
    }

    fn less_than_or_equals(&self, param: &BaseSearchParam) -> FilterResult<MemoryPredicate> {
        self.range(param, LESS_OR_EQUAL)
    }

    fn greater_than_or_equals(&self, param: &BaseSearchParam) -> FilterResult<MemoryPredicate> {
        self.range(param, GREATER_OR_EQUAL)
    }

    fn contains(&self, param: &BaseSearchParam) -> FilterResult<MemoryPredicate> {
        let tokens = contains_tokens(param)?;
        let field = param.name.clone();
        Ok(MemoryPredicate::new(move |scope| {
            let Some(text) = scope.field(&field).and_then(field_text) else {
                return tokens.is_empty();
            };
            let text = text.to_lowercase();
            tokens.iter().all(|token| text.contains(token.as_str()))
        }))
    }

    fn find_all(&self) -> MemoryPredicate {
        MemoryPredicate::always()
    }

    fn find_nothing(&self) -> MemoryPredicate {
        MemoryPredicate::never()
    }

    fn and(&self, fragments: Vec<MemoryPredicate>) -> MemoryPredicate {
        MemoryPredicate::new(move |scope| fragments.iter().all(|f| f.matches(scope)))
    }

    fn or(&self, fragments: Vec<MemoryPredicate>) -> MemoryPredicate {
        MemoryPredicate::new(move |scope| fragments.iter().any(|f| f.matches(scope)))
    }

    fn nested(
        &self,
        field: &str,
        operation: NestedOperation,
        subquery: MemoryPredicate,
    ) -> FilterResult<MemoryPredicate> {
        let field = field.to_string();
        let accepted = match operation {
            NestedOperation::Eq => EQUAL,
            NestedOperation::NotEq => NOT_EQUAL,
            NestedOperation::Lt => LESS,
            NestedOperation::Gt => GREATER,
            NestedOperation::Le => LESS_OR_EQUAL,
            NestedOperation::Ge => GREATER_OR_EQUAL,
            NestedOperation::In | NestedOperation::NotIn | NestedOperation::IsNull => EQUAL,
        };

        Ok(MemoryPredicate::new(move |scope| {
            let outer = scope.field(&field);
            if operation == NestedOperation::IsNull {
                return outer.is_none();
            }
            let Some(outer) = outer else {
                return false;
            };

            // The subquery only ever sees its own candidate row.
            let selected: Vec<_> = scope
                .collection
                .iter()
                .filter(|candidate| subquery.matches(&scope.with_row(candidate)))
                .filter_map(|candidate| candidate.get(&field).filter(|value| !value.is_null()))
                .collect();

            let member = || {
                selected
                    .iter()
                    .any(|value| compare_json(outer, value) == Some(Ordering::Equal))
            };

            match operation {
                NestedOperation::In => member(),
                NestedOperation::NotIn => !member(),
                _ => match selected.as_slice() {
                    [single] => compare_json(outer, single)
                        .is_some_and(|ordering| accepted.contains(&ordering)),
                    _ => false,
                },
            }
        }))
    }
}
