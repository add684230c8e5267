//! The backend capability trait.

use crate::error::{FilterResult, OperationError, ValueError};
use crate::search::NestedOperation;
use crate::search::value_type::{self, TypedValue};
use crate::types::{BaseSearchParam, ParamValue};

/// Wildcard marker of `like` patterns.
pub const WILDCARD: char = '%';

/// Builds backend predicate fragments.
///
/// One implementation exists per storage technology. Each capability builds
/// a fragment for `param.name`, typing `param.value` through
/// [`cast`](crate::search::cast) or
/// [`collection_cast`](crate::search::collection_cast) as needed.
///
/// Fragments are opaque to the engine: it only combines them through
/// [`and`](Self::and) and [`or`](Self::or).
pub trait OperationProvider {
    /// The predicate fragment produced by this backend.
    type Fragment;

    /// Short backend name used in errors and logs.
    fn backend_name(&self) -> &'static str;

    /// Case-insensitive pattern match. A value without `%` matches as a substring.
    fn like(&self, param: &BaseSearchParam) -> FilterResult<Self::Fragment>;

    /// Equality against the cast value.
    fn eq(&self, param: &BaseSearchParam) -> FilterResult<Self::Fragment>;

    /// Inequality against the cast value.
    fn not_eq(&self, param: &BaseSearchParam) -> FilterResult<Self::Fragment>;

    /// Membership in the cast collection. An empty collection matches nothing.
    fn in_values(&self, param: &BaseSearchParam) -> FilterResult<Self::Fragment>;

    /// Non-membership in the cast collection. An empty collection matches nothing.
    fn not_in(&self, param: &BaseSearchParam) -> FilterResult<Self::Fragment>;

    /// Field is null. The value is ignored.
    fn is_null(&self, param: &BaseSearchParam) -> FilterResult<Self::Fragment>;

    /// Field is less than the value; an absent value matches everything.
    fn less_than(&self, param: &BaseSearchParam) -> FilterResult<Self::Fragment>;

    /// Field is greater than the value; an absent value matches everything.
    fn greater_than(&self, param: &BaseSearchParam) -> FilterResult<Self::Fragment>;

    /// Field is at most the value; an absent value matches everything.
    fn less_than_or_equals(&self, param: &BaseSearchParam) -> FilterResult<Self::Fragment>;

    /// Field is at least the value; an absent value matches everything.
    fn greater_than_or_equals(&self, param: &BaseSearchParam) -> FilterResult<Self::Fragment>;

    /// Field contains every comma-delimited token, case-insensitively.
    fn contains(&self, param: &BaseSearchParam) -> FilterResult<Self::Fragment>;

    /// A fragment matching every row.
    fn find_all(&self) -> Self::Fragment;

    /// A fragment matching no row.
    fn find_nothing(&self) -> Self::Fragment;

    /// Conjunction of two or more fragments, in order.
    fn and(&self, fragments: Vec<Self::Fragment>) -> Self::Fragment;

    /// Disjunction of two or more fragments, in order.
    fn or(&self, fragments: Vec<Self::Fragment>) -> Self::Fragment;

    /// Compares `field` of the outer row against a subquery.
    ///
    /// The subquery runs over the same entity, selects `field` and is
    /// filtered by `subquery`, which must be evaluated against the subquery's
    /// own rows only.
    ///
    /// Backends without subquery support keep the default, which fails with
    /// [`OperationError::NestedNotSupported`].
    fn nested(
        &self,
        field: &str,
        operation: NestedOperation,
        subquery: Self::Fragment,
    ) -> FilterResult<Self::Fragment> {
        let _ = (field, operation, subquery);
        Err(OperationError::NestedNotSupported {
            backend: self.backend_name().to_string(),
        }
        .into())
    }
}

/// Returns the parameter's value, failing when it has none.
pub fn required_value(param: &BaseSearchParam) -> Result<&ParamValue, ValueError> {
    param.value.as_ref().ok_or_else(|| ValueError::MissingValue {
        field: param.name.clone(),
    })
}

/// Casts the parameter's value, failing when it has none.
pub fn required_cast(param: &BaseSearchParam) -> Result<TypedValue, ValueError> {
    value_type::cast(required_value(param)?)
}

/// Casts the value of an ordering comparison.
///
/// An absent value yields `None`, which backends render as match-all.
pub fn comparison_value(param: &BaseSearchParam) -> Result<Option<TypedValue>, ValueError> {
    param.value.as_ref().map(value_type::cast).transpose()
}

/// Returns the lowercase `like` pattern of a parameter.
///
/// Values without a `%` are wrapped on both sides.
pub fn like_pattern(param: &BaseSearchParam) -> Result<String, ValueError> {
    let raw = required_value(param)?.to_raw_string();
    let pattern = if raw.contains(WILDCARD) {
        raw
    } else {
        format!("{WILDCARD}{raw}{WILDCARD}")
    };
    Ok(pattern.to_lowercase())
}

/// Returns the lowercase tokens of a `contains` parameter.
///
/// Tokens are trimmed; blank tokens are dropped.
pub fn contains_tokens(param: &BaseSearchParam) -> Result<Vec<String>, ValueError> {
    let raw = required_value(param)?.to_raw_string();
    Ok(raw
        .split(value_type::VALUE_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect())
}

/// Translates a `like` pattern into an anchored regular expression.
///
/// `%` matches any run of characters; everything else is literal.
pub fn like_to_regex(pattern: &str) -> String {
    let body: Vec<String> = pattern.split(WILDCARD).map(regex::escape).collect();
    format!("^{}$", body.join(".*"))
}
