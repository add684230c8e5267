//! Sort specification and page resolution.
//!
//! A sort specification is a comma-delimited list of field names, each
//! optionally prefixed with `-` for descending order: `"-id,name,-hello"`.
//! Whitespace anywhere in the specification is ignored.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::{DEFAULT_LIMIT, DEFAULT_OFFSET};
use crate::error::SortError;
use crate::types::{PageRequest, SortOrder};

/// Prefix marking a descending sort key.
pub const DESCENDING_PREFIX: char = '-';

static SORT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[A-Za-z]+$").expect("sort token pattern is valid"));

/// Parses a sort specification against an allow-list of sortable fields.
///
/// Every token is checked against the name pattern before any field is looked
/// up, so a malformed specification is reported as a whole.
///
/// # Errors
///
/// - [`SortError::InvalidTokens`] if any token is not an optionally
///   `-`-prefixed run of letters; the error lists every token.
/// - [`SortError::UnknownField`] if a field is not in `allow_list`.
pub fn resolve_sort<S: AsRef<str>>(
    allow_list: &[S],
    sort_spec: Option<&str>,
) -> Result<Vec<SortOrder>, SortError> {
    let spec: String = sort_spec
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if spec.is_empty() {
        return Ok(Vec::new());
    }

    let tokens: Vec<&str> = spec.split(',').collect();
    if !tokens.iter().all(|token| SORT_TOKEN.is_match(token)) {
        return Err(SortError::InvalidTokens {
            tokens: tokens.iter().map(|token| token.to_string()).collect(),
        });
    }

    tokens
        .into_iter()
        .map(|token| {
            let (field, descending) = match token.strip_prefix(DESCENDING_PREFIX) {
                Some(field) => (field, true),
                None => (token, false),
            };

            if !allow_list.iter().any(|allowed| allowed.as_ref() == field) {
                return Err(SortError::UnknownField {
                    field: field.to_string(),
                });
            }

            Ok(if descending {
                SortOrder::desc(field)
            } else {
                SortOrder::asc(field)
            })
        })
        .collect()
}

/// Resolves a page descriptor.
///
/// A missing offset is 0 and a missing limit is 200. The offset is carried
/// through literally as the number of rows to skip.
///
/// # Errors
///
/// Returns the errors of [`resolve_sort`].
pub fn resolve_page<S: AsRef<str>>(
    allow_list: &[S],
    offset: Option<u64>,
    limit: Option<u32>,
    sort_spec: Option<&str>,
) -> Result<PageRequest, SortError> {
    let orders = resolve_sort(allow_list, sort_spec)?;
    Ok(PageRequest::new(
        offset.unwrap_or(DEFAULT_OFFSET),
        limit.unwrap_or(DEFAULT_LIMIT),
        orders,
    ))
}
