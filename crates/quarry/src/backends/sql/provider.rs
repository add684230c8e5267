//! [`OperationProvider`] producing [`SqlPredicate`] trees.

use crate::core::{
    OperationProvider, comparison_value, contains_tokens, like_pattern, required_cast,
};
use crate::error::FilterResult;
use crate::search::{NestedOperation, collection_cast};
use crate::types::BaseSearchParam;

use super::fragment::{SqlParam, escape_like};
use super::predicate::{Comparison, SqlPredicate};

/// Builds SQL predicates over one table.
///
/// The table is only needed for subqueries, which select from the same table
/// as the outer query.
#[derive(Debug, Clone)]
pub struct SqlOperationProvider {
    table: String,
}

impl SqlOperationProvider {
    /// Creates a provider for `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// The table queried.
    pub fn table(&self) -> &str {
        &self.table
    }

    fn compare(
        &self,
        param: &BaseSearchParam,
        comparison: Comparison,
    ) -> FilterResult<SqlPredicate> {
        Ok(SqlPredicate::Compare {
            field: param.name.clone(),
            comparison,
            value: SqlParam::from(required_cast(param)?),
        })
    }

    fn range(&self, param: &BaseSearchParam, comparison: Comparison) -> FilterResult<SqlPredicate> {
        Ok(match comparison_value(param)? {
            Some(value) => SqlPredicate::Compare {
                field: param.name.clone(),
                comparison,
                value: SqlParam::from(value),
            },
            None => self.find_all(),
        })
    }

    fn membership(&self, param: &BaseSearchParam, negated: bool) -> FilterResult<SqlPredicate> {
        let values = collection_cast(param.value.as_ref())?;
        if values.is_empty() {
            return Ok(self.find_nothing());
        }

        Ok(SqlPredicate::In {
            field: param.name.clone(),
            values: values.into_iter().map(SqlParam::from).collect(),
            negated,
        })
    }
}

impl OperationProvider for SqlOperationProvider {
    type Fragment = SqlPredicate;

    fn backend_name(&self) -> &'static str {
        "sql"
    }

    fn like(&self, param: &BaseSearchParam) -> FilterResult<SqlPredicate> {
        Ok(SqlPredicate::Like {
            field: param.name.clone(),
            pattern: like_pattern(param)?,
            escaped: false,
        })
    }

    fn eq(&self, param: &BaseSearchParam) -> FilterResult<SqlPredicate> {
        self.compare(param, Comparison::Eq)
    }

    fn not_eq(&self, param: &BaseSearchParam) -> FilterResult<SqlPredicate> {
        self.compare(param, Comparison::NotEq)
    }

    fn in_values(&self, param: &BaseSearchParam) -> FilterResult<SqlPredicate> {
        self.membership(param, false)
    }

    fn not_in(&self, param: &BaseSearchParam) -> FilterResult<SqlPredicate> {
        self.membership(param, true)
    }

    fn is_null(&self, param: &BaseSearchParam) -> FilterResult<SqlPredicate> {
        Ok(SqlPredicate::IsNull {
            field: param.name.clone(),
        })
    }

    fn less_than(&self, param: &BaseSearchParam) -> FilterResult<SqlPredicate> {
        self.range(param, Comparison::Lt)
    }

    fn greater_than(&self, param: &BaseSearchParam) -> FilterResult<SqlPredicate> {
        self.range(param, Comparison::Gt)
    }

    fn less_than_or_equals(&self, param: &BaseSearchParam) -> FilterResult<SqlPredicate> {
        self.range(param, Comparison::Le)
    }

    fn greater_than_or_equals(&self, param: &BaseSearchParam) -> FilterResult<SqlPredicate> {
        self.range(param, Comparison::Ge)
    }

    fn contains(&self, param: &BaseSearchParam) -> FilterResult<SqlPredicate> {
        let mut likes: Vec<SqlPredicate> = contains_tokens(param)?
            .into_iter()
            .map(|token| SqlPredicate::Like {
                field: param.name.clone(),
                pattern: format!("%{}%", escape_like(&token)),
                escaped: true,
            })
            .collect();

        Ok(match likes.len() {
            0 => self.find_all(),
            1 => likes.remove(0),
            _ => SqlPredicate::And(likes),
        })
    }

    fn find_all(&self) -> SqlPredicate {
        SqlPredicate::True
    }

    fn find_nothing(&self) -> SqlPredicate {
        SqlPredicate::False
    }

    fn and(&self, fragments: Vec<SqlPredicate>) -> SqlPredicate {
        SqlPredicate::And(fragments)
    }

    fn or(&self, fragments: Vec<SqlPredicate>) -> SqlPredicate {
        SqlPredicate::Or(fragments)
    }

    fn nested(
        &self,
        field: &str,
        operation: NestedOperation,
        subquery: SqlPredicate,
    ) -> FilterResult<SqlPredicate> {
        Ok(SqlPredicate::Subquery {
            field: field.to_string(),
            operation,
            table: self.table.clone(),
            filter: Box::new(subquery),
        })
    }
}
