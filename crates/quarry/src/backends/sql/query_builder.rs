//! SQL statement assembly.
//!
//! Wraps a rendered [`SqlPredicate`] into a `SELECT` with the `ORDER BY` and
//! `LIMIT`/`OFFSET` clauses of a [`PageRequest`].

use crate::types::PageRequest;

use super::fragment::SqlFragment;
use super::predicate::{RowBinding, SqlPredicate};

/// Builds `SELECT` statements over one table.
#[derive(Debug, Clone)]
pub struct SqlQueryBuilder {
    binding: RowBinding,
    columns: Vec<String>,
}

impl SqlQueryBuilder {
    /// Creates a builder selecting every column of `table`.
    pub fn new(table: impl AsRef<str>) -> Self {
        Self {
            binding: SqlPredicate::root_binding(table.as_ref()),
            columns: Vec::new(),
        }
    }

    /// Restricts the selected columns.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// The table queried.
    pub fn table(&self) -> &str {
        self.binding.table()
    }

    /// Builds a complete statement.
    pub fn build(&self, predicate: &SqlPredicate, page: &PageRequest) -> SqlFragment {
        let condition = self.build_where(predicate);

        let mut clauses = vec![
            format!(
                "SELECT {} FROM {}",
                self.build_select_list(),
                self.binding.from_item()
            ),
            format!("WHERE {}", condition.sql),
        ];
        let order_by = self.build_order_by(page);
        if !order_by.is_empty() {
            clauses.push(order_by);
        }
        clauses.push(self.build_limit(page));

        SqlFragment::with_params(clauses.join(" "), condition.params)
    }

    /// Renders the `WHERE` condition.
    pub fn build_where(&self, predicate: &SqlPredicate) -> SqlFragment {
        predicate.render(&self.binding)
    }

    /// Renders the `ORDER BY` clause, or an empty string when unsorted.
    pub fn build_order_by(&self, page: &PageRequest) -> String {
        if page.is_unsorted() {
            return String::new();
        }

        let clauses: Vec<String> = page
            .orders
            .iter()
            .map(|order| format!("{} {}", self.binding.column(&order.field), order.direction))
            .collect();

        format!("ORDER BY {}", clauses.join(", "))
    }

    /// Renders the `LIMIT`/`OFFSET` clause.
    pub fn build_limit(&self, page: &PageRequest) -> String {
        format!("LIMIT {} OFFSET {}", page.limit, page.offset)
    }

    fn build_select_list(&self) -> String {
        if self.columns.is_empty() {
            return format!("{}.*", self.binding.alias());
        }

        self.columns
            .iter()
            .map(|column| self.binding.column(column))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::sql::{Comparison, SqlParam};
    use crate::types::SortOrder;

    #[test]
    fn test_build_statement() {
        let predicate = SqlPredicate::Compare {
            field: "status".to_string(),
            comparison: Comparison::Eq,
            value: SqlParam::string("active"),
        };
        let page = PageRequest::new(10, 5, vec![SortOrder::desc("createdAt")]);

        let fragment = SqlQueryBuilder::new("orders").build(&predicate, &page);
        assert_eq!(
            fragment.sql,
            r#"SELECT t0.* FROM "orders" t0 WHERE t0."status" = ?1 ORDER BY t0."createdAt" DESC LIMIT 5 OFFSET 10"#
        );
        assert_eq!(fragment.params, vec![SqlParam::string("active")]);
    }

    #[test]
    fn test_build_unsorted_with_columns() {
        let builder = SqlQueryBuilder::new("orders").with_columns(["id", "total"]);
        let fragment = builder.build(&SqlPredicate::True, &PageRequest::new(0, 200, vec![]));
        assert_eq!(
            fragment.sql,
            r#"SELECT t0."id", t0."total" FROM "orders" t0 WHERE 1 = 1 LIMIT 200 OFFSET 0"#
        );
        assert!(fragment.params.is_empty());
        assert_eq!(builder.table(), "orders");
    }

    #[test]
    fn test_build_order_by_multiple() {
        let page = PageRequest::new(
            0,
            10,
            vec![SortOrder::asc("name"), SortOrder::desc("id")],
        );
        assert_eq!(
            SqlQueryBuilder::new("t").build_order_by(&page),
            r#"ORDER BY t0."name" ASC, t0."id" DESC"#
        );
    }
}
