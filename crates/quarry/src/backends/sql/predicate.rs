//! Declarative SQL predicate trees.
//!
//! A [`SqlPredicate`] names fields but no table alias. It is rendered lazily
//! against a [`RowBinding`]; subqueries open a fresh binding and render their
//! own filter against it, so an inner filter can never reference the outer
//! row.

// Variant fields are described by the SQL form in each variant's doc
#![allow(missing_docs)]

use crate::search::NestedOperation;

use super::fragment::{LIKE_ESCAPE, SqlFragment, SqlParam, quote_identifier};

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `=`
    Eq,
    /// `<>`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
}

impl Comparison {
    /// Returns the SQL operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::NotEq => "<>",
            Comparison::Lt => "<",
            Comparison::Gt => ">",
            Comparison::Le => "<=",
            Comparison::Ge => ">=",
        }
    }

    fn from_nested(operation: NestedOperation) -> Option<Self> {
        match operation {
            NestedOperation::Eq => Some(Comparison::Eq),
            NestedOperation::NotEq => Some(Comparison::NotEq),
            NestedOperation::Lt => Some(Comparison::Lt),
            NestedOperation::Gt => Some(Comparison::Gt),
            NestedOperation::Le => Some(Comparison::Le),
            NestedOperation::Ge => Some(Comparison::Ge),
            NestedOperation::In | NestedOperation::NotIn | NestedOperation::IsNull => None,
        }
    }
}

/// A boolean condition over one table row.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlPredicate {
    /// Matches every row.
    True,
    /// Matches no row.
    False,
    /// `field <op> value`
    Compare {
        field: String,
        comparison: Comparison,
        value: SqlParam,
    },
    /// `LOWER(field) LIKE pattern`; the pattern is already lowercase.
    ///
    /// When `escaped` is set the pattern escapes literal wildcards with `\`
    /// and the clause declares `ESCAPE '\'`.
    Like {
        field: String,
        pattern: String,
        escaped: bool,
    },
    /// `field [NOT] IN (values)`
    In {
        field: String,
        values: Vec<SqlParam>,
        negated: bool,
    },
    /// `field IS NULL`
    IsNull { field: String },
    /// Conjunction.
    And(Vec<SqlPredicate>),
    /// Disjunction.
    Or(Vec<SqlPredicate>),
    /// Compares `field` against `SELECT field FROM table WHERE filter`.
    Subquery {
        field: String,
        operation: NestedOperation,
        table: String,
        filter: Box<SqlPredicate>,
    },
}

/// A table bound to an alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowBinding {
    table: String,
    alias: String,
}

impl RowBinding {
    /// Binds `table` to `alias`.
    pub fn new(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
        }
    }

    /// The bound table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The alias.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Returns the qualified, quoted column reference.
    pub fn column(&self, field: &str) -> String {
        format!("{}.{}", self.alias, quote_identifier(field))
    }

    /// Returns the `FROM` item, e.g. `"employees" t0`.
    pub fn from_item(&self) -> String {
        format!("{} {}", quote_identifier(&self.table), self.alias)
    }
}

/// Alias prefix of generated bindings.
const ALIAS_PREFIX: &str = "t";

struct Renderer {
    fragment: SqlFragment,
    next_alias: usize,
}

impl Renderer {
    fn bind(&mut self, param: &SqlParam) -> String {
        self.fragment.add_param(param.clone())
    }

    fn open_binding(&mut self, table: &str) -> RowBinding {
        let binding = RowBinding::new(table, format!("{}{}", ALIAS_PREFIX, self.next_alias));
        self.next_alias += 1;
        binding
    }
}

impl SqlPredicate {
    /// Returns the root binding used by [`SqlPredicate::render`]: `table` as `t0`.
    pub fn root_binding(table: &str) -> RowBinding {
        RowBinding::new(table, format!("{}0", ALIAS_PREFIX))
    }

    /// Renders this predicate against `binding`.
    ///
    /// Subqueries are aliased `t1`, `t2`, ... in rendering order.
    pub fn render(&self, binding: &RowBinding) -> SqlFragment {
        let mut renderer = Renderer {
            fragment: SqlFragment::new(""),
            next_alias: 1,
        };
        let sql = self.write(binding, &mut renderer);
        SqlFragment::with_params(sql, renderer.fragment.params)
    }

    fn write(&self, binding: &RowBinding, out: &mut Renderer) -> String {
        match self {
            SqlPredicate::True => "1 = 1".to_string(),
            SqlPredicate::False => "1 = 0".to_string(),
            SqlPredicate::Compare {
                field,
                comparison,
                value,
            } => {
                let placeholder = out.bind(value);
                format!("{} {} {}", binding.column(field), comparison.as_sql(), placeholder)
            }
            SqlPredicate::Like {
                field,
                pattern,
                escaped,
            } => {
                let placeholder = out.bind(&SqlParam::string(pattern));
                let like = format!("LOWER({}) LIKE {}", binding.column(field), placeholder);
                if *escaped {
                    format!("{} ESCAPE '{}'", like, LIKE_ESCAPE)
                } else {
                    like
                }
            }
            SqlPredicate::In {
                field,
                values,
                negated,
            } => {
                if values.is_empty() {
                    return SqlPredicate::False.write(binding, out);
                }
                let placeholders: Vec<String> = values.iter().map(|v| out.bind(v)).collect();
                let keyword = if *negated { "NOT IN" } else { "IN" };
                format!(
                    "{} {} ({})",
                    binding.column(field),
                    keyword,
                    placeholders.join(", ")
                )
            }
            SqlPredicate::IsNull { field } => format!("{} IS NULL", binding.column(field)),
            SqlPredicate::And(predicates) => {
                write_junction(predicates, " AND ", SqlPredicate::True, binding, out)
            }
            SqlPredicate::Or(predicates) => {
                write_junction(predicates, " OR ", SqlPredicate::False, binding, out)
            }
            SqlPredicate::Subquery {
                field,
                operation,
                table,
                filter,
            } => {
                let outer = binding.column(field);
                if *operation == NestedOperation::IsNull {
                    return format!("{} IS NULL", outer);
                }

                let inner = out.open_binding(table);
                let condition = filter.write(&inner, out);
                let select = format!(
                    "SELECT {} FROM {} WHERE {}",
                    inner.column(field),
                    inner.from_item(),
                    condition
                );

                match (operation, Comparison::from_nested(*operation)) {
                    (NestedOperation::In, _) => format!("{} IN ({})", outer, select),
                    (NestedOperation::NotIn, _) => format!("{} NOT IN ({})", outer, select),
                    (_, Some(comparison)) => {
                        format!("{} {} ({})", outer, comparison.as_sql(), select)
                    }
                    (_, None) => format!("{} IS NULL", outer),
                }
            }
        }
    }
}

fn write_junction(
    predicates: &[SqlPredicate],
    separator: &str,
    identity: SqlPredicate,
    binding: &RowBinding,
    out: &mut Renderer,
) -> String {
    match predicates {
        [] => identity.write(binding, out),
        [single] => single.write(binding, out),
        _ => predicates
            .iter()
            .map(|predicate| format!("({})", predicate.write(binding, out)))
            .collect::<Vec<_>>()
            .join(separator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(field: &str, value: i64) -> SqlPredicate {
        SqlPredicate::Compare {
            field: field.to_string(),
            comparison: Comparison::Eq,
            value: SqlParam::integer(value),
        }
    }

    #[test]
    fn test_render_junction_numbers_params_in_order() {
        let predicate = SqlPredicate::And(vec![
            eq("a", 1),
            SqlPredicate::Or(vec![eq("b", 2), eq("c", 3)]),
        ]);
        let fragment = predicate.render(&SqlPredicate::root_binding("items"));

        assert_eq!(
            fragment.sql,
            r#"(t0."a" = ?1) AND ((t0."b" = ?2) OR (t0."c" = ?3))"#
        );
        assert_eq!(
            fragment.params,
            vec![SqlParam::integer(1), SqlParam::integer(2), SqlParam::integer(3)]
        );
    }

    #[test]
    fn test_render_empty_in_matches_nothing() {
        let predicate = SqlPredicate::In {
            field: "id".to_string(),
            values: vec![],
            negated: true,
        };
        assert_eq!(predicate.render(&SqlPredicate::root_binding("items")).sql, "1 = 0");
    }

    #[test]
    fn test_render_subquery_uses_inner_binding() {
        let predicate = SqlPredicate::And(vec![
            eq("active", 1),
            SqlPredicate::Subquery {
                field: "departmentId".to_string(),
                operation: NestedOperation::In,
                table: "employees".to_string(),
                filter: Box::new(eq("level", 3)),
            },
        ]);
        let fragment = predicate.render(&SqlPredicate::root_binding("employees"));

        assert_eq!(
            fragment.sql,
            r#"(t0."active" = ?1) AND (t0."departmentId" IN (SELECT t1."departmentId" FROM "employees" t1 WHERE t1."level" = ?2))"#
        );
    }

    #[test]
    fn test_render_nested_subqueries_get_distinct_aliases() {
        let inner = SqlPredicate::Subquery {
            field: "managerId".to_string(),
            operation: NestedOperation::Eq,
            table: "employees".to_string(),
            filter: Box::new(eq("level", 5)),
        };
        let predicate = SqlPredicate::Subquery {
            field: "departmentId".to_string(),
            operation: NestedOperation::NotIn,
            table: "employees".to_string(),
            filter: Box::new(inner),
        };
        let sql = predicate.render(&SqlPredicate::root_binding("employees")).sql;

        assert!(sql.starts_with(r#"t0."departmentId" NOT IN (SELECT t1."departmentId""#));
        assert!(sql.contains(r#"WHERE t1."managerId" = (SELECT t2."managerId" FROM "employees" t2 WHERE t2."level" = ?1)"#));
    }

    #[test]
    fn test_render_nested_is_null_ignores_subquery() {
        let predicate = SqlPredicate::Subquery {
            field: "managerId".to_string(),
            operation: NestedOperation::IsNull,
            table: "employees".to_string(),
            filter: Box::new(eq("level", 5)),
        };
        let fragment = predicate.render(&SqlPredicate::root_binding("employees"));
        assert_eq!(fragment.sql, r#"t0."managerId" IS NULL"#);
        assert!(fragment.params.is_empty());
    }
}
