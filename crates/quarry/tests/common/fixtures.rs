//! Test fixtures for predicate building.
//!
//! An employee table small enough to check results by hand, plus builders for
//! request shells.

use serde_json::{Value, json};

use quarry::types::{
    BaseSearchParam, CommonOperationShell, ComplexSearchParam, GlueOperation, PageAttribute,
};

/// Sortable employee fields.
pub const EMPLOYEE_SORT_FIELDS: &[&str] = &["id", "name", "age", "createdAt"];

/// Employee rows.
///
/// | id | name   | status   | age | departmentId | managerId | level |
/// |----|--------|----------|-----|--------------|-----------|-------|
/// | 1  | Alice  | active   | 52  | 10           | -         | 5     |
/// | 2  | Bob    | active   | 34  | 10           | 1         | 3     |
/// | 3  | Carol  | inactive | 41  | 20           | 1         | 4     |
/// | 4  | Dave   | active   | 28  | 20           | 3         | 2     |
/// | 5  | Erin   | active   | 45  | 30           | 1         | 4     |
/// | 6  | Frank  | pending  | 23  | 30           | 5         | 1     |
pub fn employees() -> Vec<Value> {
    vec![
        employee(1, "Alice", "active", 52, 10, None, 5, "2024-01-05T09:00:00Z"),
        employee(2, "Bob", "active", 34, 10, Some(1), 3, "2024-02-11T09:00:00Z"),
        employee(3, "Carol", "inactive", 41, 20, Some(1), 4, "2024-03-17T09:00:00Z"),
        employee(4, "Dave", "active", 28, 20, Some(3), 2, "2024-04-23T09:00:00Z"),
        employee(5, "Erin", "active", 45, 30, Some(1), 4, "2024-05-29T09:00:00Z"),
        employee(6, "Frank", "pending", 23, 30, Some(5), 1, "2024-06-30T09:00:00Z"),
    ]
}

#[allow(clippy::too_many_arguments)]
fn employee(
    id: i64,
    name: &str,
    status: &str,
    age: i64,
    department_id: i64,
    manager_id: Option<i64>,
    level: i64,
    created_at: &str,
) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": status,
        "age": age,
        "departmentId": department_id,
        "managerId": manager_id,
        "level": level,
        "createdAt": created_at,
    })
}

/// Extracts the `id` of each row.
pub fn ids(rows: &[&Value]) -> Vec<i64> {
    rows.iter().filter_map(|row| row["id"].as_i64()).collect()
}

/// A flat shell joined by AND.
pub fn and_shell(params: Vec<BaseSearchParam>) -> CommonOperationShell {
    CommonOperationShell::new(params, GlueOperation::And)
}

/// A page attribute with every field set.
pub fn page(offset: u64, limit: u32, sort_by: &str) -> PageAttribute {
    PageAttribute::new(Some(offset), Some(limit), Some(sort_by))
}

/// A nested parameter whose value is a filter group.
pub fn nested(field: &str, code: &str, group: ComplexSearchParam) -> BaseSearchParam {
    BaseSearchParam::new(field, format!("nst:{}", code), group)
}
