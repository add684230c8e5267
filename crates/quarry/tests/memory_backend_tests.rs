//! In-memory backend integration tests.
//!
//! Requests are built through [`OperationService`] and executed against the
//! employee fixture, so each test checks the full path from wire model to
//! matched rows.

#![cfg(feature = "memory")]

mod common;

use serde_json::{Value, json};

use common::*;
use quarry::backends::memory::{MemoryOperationProvider, MemoryPredicate, MemoryQuery};
use quarry::error::{FilterError, OperationError, ValidationError, ValueError};
use quarry::types::{
    BaseSearchParam, ComplexSearchParam, GlueOperation, MultipleOperationShell, ParamValue,
};
use quarry::{
    EngineConfig, ManualOperation, ManualOperationProvider, ManualOperationRegistry,
    OperationService,
};

fn service() -> OperationService<MemoryOperationProvider> {
    OperationService::new(MemoryOperationProvider::new())
}

fn run(predicate: &MemoryPredicate) -> Vec<i64> {
    let rows = employees();
    ids(&MemoryQuery::new(&rows).filter(predicate))
}

// ============================================================================
// Request Shells
// ============================================================================

#[test]
fn test_common_shell_filters_sorts_and_pages() {
    let shell = and_shell(vec![BaseSearchParam::eq("status", "active")])
        .with_page(page(1, 2, "-createdAt"));

    let plan = service().build_common(&shell, EMPLOYEE_SORT_FIELDS).unwrap();
    assert_eq!(plan.page.offset, 1);
    assert_eq!(plan.page.limit, 2);

    let rows = employees();
    let result = MemoryQuery::new(&rows).execute(&plan.predicate, &plan.page);
    // Active employees by newest first are 5, 4, 2, 1.
    assert_eq!(ids(&result), vec![4, 2]);
}

#[test]
fn test_common_shell_from_json() {
    let shell = serde_json::from_value(json!({
        "baseSearchParams": [
            {"name": "age", "value": "30", "operation": "gt"},
            {"name": "status", "value": "active"},
            {"name": "limit", "value": 10, "operation": "limit"},
            {"name": "sortBy", "value": "age", "operation": "sortBy"}
        ],
        "glue": "AND"
    }))
    .unwrap();

    let plan = service().build_common(&shell, EMPLOYEE_SORT_FIELDS).unwrap();
    assert_eq!(plan.page.limit, 10);

    let rows = employees();
    let result = MemoryQuery::new(&rows).execute(&plan.predicate, &plan.page);
    assert_eq!(ids(&result), vec![2, 5, 1]);
}

#[test]
fn test_multiple_shell_joins_groups() {
    // (status = pending) OR (age >= 45 AND level = 4)
    let shell = MultipleOperationShell::new(
        vec![
            ComplexSearchParam::all(vec![BaseSearchParam::eq("status", "pending")]),
            ComplexSearchParam::all(vec![
                BaseSearchParam::new("age", "ge", 45i64),
                BaseSearchParam::eq("level", "4"),
            ]),
        ],
        GlueOperation::Or,
    );

    let plan = service().build_multiple(&shell, EMPLOYEE_SORT_FIELDS).unwrap();
    assert_eq!(plan.page.limit, 200);
    assert_eq!(run(&plan.predicate), vec![5, 6]);
}

#[test]
fn test_empty_request_matches_everything() {
    let plan = service()
        .build_common(&and_shell(vec![]), EMPLOYEE_SORT_FIELDS)
        .unwrap();
    assert_eq!(run(&plan.predicate), vec![1, 2, 3, 4, 5, 6]);

    let plan = service()
        .build_multiple(
            &MultipleOperationShell::new(vec![], GlueOperation::Or),
            EMPLOYEE_SORT_FIELDS,
        )
        .unwrap();
    assert_eq!(run(&plan.predicate), vec![1, 2, 3, 4, 5, 6]);
}

// ============================================================================
// Operations
// ============================================================================

#[test]
fn test_in_and_not_in_with_empty_values_match_nothing() {
    let service = service();

    let predicate = service
        .build_base_by_params(&[BaseSearchParam::new("id", "in", "")], GlueOperation::And)
        .unwrap();
    assert!(run(&predicate).is_empty());

    let predicate = service
        .build_base_by_params(&[BaseSearchParam::new("id", "notIn", " ")], GlueOperation::And)
        .unwrap();
    assert!(run(&predicate).is_empty());
}

#[test]
fn test_in_with_list() {
    let predicate = service()
        .build_base_by_params(
            &[BaseSearchParam::new("departmentId", "in", "10,30")],
            GlueOperation::And,
        )
        .unwrap();
    assert_eq!(run(&predicate), vec![1, 2, 5, 6]);
}

#[test]
fn test_like_and_contains() {
    let service = service();

    let predicate = service
        .build_base_by_params(&[BaseSearchParam::new("name", "like", "R")], GlueOperation::And)
        .unwrap();
    assert_eq!(run(&predicate), vec![3, 5, 6]);

    let predicate = service
        .build_base_by_params(
            &[BaseSearchParam::new("status", "contains", "act,IVE")],
            GlueOperation::And,
        )
        .unwrap();
    assert_eq!(run(&predicate), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_is_null_ignores_value() {
    let predicate = service()
        .build_base_by_params(
            &[BaseSearchParam::new("managerId", "isNull", "whatever")],
            GlueOperation::And,
        )
        .unwrap();
    assert_eq!(run(&predicate), vec![1]);
}

#[test]
fn test_range_without_value_matches_everything() {
    let predicate = service()
        .build_base_by_params(
            &[BaseSearchParam::without_value("age", "lt")],
            GlueOperation::And,
        )
        .unwrap();
    assert_eq!(run(&predicate).len(), 6);
}

#[test]
fn test_instant_comparison_against_text_field() {
    let predicate = service()
        .build_base_by_params(
            &[BaseSearchParam::new("createdAt", "lt", "2024-03-01T00:00:00Z")],
            GlueOperation::And,
        )
        .unwrap();
    assert_eq!(run(&predicate), vec![1, 2]);
}

#[test]
fn test_eq_without_value_fails() {
    let err = service()
        .build_base_by_params(&[BaseSearchParam::without_value("age", "eq")], GlueOperation::And)
        .unwrap_err();
    assert!(matches!(err, FilterError::Value(ValueError::MissingValue { .. })));
}

#[test]
fn test_unknown_operation_fails() {
    let err = service()
        .build_base_by_params(&[BaseSearchParam::new("age", "between", "1")], GlueOperation::And)
        .unwrap_err();
    assert!(matches!(
        err,
        FilterError::Operation(OperationError::UnknownOperation { ref code }) if code == "between"
    ));
}

// ============================================================================
// Nested Operations
// ============================================================================

#[test]
fn test_nested_in_selects_same_field() {
    // Employees in the department of somebody at level 5.
    let params = vec![
        BaseSearchParam::eq("status", "active"),
        nested(
            "departmentId",
            "in",
            ComplexSearchParam::all(vec![BaseSearchParam::eq("level", "5")]),
        ),
    ];
    let predicate = service()
        .build_base_by_params(&params, GlueOperation::And)
        .unwrap();
    assert_eq!(run(&predicate), vec![1, 2]);
}

#[test]
fn test_nested_scalar_comparison() {
    // Older than Erin.
    let params = vec![nested(
        "age",
        "gt",
        ComplexSearchParam::all(vec![BaseSearchParam::eq("name", "Erin")]),
    )];
    let predicate = service()
        .build_base_by_params(&params, GlueOperation::And)
        .unwrap();
    assert_eq!(run(&predicate), vec![1]);
}

#[test]
fn test_nested_within_nested() {
    // Employees sharing a manager with somebody in Frank's department.
    let frank = ComplexSearchParam::all(vec![BaseSearchParam::eq("name", "Frank")]);
    let same_department = ComplexSearchParam::all(vec![nested("departmentId", "in", frank)]);
    let params = vec![nested("managerId", "in", same_department)];

    let predicate = service()
        .build_base_by_params(&params, GlueOperation::And)
        .unwrap();
    assert_eq!(run(&predicate), vec![2, 3, 5, 6]);
}

#[test]
fn test_nested_from_json_value() {
    let shell = serde_json::from_value(json!({
        "baseSearchParams": [{
            "name": "departmentId",
            "operation": "nst:notIn",
            "value": {
                "baseSearchParams": [{"name": "status", "value": "inactive"}],
                "internalGlue": "AND"
            }
        }]
    }))
    .unwrap();

    let plan = service().build_common(&shell, EMPLOYEE_SORT_FIELDS).unwrap();
    assert_eq!(run(&plan.predicate), vec![1, 2, 5, 6]);
}

#[test]
fn test_nested_depth_limit() {
    let frank = ComplexSearchParam::all(vec![BaseSearchParam::eq("name", "Frank")]);
    let same_department = ComplexSearchParam::all(vec![nested("departmentId", "in", frank)]);
    let params = vec![nested("managerId", "in", same_department)];

    let service = service().with_config(EngineConfig::default().with_max_nesting_depth(1));
    let err = service
        .build_base_by_params(&params, GlueOperation::And)
        .unwrap_err();
    assert!(matches!(
        err,
        FilterError::Operation(OperationError::NestingTooDeep { depth: 2, max: 1 })
    ));
}

#[test]
fn test_nested_unsupported_operation() {
    for code in ["like", "contains"] {
        let params = vec![nested("name", code, ComplexSearchParam::default())];
        let err = service()
            .build_base_by_params(&params, GlueOperation::And)
            .unwrap_err();
        assert!(matches!(
            err,
            FilterError::Operation(OperationError::UnsupportedNestedOperation { code: ref found })
                if found == code
        ));
    }
}

#[test]
fn test_nested_rejects_scalar_value() {
    let params = vec![BaseSearchParam::new("departmentId", "nst:in", "10")];
    let err = service()
        .build_base_by_params(&params, GlueOperation::And)
        .unwrap_err();
    assert!(matches!(
        err,
        FilterError::Validation(ValidationError::MalformedNestedValue { .. })
    ));
}

#[test]
fn test_custom_nested_marker() {
    let params = vec![BaseSearchParam::new(
        "departmentId",
        "sub.in",
        ComplexSearchParam::all(vec![BaseSearchParam::eq("level", "5")]),
    )];
    let service = service().with_config(EngineConfig::default().with_nested_marker("sub."));
    let predicate = service
        .build_base_by_params(&params, GlueOperation::And)
        .unwrap();
    assert_eq!(run(&predicate), vec![1, 2]);
}

// ============================================================================
// Manual Operations
// ============================================================================

fn team_registry() -> ManualOperationRegistry<MemoryPredicate> {
    let team = ManualOperation::new("team", |param: &BaseSearchParam| {
        let departments: Vec<i64> = match param.value.as_ref().map(ParamValue::to_raw_string) {
            Some(team) if team == "alpha" => vec![10, 20],
            _ => vec![30],
        };
        Ok(MemoryPredicate::new(move |scope| {
            scope
                .field("departmentId")
                .and_then(Value::as_i64)
                .is_some_and(|department| departments.contains(&department))
        }))
    });
    let providers: Vec<Box<dyn ManualOperationProvider<MemoryPredicate>>> = vec![Box::new(team)];
    ManualOperationRegistry::new(providers).unwrap()
}

#[test]
fn test_manual_operation_replaces_generic_pipeline() {
    let service = service().with_manual_operations(team_registry());

    let params = vec![
        BaseSearchParam::eq("team", "alpha"),
        BaseSearchParam::new("age", "lt", 40i64),
    ];
    let predicate = service
        .build_base_by_params(&params, GlueOperation::And)
        .unwrap();
    assert_eq!(run(&predicate), vec![2, 4]);
}

#[test]
fn test_manual_operation_ignores_operation_code() {
    let service = service().with_manual_operations(team_registry());

    // Without the override this code would need a nested filter group.
    let params = vec![BaseSearchParam::new("team", "nst:in", "beta")];
    let predicate = service
        .build_base_by_params(&params, GlueOperation::And)
        .unwrap();
    assert_eq!(run(&predicate), vec![5, 6]);
}

#[test]
fn test_manual_operation_does_not_capture_paging() {
    let limit = ManualOperation::new("limit", |_: &BaseSearchParam| Ok(MemoryPredicate::never()));
    let providers: Vec<Box<dyn ManualOperationProvider<MemoryPredicate>>> = vec![Box::new(limit)];
    let service =
        service().with_manual_operations(ManualOperationRegistry::new(providers).unwrap());

    let shell = and_shell(vec![BaseSearchParam::new("limit", "limit", 3i64)]);
    let plan = service.build_common(&shell, EMPLOYEE_SORT_FIELDS).unwrap();
    assert_eq!(plan.page.limit, 3);
    assert_eq!(run(&plan.predicate).len(), 6);
}
