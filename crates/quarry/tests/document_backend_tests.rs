//! Document backend integration tests.

#![cfg(feature = "document")]

mod common;

use serde_json::json;

use common::*;
use quarry::backends::document::{DocumentOperationProvider, DocumentQueryBuilder};
use quarry::error::{FilterError, OperationError};
use quarry::types::{BaseSearchParam, ComplexSearchParam, GlueOperation, MultipleOperationShell};
use quarry::OperationService;

fn service() -> OperationService<DocumentOperationProvider> {
    OperationService::new(DocumentOperationProvider::new())
}

#[test]
fn test_query_from_common_shell() {
    let shell = and_shell(vec![
        BaseSearchParam::eq("status", "active"),
        BaseSearchParam::new("age", "ge", "30"),
    ])
    .with_page(page(10, 5, "-createdAt,name"));

    let plan = service().build_common(&shell, EMPLOYEE_SORT_FIELDS).unwrap();
    let query = DocumentQueryBuilder::new().build(plan.predicate, &plan.page);

    assert_eq!(
        query.to_json(),
        json!({
            "filter": {"$and": [
                {"status": {"$eq": "active"}},
                {"age": {"$gte": 30}}
            ]},
            "sort": {"createdAt": -1, "name": 1},
            "skip": 10,
            "limit": 5
        })
    );
}

#[test]
fn test_query_from_multiple_shell() {
    let shell = MultipleOperationShell::new(
        vec![
            ComplexSearchParam::any(vec![
                BaseSearchParam::new("level", "in", "1,2"),
                BaseSearchParam::without_value("managerId", "isNull"),
            ]),
            ComplexSearchParam::all(vec![BaseSearchParam::new("name", "like", "a%")]),
        ],
        GlueOperation::And,
    );

    let plan = service().build_multiple(&shell, EMPLOYEE_SORT_FIELDS).unwrap();
    assert_eq!(
        plan.predicate,
        json!({"$and": [
            {"$or": [
                {"level": {"$in": [1, 2]}},
                {"managerId": null}
            ]},
            {"name": {"$regex": "^a.*$", "$options": "i"}}
        ]})
    );
}

#[test]
fn test_empty_collections_and_values() {
    let service = service();

    let predicate = service
        .build_base_by_params(&[BaseSearchParam::new("id", "notIn", "")], GlueOperation::And)
        .unwrap();
    assert_eq!(predicate, json!({"$nor": [{}]}));

    let predicate = service
        .build_base_by_params(&[BaseSearchParam::without_value("age", "le")], GlueOperation::And)
        .unwrap();
    assert_eq!(predicate, json!({}));
}

#[test]
fn test_instant_values_use_date_wrapper() {
    let predicate = service()
        .build_base_by_params(
            &[BaseSearchParam::new("createdAt", "gt", "2024-03-01T00:00:00Z")],
            GlueOperation::And,
        )
        .unwrap();
    assert_eq!(
        predicate,
        json!({"createdAt": {"$gt": {"$date": "2024-03-01T00:00:00+00:00"}}})
    );
}

#[test]
fn test_nested_operations_are_rejected() {
    let params = vec![nested(
        "departmentId",
        "in",
        ComplexSearchParam::all(vec![BaseSearchParam::eq("level", "5")]),
    )];
    let err = service()
        .build_base_by_params(&params, GlueOperation::And)
        .unwrap_err();
    assert!(matches!(
        err,
        FilterError::Operation(OperationError::NestedNotSupported { ref backend }) if backend == "document"
    ));
}
