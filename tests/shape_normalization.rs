//! Query Shape Tests
//!
//! Tests for shape classification:
//! - Range operators mark a field as range, anything else is equality
//! - Declaration order is preserved in both lists and the shape key
//! - Only non-mapping input is rejected

use docscope::shape::{normalize_shape, query_shape, RangeOperator};
use serde_json::json;

// =============================================================================
// Classification Tests
// =============================================================================

/// Scalar fields are equality fields.
#[test]
fn test_scalar_fields_are_equality() {
    let shape = normalize_shape(&json!({"status": "A", "qty": 3})).unwrap();

    assert_eq!(shape.eq_fields, vec!["status", "qty"]);
    assert!(shape.range_fields.is_empty());
    assert_eq!(shape.shape_key, "EQ[status,qty]|RANGE[]");
}

/// A single range operator makes the field a range field.
#[test]
fn test_greater_or_equal_is_range() {
    let shape = normalize_shape(&json!({"age": {"$gte": 18}})).unwrap();
    assert_eq!(shape.shape_key, "EQ[]|RANGE[age]");
}

/// Every recognized range operator classifies as range.
#[test]
fn test_every_range_operator() {
    for op in RangeOperator::ALL {
        let mut condition = serde_json::Map::new();
        condition.insert(op.as_str().to_string(), json!(1));
        let mut filter = serde_json::Map::new();
        filter.insert("f".to_string(), serde_json::Value::Object(condition));

        let shape = normalize_shape(&serde_json::Value::Object(filter)).unwrap();
        assert_eq!(shape.range_fields, vec!["f"], "operator {}", op.as_str());
    }
}

/// Operator documents without range operators are equality.
#[test]
fn test_equality_operator_document() {
    let shape = normalize_shape(&json!({"a": {"$eq": 1}, "b": {"$ne": 2, "$exists": true}})).unwrap();
    assert_eq!(shape.shape_key, "EQ[a,b]|RANGE[]");
}

/// Mixed filters keep declaration order within each list.
#[test]
fn test_mixed_order_preserved() {
    let shape = normalize_shape(&json!({
        "z": {"$in": [1, 2]},
        "a": 1,
        "m": {"$regex": "^x"},
        "b": {"$eq": 3}
    }))
    .unwrap();

    assert_eq!(shape.shape_key, "EQ[a,b]|RANGE[z,m]");
}

// =============================================================================
// Input Contract Tests
// =============================================================================

/// Empty filter has an empty shape.
#[test]
fn test_empty_filter() {
    let shape = normalize_shape(&json!({})).unwrap();
    assert!(shape.is_empty());
    assert_eq!(shape.shape_key, "EQ[]|RANGE[]");
}

/// Non-mapping filters fail validation.
#[test]
fn test_non_mapping_rejected() {
    for filter in [json!([1]), json!("a"), json!(null), json!(3)] {
        let err = normalize_shape(&filter).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.code(), "DOCSCOPE_SHAPE_INVALID");
    }
}

/// Input is not modified.
#[test]
fn test_filter_not_mutated() {
    let filter = json!({"a": {"$lt": 5}, "b": 1});
    let before = filter.clone();
    let _ = normalize_shape(&filter).unwrap();
    assert_eq!(filter, before);
}

// =============================================================================
// Request Wrapper Tests
// =============================================================================

/// `{"filter": ...}` requests are unwrapped.
#[test]
fn test_filter_wrapper() {
    let wrapped = query_shape(&json!({"filter": {"a": 1, "b": {"$lte": 2}}})).unwrap();
    let bare = query_shape(&json!({"a": 1, "b": {"$lte": 2}})).unwrap();
    assert_eq!(wrapped, bare);
}

/// Same structure with different values yields the same shape.
#[test]
fn test_values_do_not_affect_shape() {
    let a = normalize_shape(&json!({"user": "ann", "age": {"$gt": 20}})).unwrap();
    let b = normalize_shape(&json!({"user": "bob", "age": {"$gt": 65}})).unwrap();
    assert_eq!(a.shape_key, b.shape_key);
}
