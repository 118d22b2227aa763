//! Query shape normalization
//!
//! Classifies every top-level filter field as an equality field or a range
//! field, in declaration order, and derives a canonical shape key:
//!
//! `EQ[<eq fields>]|RANGE[<range fields>]`
//!
//! The filter map is order-preserving (`serde_json` with `preserve_order`),
//! so two filters that declare the same fields in a different order produce
//! different shape keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{json_type_name, ShapeError, ShapeResult};
use crate::observability::{log_event_with_fields, Event};

/// Operators that make a field a range field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOperator {
    /// `$gt`
    GreaterThan,
    /// `$gte`
    GreaterOrEqual,
    /// `$lt`
    LessThan,
    /// `$lte`
    LessOrEqual,
    /// `$in`
    SetMembership,
    /// `$nin`
    SetExclusion,
    /// `$regex`
    PatternMatch,
}

impl RangeOperator {
    /// All recognized range operators
    pub const ALL: [RangeOperator; 7] = [
        RangeOperator::GreaterThan,
        RangeOperator::GreaterOrEqual,
        RangeOperator::LessThan,
        RangeOperator::LessOrEqual,
        RangeOperator::SetMembership,
        RangeOperator::SetExclusion,
        RangeOperator::PatternMatch,
    ];

    /// Returns the operator as it appears in a filter
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeOperator::GreaterThan => "$gt",
            RangeOperator::GreaterOrEqual => "$gte",
            RangeOperator::LessThan => "$lt",
            RangeOperator::LessOrEqual => "$lte",
            RangeOperator::SetMembership => "$in",
            RangeOperator::SetExclusion => "$nin",
            RangeOperator::PatternMatch => "$regex",
        }
    }

    /// Parses a filter operator, returning None for non-range operators
    pub fn parse(op: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.as_str() == op)
    }
}

/// Equality/range classification of a filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryShape {
    /// Canonical key, `EQ[..]|RANGE[..]`
    pub shape_key: String,
    /// Equality fields in declaration order
    pub eq_fields: Vec<String>,
    /// Range fields in declaration order
    pub range_fields: Vec<String>,
}

impl QueryShape {
    /// Returns true if the filter tested no fields at all
    pub fn is_empty(&self) -> bool {
        self.eq_fields.is_empty() && self.range_fields.is_empty()
    }
}

/// Normalizes a filter value into a query shape.
///
/// Fails only if `filter` is not a JSON object.
pub fn normalize_shape(filter: &Value) -> ShapeResult<QueryShape> {
    match filter {
        Value::Object(fields) => Ok(normalize_filter(fields)),
        other => Err(ShapeError::NotAMapping {
            found: json_type_name(other),
        }),
    }
}

/// Normalizes a request that is either a bare filter or `{"filter": {...}}`
pub fn query_shape(request: &Value) -> ShapeResult<QueryShape> {
    match request.get("filter") {
        Some(filter) => normalize_shape(filter),
        None => normalize_shape(request),
    }
}

/// Normalizes an already-validated filter map
pub fn normalize_filter(filter: &Map<String, Value>) -> QueryShape {
    let mut eq_fields = Vec::new();
    let mut range_fields = Vec::new();

    for (field, condition) in filter {
        if is_range_condition(condition) {
            range_fields.push(field.clone());
        } else {
            eq_fields.push(field.clone());
        }
    }

    let shape_key = format!(
        "EQ[{}]|RANGE[{}]",
        eq_fields.join(","),
        range_fields.join(",")
    );

    log_event_with_fields(Event::ShapeNormalized, &[("shape_key", &shape_key)]);

    QueryShape {
        shape_key,
        eq_fields,
        range_fields,
    }
}

/// A condition is a range condition iff it is a sub-document using at least
/// one range operator. Scalars and operator documents such as `{"$eq": 1}`
/// are equality conditions.
fn is_range_condition(condition: &Value) -> bool {
    match condition {
        Value::Object(operators) => operators
            .keys()
            .any(|op| RangeOperator::parse(op).is_some()),
        _ => false,
    }
}
