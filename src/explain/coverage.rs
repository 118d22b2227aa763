//! Index coverage check
//!
//! A query is covered when every projected field can be served from the
//! key pattern of the index stage feeding the winning plan.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::plan::PlanNode;

/// Returns the field names a projection asks for.
///
/// Fields with a truthy flag are included. The identity field is included
/// unless the projection explicitly excludes it with a falsy flag.
pub fn projected_fields<'a>(
    projection: &'a Map<String, Value>,
    identity_field: &'a str,
) -> BTreeSet<&'a str> {
    let mut fields: BTreeSet<&str> = projection
        .iter()
        .filter(|(_, flag)| is_truthy(flag))
        .map(|(field, _)| field.as_str())
        .collect();

    let identity_excluded = projection
        .get(identity_field)
        .is_some_and(|flag| !is_truthy(flag));
    if !identity_excluded {
        fields.insert(identity_field);
    }

    fields
}

/// Checks whether `projection` is covered by the key pattern of the winning
/// plan's `inputStage`. Absent or empty projections are never covered.
pub fn is_covered(
    projection: Option<&Map<String, Value>>,
    winning_plan: PlanNode<'_>,
    identity_field: &str,
) -> bool {
    let Some(projection) = projection.filter(|p| !p.is_empty()) else {
        return false;
    };
    let Some(key_pattern) = winning_plan.input_stage().and_then(|child| child.key_pattern())
    else {
        return false;
    };

    projected_fields(projection, identity_field)
        .iter()
        .all(|field| key_pattern.contains_key(*field))
}

/// Truthiness of a projection flag: false, 0, "", null, [] and {} are falsy
fn is_truthy(flag: &Value) -> bool {
    match flag {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}
