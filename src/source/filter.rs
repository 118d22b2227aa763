//! Filter evaluation for in-memory sources
//!
//! Supports scalar equality and the `$eq`, `$ne`, `$gt`, `$gte`, `$lt`,
//! `$lte`, `$in` and `$nin` operators on dotted field paths. All conditions
//! are combined with AND. No type coercion: `"123"` never equals `123`.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::errors::{SourceError, SourceResult};

/// Resolves a dotted path (`"address.city"`) against a document
pub fn lookup_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.get(segment))
}

/// Evaluates filters against documents
pub struct FilterMatcher;

impl FilterMatcher {
    /// Checks if a document matches every condition in `filter`
    pub fn matches(document: &Value, filter: &Map<String, Value>) -> SourceResult<bool> {
        for (path, condition) in filter {
            if path.starts_with('$') {
                return Err(SourceError::UnsupportedOperator(path.clone()));
            }
            if !Self::matches_condition(lookup_path(document, path), condition)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn matches_condition(actual: Option<&Value>, condition: &Value) -> SourceResult<bool> {
        match condition {
            Value::Object(operators) if is_operator_document(operators) => {
                for (op, operand) in operators {
                    if !Self::apply_operator(actual, op, operand)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            expected => Ok(actual == Some(expected)),
        }
    }

    fn apply_operator(actual: Option<&Value>, op: &str, operand: &Value) -> SourceResult<bool> {
        let matched = match op {
            "$eq" => actual == Some(operand),
            "$ne" => actual != Some(operand),
            "$gt" => compare(actual, operand) == Some(Ordering::Greater),
            "$gte" => matches!(
                compare(actual, operand),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            "$lt" => compare(actual, operand) == Some(Ordering::Less),
            "$lte" => matches!(
                compare(actual, operand),
                Some(Ordering::Less | Ordering::Equal)
            ),
            "$in" => set_operand(op, operand)?.iter().any(|v| actual == Some(v)),
            "$nin" => !set_operand(op, operand)?.iter().any(|v| actual == Some(v)),
            other => return Err(SourceError::UnsupportedOperator(other.to_string())),
        };
        Ok(matched)
    }
}

fn is_operator_document(operators: &Map<String, Value>) -> bool {
    !operators.is_empty() && operators.keys().all(|k| k.starts_with('$'))
}

fn set_operand<'a>(op: &str, operand: &'a Value) -> SourceResult<&'a Vec<Value>> {
    operand
        .as_array()
        .ok_or_else(|| SourceError::InvalidFilter(format!("{} requires an array", op)))
}

/// Orders numbers against numbers and strings against strings; anything
/// else, including a missing or null field, is incomparable.
fn compare(actual: Option<&Value>, bound: &Value) -> Option<Ordering> {
    match (actual?, bound) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
                return Some(ai.cmp(&bi));
            }
            a.as_f64()?.partial_cmp(&b.as_f64()?)
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
