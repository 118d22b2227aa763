//! Hash index over right-side documents

use std::collections::HashMap;

use serde_json::{Map, Number, Value};

/// Hashable form of a join value.
///
/// Numbers are canonicalized so `5` and `5.0` meet in the same bucket;
/// every other value is keyed by its JSON text, which keeps `"5"` and `5`
/// apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinKey(String);

impl JoinKey {
    /// Builds a key. Null never joins and yields None.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(n) => Some(JoinKey(canonical_number(n))),
            other => Some(JoinKey(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn canonical_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

/// Right-side documents bucketed by foreign-field value. Built fresh for
/// every join; buckets keep right-sequence order.
#[derive(Debug, Default)]
pub struct JoinIndex<'a> {
    buckets: HashMap<JoinKey, Vec<&'a Map<String, Value>>>,
    indexed: usize,
}

impl<'a> JoinIndex<'a> {
    /// Indexes `right` on the top-level `foreign_field` (no dotted lookup).
    /// Documents lacking the field, or holding null there, are left out.
    pub fn build(right: &'a [Value], foreign_field: &str) -> Self {
        let mut index = JoinIndex::default();

        for document in right.iter().filter_map(Value::as_object) {
            let Some(key) = document.get(foreign_field).and_then(JoinKey::from_value) else {
                continue;
            };
            index.buckets.entry(key).or_default().push(document);
            index.indexed += 1;
        }

        index
    }

    /// Returns the matching right documents, in right-sequence order
    pub fn lookup(&self, value: &Value) -> Option<&[&'a Map<String, Value>]> {
        let key = JoinKey::from_value(value)?;
        self.buckets.get(&key).map(Vec::as_slice)
    }

    /// Number of distinct join keys
    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of right documents that made it into the index
    pub fn indexed_documents(&self) -> usize {
        self.indexed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_canonicalized() {
        assert_eq!(JoinKey::from_value(&json!(5)), JoinKey::from_value(&json!(5.0)));
        assert_ne!(JoinKey::from_value(&json!(5)), JoinKey::from_value(&json!("5")));
        assert_ne!(JoinKey::from_value(&json!(5.5)), JoinKey::from_value(&json!(5)));
        assert_eq!(JoinKey::from_value(&json!(null)), None);
    }

    #[test]
    fn test_build_skips_documents_without_key() {
        let right = vec![
            json!({"uid": 7, "name": "A"}),
            json!({"name": "no key"}),
            json!({"uid": null}),
            json!("not a document"),
            json!({"uid": 7, "name": "B"}),
            json!({"uid": 8, "name": "C"}),
        ];

        let index = JoinIndex::build(&right, "uid");
        assert_eq!(index.indexed_documents(), 3);
        assert_eq!(index.key_count(), 2);

        let names: Vec<_> = index
            .lookup(&json!(7))
            .unwrap()
            .iter()
            .map(|doc| doc["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("A"), json!("B")]);
        assert!(index.lookup(&json!(9)).is_none());
        assert!(index.lookup(&json!(null)).is_none());
    }

    #[test]
    fn test_foreign_field_is_not_dotted() {
        let right = vec![json!({"a": {"b": 1}}), json!({"a.b": 2})];
        let index = JoinIndex::build(&right, "a.b");
        assert_eq!(index.indexed_documents(), 1);
        assert!(index.lookup(&json!(2)).is_some());
    }

    #[test]
    fn test_structured_keys() {
        let right = vec![json!({"k": {"x": 1}, "v": 1})];
        let index = JoinIndex::build(&right, "k");
        assert!(index.lookup(&json!({"x": 1})).is_some());
    }
}
