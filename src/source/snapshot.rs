//! In-memory document source over captured data
//!
//! A snapshot file looks like:
//!
//! ```json
//! {"namespaces": {"shop.orders": {
//!     "explain": {"find": {...}, "count": {...}, "aggregate": {...}},
//!     "indexes": [...],
//!     "indexStats": [...],
//!     "collectionStats": {...},
//!     "documents": [...]
//! }}}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{SourceError, SourceResult};
use super::filter::FilterMatcher;
use super::request::{FetchRequest, Namespace, QueryRequest, QueryType};
use super::DocumentSource;

/// Captured data for one namespace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamespaceSnapshot {
    /// Explain output keyed by query type (`find`, `count`, `aggregate`)
    pub explain: BTreeMap<String, Value>,
    pub indexes: Vec<Value>,
    pub index_stats: Vec<Value>,
    pub collection_stats: Option<Value>,
    pub documents: Vec<Value>,
}

impl NamespaceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_explain(mut self, query_type: QueryType, explain: Value) -> Self {
        self.explain.insert(query_type.as_str().to_string(), explain);
        self
    }

    pub fn with_indexes(mut self, indexes: Vec<Value>) -> Self {
        self.indexes = indexes;
        self
    }

    pub fn with_index_stats(mut self, index_stats: Vec<Value>) -> Self {
        self.index_stats = index_stats;
        self
    }

    pub fn with_collection_stats(mut self, stats: Value) -> Self {
        self.collection_stats = Some(stats);
        self
    }

    pub fn with_documents(mut self, documents: Vec<Value>) -> Self {
        self.documents = documents;
        self
    }
}

/// A `DocumentSource` answering from captured snapshots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotSource {
    /// Snapshots keyed by `db.collection`
    pub namespaces: BTreeMap<String, NamespaceSnapshot>,
}

impl SnapshotSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a snapshot from JSON
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Adds or replaces the snapshot for a namespace
    pub fn with_namespace(mut self, namespace: &Namespace, snapshot: NamespaceSnapshot) -> Self {
        self.namespaces.insert(namespace.to_string(), snapshot);
        self
    }

    fn snapshot(&self, namespace: &Namespace) -> SourceResult<&NamespaceSnapshot> {
        self.namespaces
            .get(&namespace.to_string())
            .ok_or_else(|| SourceError::UnknownNamespace(namespace.to_string()))
    }
}

impl DocumentSource for SnapshotSource {
    fn explain(&self, namespace: &Namespace, request: &QueryRequest) -> SourceResult<Value> {
        let query_type = request.query_type();
        self.snapshot(namespace)?
            .explain
            .get(query_type.as_str())
            .cloned()
            .ok_or_else(|| SourceError::UnsupportedQuery {
                namespace: namespace.to_string(),
                query_type: query_type.as_str(),
            })
    }

    fn list_indexes(&self, namespace: &Namespace) -> SourceResult<Vec<Value>> {
        Ok(self.snapshot(namespace)?.indexes.clone())
    }

    fn index_stats(&self, namespace: &Namespace) -> SourceResult<Vec<Value>> {
        Ok(self.snapshot(namespace)?.index_stats.clone())
    }

    fn collection_stats(&self, namespace: &Namespace) -> SourceResult<Value> {
        self.snapshot(namespace)?
            .collection_stats
            .clone()
            .ok_or_else(|| {
                SourceError::Unavailable(format!("no collection stats captured for {}", namespace))
            })
    }

    fn fetch(&self, namespace: &Namespace, request: &FetchRequest) -> SourceResult<Vec<Value>> {
        let snapshot = self.snapshot(namespace)?;

        let mut matched = Vec::new();
        for document in &snapshot.documents {
            if FilterMatcher::matches(document, &request.filter)? {
                matched.push(document);
            }
        }

        Ok(matched
            .into_iter()
            .skip(usize::try_from(request.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(request.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn orders() -> Namespace {
        Namespace::new("shop", "orders")
    }

    fn source() -> SnapshotSource {
        SnapshotSource::new().with_namespace(
            &orders(),
            NamespaceSnapshot::new()
                .with_explain(QueryType::Find, json!({"queryPlanner": {}}))
                .with_indexes(vec![json!({"name": "_id_", "key": {"_id": 1}})])
                .with_documents(vec![
                    json!({"_id": 1, "status": "A"}),
                    json!({"_id": 2, "status": "B"}),
                    json!({"_id": 3, "status": "A"}),
                    json!({"_id": 4, "status": "A"}),
                ]),
        )
    }

    #[test]
    fn test_explain_by_query_type() {
        let source = source();
        assert!(source
            .explain(&orders(), &QueryRequest::find(Map::new()))
            .is_ok());

        let err = source
            .explain(&orders(), &QueryRequest::count(Map::new()))
            .unwrap_err();
        assert_eq!(err.code(), "DOCSCOPE_SOURCE_UNSUPPORTED_QUERY");
    }

    #[test]
    fn test_unknown_namespace() {
        let err = source()
            .list_indexes(&Namespace::new("shop", "missing"))
            .unwrap_err();
        assert_eq!(err, SourceError::UnknownNamespace("shop.missing".into()));
    }

    #[test]
    fn test_missing_collection_stats_unavailable() {
        let err = source().collection_stats(&orders()).unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }

    #[test]
    fn test_fetch_filters_then_skips_and_limits() {
        let filter = json!({"status": "A"}).as_object().cloned().unwrap();
        let docs = source()
            .fetch(&orders(), &FetchRequest::new(filter, 1, 1))
            .unwrap();
        assert_eq!(docs, vec![json!({"_id": 3, "status": "A"})]);
    }

    #[test]
    fn test_parse_snapshot_json() {
        let source = SnapshotSource::from_json(
            r#"{"namespaces": {"shop.orders": {"indexStats": [{"name": "_id_"}], "collectionStats": {"count": 4}}}}"#,
        )
        .unwrap();
        assert_eq!(source.index_stats(&orders()).unwrap().len(), 1);
        assert_eq!(source.collection_stats(&orders()).unwrap()["count"], 4);
    }
}
