//! Cross-collection query orchestration
//!
//! Fetches both sides through a `DocumentSource`, then joins them with the
//! right collection's name as the field prefix. Paths are validated before
//! anything is fetched. The left side is fetched first; a failure on either
//! side aborts the query and names that side.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::engine::{JoinEngine, JoinSpec};
use super::errors::{JoinError, JoinResult, JoinSide};
use crate::config::JoinConfig;
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::source::{DocumentSource, FetchRequest, Namespace};

/// A join of two collections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossCollectionRequest {
    pub left: Namespace,
    pub right: Namespace,
    pub local_field: String,
    pub foreign_field: String,
    #[serde(default)]
    pub left_filter: Map<String, Value>,
    #[serde(default)]
    pub right_filter: Map<String, Value>,
    /// Left-side limit; falls back to the configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Left-side skip; falls back to the configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
}

/// Joined documents
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinOutput {
    pub documents: Vec<Value>,
    pub total_count: usize,
}

impl JoinOutput {
    fn new(documents: Vec<Value>) -> Self {
        Self {
            total_count: documents.len(),
            documents,
        }
    }
}

/// Runs cross-collection requests against a document source
#[derive(Debug, Clone, Default)]
pub struct CrossCollectionQuery {
    engine: JoinEngine,
    config: JoinConfig,
}

impl CrossCollectionQuery {
    pub fn new(config: JoinConfig) -> Self {
        Self {
            engine: JoinEngine::new(&config),
            config,
        }
    }

    pub fn run<S: DocumentSource + ?Sized>(
        &self,
        source: &S,
        request: &CrossCollectionRequest,
    ) -> JoinResult<JoinOutput> {
        let spec = JoinSpec::new(
            &request.local_field,
            &request.foreign_field,
            &request.right.collection,
        )?;

        let left_ns = request.left.to_string();
        let right_ns = request.right.to_string();
        let scope = ObservationScope::with_fields(
            "CROSS_COLLECTION_JOIN",
            &[("left", &left_ns), ("right", &right_ns)],
        );

        match self.fetch_both(source, request) {
            Ok((left, right)) => {
                let output = JoinOutput::new(self.engine.join(left, &right, &spec));
                scope.complete_with_fields(&[("total_count", &output.total_count.to_string())]);
                Ok(output)
            }
            Err(err) => {
                if let Some(side) = err.side() {
                    log_event_with_fields(
                        Event::JoinFetchFailed,
                        &[("side", side.as_str()), ("code", err.code())],
                    );
                }
                scope.fail(&err.to_string());
                Err(err)
            }
        }
    }

    fn fetch_both<S: DocumentSource + ?Sized>(
        &self,
        source: &S,
        request: &CrossCollectionRequest,
    ) -> JoinResult<(Vec<Value>, Vec<Value>)> {
        let left_fetch = FetchRequest::new(
            request.left_filter.clone(),
            request.limit.unwrap_or(self.config.left_limit),
            request.skip.unwrap_or(self.config.left_skip),
        );
        let left = source
            .fetch(&request.left, &left_fetch)
            .map_err(|source| JoinError::FetchFailed {
                side: JoinSide::Left,
                namespace: request.left.to_string(),
                source,
            })?;

        let right_fetch =
            FetchRequest::new(request.right_filter.clone(), self.config.right_limit, 0);
        let right = source
            .fetch(&request.right, &right_fetch)
            .map_err(|source| JoinError::FetchFailed {
                side: JoinSide::Right,
                namespace: request.right.to_string(),
                source,
            })?;

        Ok((left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{NamespaceSnapshot, SnapshotSource};
    use serde_json::json;

    fn source() -> SnapshotSource {
        SnapshotSource::new()
            .with_namespace(
                &Namespace::new("shop", "orders"),
                NamespaceSnapshot::new().with_documents(vec![
                    json!({"_id": 1, "uid": 7, "total": 10}),
                    json!({"_id": 2, "uid": 8, "total": 20}),
                    json!({"_id": 3, "uid": 9, "total": 30}),
                ]),
            )
            .with_namespace(
                &Namespace::new("shop", "users"),
                NamespaceSnapshot::new().with_documents(vec![
                    json!({"_id": "u7", "uid": 7, "name": "Ada"}),
                    json!({"_id": "u8", "uid": 8, "name": "Lin"}),
                ]),
            )
    }

    fn request() -> CrossCollectionRequest {
        serde_json::from_value(json!({
            "left": {"db": "shop", "collection": "orders"},
            "right": {"db": "shop", "collection": "users"},
            "localField": "uid",
            "foreignField": "uid"
        }))
        .unwrap()
    }

    #[test]
    fn test_join_prefixes_with_right_collection() {
        let output = CrossCollectionQuery::default().run(&source(), &request()).unwrap();

        assert_eq!(output.total_count, 3);
        assert_eq!(output.documents[0]["users_name"], "Ada");
        assert_eq!(output.documents[1]["users_name"], "Lin");
        assert!(output.documents[2].get("users_name").is_none());
    }

    #[test]
    fn test_left_filter_skip_and_limit() {
        let mut request = request();
        request.left_filter = json!({"total": {"$gte": 20}}).as_object().cloned().unwrap();
        request.skip = Some(1);
        request.limit = Some(5);

        let output = CrossCollectionQuery::default().run(&source(), &request).unwrap();
        assert_eq!(output.total_count, 1);
        assert_eq!(output.documents[0]["_id"], 3);
    }

    #[test]
    fn test_missing_left_namespace_reports_left() {
        let mut request = request();
        request.left = Namespace::new("shop", "missing");

        let err = CrossCollectionQuery::default().run(&source(), &request).unwrap_err();
        assert_eq!(err.side(), Some(JoinSide::Left));
        assert_eq!(err.code(), "DOCSCOPE_JOIN_FETCH_FAILED");
    }

    #[test]
    fn test_missing_right_namespace_reports_right() {
        let mut request = request();
        request.right = Namespace::new("shop", "missing");

        let err = CrossCollectionQuery::default().run(&source(), &request).unwrap_err();
        assert_eq!(err.side(), Some(JoinSide::Right));
    }

    #[test]
    fn test_invalid_path_fails_before_fetch() {
        let mut request = request();
        request.left = Namespace::new("shop", "missing");
        request.local_field = "a..b".into();

        let err = CrossCollectionQuery::default().run(&source(), &request).unwrap_err();
        assert!(err.is_validation());
    }
}
