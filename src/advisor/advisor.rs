//! Optimization advisor
//!
//! Sequencing only: explain the query, analyze the explain output, then
//! gather index list, index usage and collection stats. The first failing
//! collaborator call aborts the operation.

use serde_json::{Map, Value};

use super::bundle::DiagnosticBundle;
use super::errors::{AdvisorError, AdvisorResult};
use crate::config::AnalyzerConfig;
use crate::explain::ExplainAnalyzer;
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::source::{DocumentSource, Namespace, QueryRequest, SourceCall, SourceError};

/// Builds diagnostic bundles for find, count and aggregate queries
#[derive(Debug, Clone, Default)]
pub struct OptimizationAdvisor {
    analyzer: ExplainAnalyzer,
}

impl OptimizationAdvisor {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            analyzer: ExplainAnalyzer::new(config),
        }
    }

    /// Diagnoses a find query. The projection feeds index coverage.
    pub fn advise_find<S: DocumentSource + ?Sized>(
        &self,
        source: &S,
        namespace: &Namespace,
        filter: Map<String, Value>,
        sort: Option<Map<String, Value>>,
        limit: Option<i64>,
        projection: Option<Map<String, Value>>,
    ) -> AdvisorResult<DiagnosticBundle> {
        let request = QueryRequest::Find {
            filter,
            sort,
            limit,
            projection,
        };
        self.advise(source, namespace, &request)
    }

    /// Diagnoses a count query
    pub fn advise_count<S: DocumentSource + ?Sized>(
        &self,
        source: &S,
        namespace: &Namespace,
        filter: Map<String, Value>,
    ) -> AdvisorResult<DiagnosticBundle> {
        self.advise(source, namespace, &QueryRequest::count(filter))
    }

    /// Diagnoses an aggregation pipeline
    pub fn advise_aggregate<S: DocumentSource + ?Sized>(
        &self,
        source: &S,
        namespace: &Namespace,
        pipeline: Vec<Value>,
    ) -> AdvisorResult<DiagnosticBundle> {
        self.advise(source, namespace, &QueryRequest::aggregate(pipeline))
    }

    /// Diagnoses any query request
    pub fn advise<S: DocumentSource + ?Sized>(
        &self,
        source: &S,
        namespace: &Namespace,
        request: &QueryRequest,
    ) -> AdvisorResult<DiagnosticBundle> {
        let ns = namespace.to_string();
        let scope = ObservationScope::with_fields(
            "ADVISE",
            &[("namespace", &ns), ("query_type", request.query_type().as_str())],
        );

        match self.collect(source, namespace, request) {
            Ok(bundle) => {
                scope.complete_with_fields(&[("stages", &bundle.analysis.len().to_string())]);
                Ok(bundle)
            }
            Err(err) => {
                log_event_with_fields(
                    Event::CollaboratorFailed,
                    &[
                        ("call", err.call().as_str()),
                        ("namespace", &ns),
                        ("code", err.code()),
                    ],
                );
                scope.fail(&err.to_string());
                Err(err)
            }
        }
    }

    fn collect<S: DocumentSource + ?Sized>(
        &self,
        source: &S,
        namespace: &Namespace,
        request: &QueryRequest,
    ) -> AdvisorResult<DiagnosticBundle> {
        let annotate = |call: SourceCall| {
            move |source: SourceError| AdvisorError::Collaborator {
                call,
                namespace: namespace.to_string(),
                source,
            }
        };

        let explain = source
            .explain(namespace, request)
            .map_err(annotate(SourceCall::Explain))?;
        let analysis = self.analyzer.analyze(&explain, request.projection());

        let indexes = source
            .list_indexes(namespace)
            .map_err(annotate(SourceCall::ListIndexes))?;
        let index_stats = source
            .index_stats(namespace)
            .map_err(annotate(SourceCall::IndexStats))?;
        let collection_stats = source
            .collection_stats(namespace)
            .map_err(annotate(SourceCall::CollectionStats))?;

        Ok(DiagnosticBundle {
            explain,
            analysis,
            indexes,
            index_stats,
            collection_stats,
        })
    }
}
