//! CLI command implementations
//!
//! Each command decodes its request, runs one diagnostic operation and
//! returns the JSON payload. `run` wraps the payload in the response
//! envelope; failures are reported on stdout as an error envelope and
//! propagated so the process exits non-zero.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::advisor::OptimizationAdvisor;
use crate::config::Config;
use crate::explain::ExplainAnalyzer;
use crate::join::{CrossCollectionQuery, CrossCollectionRequest};
use crate::shape::query_shape;
use crate::source::{DocumentSource, Namespace, QueryRequest};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_request, read_snapshot, write_error, write_response};

/// `analyze` request
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub explain: Value,
    #[serde(default)]
    pub projection: Option<Map<String, Value>>,
}

/// `advise` request
#[derive(Debug, Deserialize)]
pub struct AdviseRequest {
    pub namespace: Namespace,
    pub query: QueryRequest,
}

/// Parse arguments, run the command, report the outcome
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    let result = load_config(cli.config.as_deref())
        .and_then(|config| run_command(&cli.command, &config))
        .and_then(write_response);

    if let Err(err) = &result {
        write_error(err.code(), err.message())?;
    }

    result
}

/// Load configuration, or defaults when no path is given, and apply it
pub fn load_config(path: Option<&Path>) -> CliResult<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.apply()?;

    Ok(config)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: &Command, config: &Config) -> CliResult<Value> {
    let request = read_request(cmd.input().map(|p| p.as_path()))?;

    match cmd {
        Command::Shape { .. } => shape(&request),
        Command::Analyze { .. } => analyze(config, request),
        Command::Advise { snapshot, .. } => advise(config, &read_snapshot(snapshot)?, request),
        Command::Join { snapshot, .. } => join(config, &read_snapshot(snapshot)?, request),
    }
}

/// Classify a filter or `{"filter": ...}` request
pub fn shape(request: &Value) -> CliResult<Value> {
    let shape = query_shape(request)?;
    Ok(serde_json::to_value(shape)?)
}

/// Analyze captured explain output
pub fn analyze(config: &Config, request: Value) -> CliResult<Value> {
    let request: AnalyzeRequest = decode(request)?;
    let analyzer = ExplainAnalyzer::new(config.analyzer.clone());
    let metrics = analyzer.analyze(&request.explain, request.projection.as_ref());

    Ok(serde_json::to_value(metrics)?)
}

/// Build a diagnostic bundle for one query
pub fn advise<S: DocumentSource + ?Sized>(
    config: &Config,
    source: &S,
    request: Value,
) -> CliResult<Value> {
    let request: AdviseRequest = decode(request)?;
    let advisor = OptimizationAdvisor::new(config.analyzer.clone());
    let bundle = advisor.advise(source, &request.namespace, &request.query)?;

    Ok(serde_json::to_value(bundle)?)
}

/// Join two collections
pub fn join<S: DocumentSource + ?Sized>(
    config: &Config,
    source: &S,
    request: Value,
) -> CliResult<Value> {
    let request: CrossCollectionRequest = decode(request)?;
    let output = CrossCollectionQuery::new(config.join.clone()).run(source, &request)?;

    Ok(serde_json::to_value(output)?)
}

fn decode<T: DeserializeOwned>(request: Value) -> CliResult<T> {
    serde_json::from_value(request).map_err(|e| CliError::invalid_request(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{NamespaceSnapshot, QueryType, SnapshotSource};
    use serde_json::json;

    fn snapshot() -> SnapshotSource {
        SnapshotSource::new()
            .with_namespace(
                &Namespace::new("shop", "orders"),
                NamespaceSnapshot::new()
                    .with_explain(
                        QueryType::Find,
                        json!({"queryPlanner": {"winningPlan": {"stage": "COLLSCAN"}},
                               "executionStats": {"nReturned": 1, "totalDocsExamined": 4}}),
                    )
                    .with_collection_stats(json!({"count": 4}))
                    .with_documents(vec![json!({"_id": 1, "uid": 7})]),
            )
            .with_namespace(
                &Namespace::new("shop", "users"),
                NamespaceSnapshot::new().with_documents(vec![json!({"_id": 9, "uid": 7, "name": "Ada"})]),
            )
    }

    #[test]
    fn test_shape_command() {
        let data = shape(&json!({"filter": {"a": 1, "b": {"$gt": 2}}})).unwrap();
        assert_eq!(data["shapeKey"], "EQ[a]|RANGE[b]");
    }

    #[test]
    fn test_shape_rejects_non_mapping() {
        let err = shape(&json!([1, 2])).unwrap_err();
        assert_eq!(err.code(), "DOCSCOPE_SHAPE_INVALID");
    }

    #[test]
    fn test_analyze_serializes_infinite_ratio() {
        let data = analyze(
            &Config::default(),
            json!({"explain": {"queryPlanner": {"winningPlan": {"stage": "IXSCAN"}},
                               "executionStats": {"nReturned": 0, "totalDocsExamined": 5}}}),
        )
        .unwrap();
        assert_eq!(data[0]["amplificationRatio"], "Infinity");
    }

    #[test]
    fn test_analyze_requires_explain() {
        let err = analyze(&Config::default(), json!({})).unwrap_err();
        assert_eq!(err.code(), "DOCSCOPE_CLI_INVALID_REQUEST");
    }

    #[test]
    fn test_advise_command() {
        let data = advise(
            &Config::default(),
            &snapshot(),
            json!({"namespace": {"db": "shop", "collection": "orders"},
                   "query": {"queryType": "find", "filter": {"uid": 7}}}),
        )
        .unwrap();
        assert_eq!(data["analysis"][0]["stage"], "COLLSCAN");
        assert_eq!(data["collectionStats"]["count"], 4);
    }

    #[test]
    fn test_advise_reports_failed_call() {
        let err = advise(
            &Config::default(),
            &snapshot(),
            json!({"namespace": {"db": "shop", "collection": "orders"},
                   "query": {"queryType": "count"}}),
        )
        .unwrap_err();
        assert_eq!(err.code(), "DOCSCOPE_ADVISOR_COLLABORATOR_FAILED");
    }

    #[test]
    fn test_join_command() {
        let data = join(
            &Config::default(),
            &snapshot(),
            json!({"left": {"db": "shop", "collection": "orders"},
                   "right": {"db": "shop", "collection": "users"},
                   "localField": "uid", "foreignField": "uid"}),
        )
        .unwrap();
        assert_eq!(data["totalCount"], 1);
        assert_eq!(data["documents"][0]["users_name"], "Ada");
    }

    #[test]
    fn test_load_config_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, Config::default());
    }
}
