//! Explain plan analyzer
//!
//! Computes per-stage health metrics from explain output. Two input shapes
//! are accepted, told apart by a top-level `stages` array:
//!
//! - simple: `queryPlanner.winningPlan` and `executionStats` at the top level
//! - staged (aggregation): `stages` is a list of `{"$name": detail}` wrappers,
//!   each detail optionally carrying its own `queryPlanner`/`executionStats`
//!
//! Malformed input never aborts analysis: missing pieces read as 0,
//! `UNKNOWN` or false.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::coverage::is_covered;
use super::plan::PlanNode;
use super::stats::ExecutionStats;
use crate::config::AnalyzerConfig;
use crate::observability::{log_event_with_fields, Event};

/// Stage name used when none can be determined
pub const UNKNOWN_STAGE: &str = "UNKNOWN";

/// Health metrics for one analyzed stage
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageMetrics {
    pub stage: String,
    pub n_returned: u64,
    pub total_docs_examined: u64,
    pub total_keys_examined: u64,
    /// Documents examined per document returned
    #[serde(serialize_with = "serialize_ratio")]
    pub amplification_ratio: f64,
    /// Keys examined per document examined
    #[serde(serialize_with = "serialize_ratio")]
    pub key_doc_ratio: f64,
    /// The winning plan contains an in-memory sort
    pub triggers_sort: bool,
    /// The projection is answerable from index keys alone
    pub covered: bool,
}

/// Infinite ratios serialize as the string "Infinity" so output stays valid JSON
fn serialize_ratio<S: Serializer>(ratio: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if ratio.is_finite() {
        serializer.serialize_f64(*ratio)
    } else {
        serializer.serialize_str("Infinity")
    }
}

/// Stateless analyzer over explain output
#[derive(Debug, Clone, Default)]
pub struct ExplainAnalyzer {
    config: AnalyzerConfig,
}

impl ExplainAnalyzer {
    /// Creates an analyzer with the given tunables
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Returns the analyzer configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyzes explain output, returning one entry per stage in input order.
    ///
    /// `projection` maps field names to inclusion flags; it only affects the
    /// `covered` metric.
    pub fn analyze(
        &self,
        explain: &Value,
        projection: Option<&Map<String, Value>>,
    ) -> Vec<StageMetrics> {
        let metrics: Vec<StageMetrics> = match explain.get("stages").and_then(Value::as_array) {
            Some(stages) => stages
                .iter()
                .map(|wrapper| self.analyze_wrapped_stage(wrapper, projection))
                .collect(),
            None => vec![self.analyze_stage(explain, None, projection)],
        };

        log_event_with_fields(
            Event::ExplainAnalyzed,
            &[
                ("stages", &metrics.len().to_string()),
                (
                    "sorting_stages",
                    &metrics.iter().filter(|m| m.triggers_sort).count().to_string(),
                ),
            ],
        );

        metrics
    }

    /// Unwraps a `{"$name": detail}` pipeline entry
    fn analyze_wrapped_stage(
        &self,
        wrapper: &Value,
        projection: Option<&Map<String, Value>>,
    ) -> StageMetrics {
        match wrapper.as_object().and_then(|entry| entry.iter().next()) {
            Some((name, detail)) => {
                let fallback = name.trim_start_matches('$').to_uppercase();
                self.analyze_stage(detail, Some(fallback), projection)
            }
            None => self.analyze_stage(&Value::Null, None, projection),
        }
    }

    fn analyze_stage(
        &self,
        detail: &Value,
        fallback_stage: Option<String>,
        projection: Option<&Map<String, Value>>,
    ) -> StageMetrics {
        let empty = Value::Null;
        let winning_plan = detail
            .get("queryPlanner")
            .and_then(|planner| planner.get("winningPlan"))
            .unwrap_or(&empty);
        let plan = PlanNode::new(winning_plan);
        let stats = ExecutionStats::from_value(detail.get("executionStats"));

        let stage = plan
            .stage()
            .map(str::to_string)
            .or(fallback_stage)
            .unwrap_or_else(|| UNKNOWN_STAGE.to_string());

        StageMetrics {
            triggers_sort: self.triggers_sort(plan, &stage),
            covered: is_covered(projection, plan, &self.config.identity_field),
            amplification_ratio: stats.amplification_ratio(),
            key_doc_ratio: stats.key_doc_ratio(),
            n_returned: stats.n_returned,
            total_docs_examined: stats.total_docs_examined,
            total_keys_examined: stats.total_keys_examined,
            stage,
        }
    }

    fn triggers_sort(&self, plan: PlanNode<'_>, stage: &str) -> bool {
        let search = plan.find_stage(&self.config.sort_stage, self.config.max_plan_nodes);

        if search.truncated {
            log_event_with_fields(
                Event::PlanTraversalTruncated,
                &[
                    ("stage", stage),
                    ("max_plan_nodes", &self.config.max_plan_nodes.to_string()),
                ],
            );
        }

        search.found
    }
}

/// Analyzes explain output with default tunables
pub fn analyze_explain(
    explain: &Value,
    projection: Option<&Map<String, Value>>,
) -> Vec<StageMetrics> {
    ExplainAnalyzer::default().analyze(explain, projection)
}
