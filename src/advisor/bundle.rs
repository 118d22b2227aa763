//! Diagnostic bundle returned by the advisor

use serde::Serialize;
use serde_json::Value;

use crate::explain::StageMetrics;

/// Everything needed to reason about one query's performance: the raw
/// explain output, its per-stage analysis, and index/collection metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticBundle {
    pub explain: Value,
    pub analysis: Vec<StageMetrics>,
    pub indexes: Vec<Value>,
    pub index_stats: Vec<Value>,
    pub collection_stats: Value,
}

impl DiagnosticBundle {
    /// Returns true if any analyzed stage sorts in memory
    pub fn any_in_memory_sort(&self) -> bool {
        self.analysis.iter().any(|stage| stage.triggers_sort)
    }

    /// Highest finite amplification ratio across stages, if any
    pub fn worst_amplification(&self) -> Option<f64> {
        self.analysis
            .iter()
            .map(|stage| stage.amplification_ratio)
            .filter(|ratio| ratio.is_finite())
            .reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stage(name: &str, amplification_ratio: f64, triggers_sort: bool) -> StageMetrics {
        StageMetrics {
            stage: name.to_string(),
            n_returned: 0,
            total_docs_examined: 0,
            total_keys_examined: 0,
            amplification_ratio,
            key_doc_ratio: 0.0,
            triggers_sort,
            covered: false,
        }
    }

    fn bundle(analysis: Vec<StageMetrics>) -> DiagnosticBundle {
        DiagnosticBundle {
            explain: json!({}),
            analysis,
            indexes: Vec::new(),
            index_stats: Vec::new(),
            collection_stats: json!({}),
        }
    }

    #[test]
    fn test_worst_amplification_skips_infinite() {
        let mixed = bundle(vec![
            stage("COLLSCAN", 40.0, false),
            stage("GROUP", f64::INFINITY, false),
            stage("SORT", 2.5, true),
        ]);

        assert_eq!(mixed.worst_amplification(), Some(40.0));
        assert!(mixed.any_in_memory_sort());
    }

    #[test]
    fn test_worst_amplification_without_finite_ratios() {
        let infinite = bundle(vec![stage("MATCH", f64::INFINITY, false)]);
        assert_eq!(infinite.worst_amplification(), None);
        assert!(!infinite.any_in_memory_sort());

        assert_eq!(bundle(Vec::new()).worst_amplification(), None);
    }
}
