//! Execution counters and derived ratios

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Runtime counters reported by the engine for one plan.
///
/// Absent, negative or non-numeric counters read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStats {
    pub n_returned: u64,
    pub total_docs_examined: u64,
    pub total_keys_examined: u64,
}

impl ExecutionStats {
    /// Reads counters from an `executionStats` object
    pub fn from_value(stats: Option<&Value>) -> Self {
        let counter = |name: &str| stats.and_then(|s| s.get(name)).map_or(0, read_counter);

        Self {
            n_returned: counter("nReturned"),
            total_docs_examined: counter("totalDocsExamined"),
            total_keys_examined: counter("totalKeysExamined"),
        }
    }

    /// Documents examined per document returned; infinite when nothing was returned
    pub fn amplification_ratio(&self) -> f64 {
        ratio(self.total_docs_examined, self.n_returned)
    }

    /// Keys examined per document examined; infinite when no document was examined
    pub fn key_doc_ratio(&self) -> f64 {
        ratio(self.total_keys_examined, self.total_docs_examined)
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        f64::INFINITY
    } else {
        numerator as f64 / denominator as f64
    }
}

fn read_counter(value: &Value) -> u64 {
    if let Some(n) = value.as_u64() {
        return n;
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f > 0.0 => f as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reads_counters() {
        let raw = json!({"nReturned": 10, "totalDocsExamined": 100, "totalKeysExamined": 50});
        let stats = ExecutionStats::from_value(Some(&raw));
        assert_eq!(stats.n_returned, 10);
        assert_eq!(stats.amplification_ratio(), 10.0);
        assert_eq!(stats.key_doc_ratio(), 0.5);
    }

    #[test]
    fn test_missing_counters_default_to_zero() {
        assert_eq!(ExecutionStats::from_value(None), ExecutionStats::default());

        let raw = json!({"nReturned": "many", "totalDocsExamined": -4, "totalKeysExamined": 3.9});
        let stats = ExecutionStats::from_value(Some(&raw));
        assert_eq!(stats.n_returned, 0);
        assert_eq!(stats.total_docs_examined, 0);
        assert_eq!(stats.total_keys_examined, 3);
    }

    #[test]
    fn test_zero_denominators_are_infinite() {
        let stats = ExecutionStats::default();
        assert_eq!(stats.amplification_ratio(), f64::INFINITY);
        assert_eq!(stats.key_doc_ratio(), f64::INFINITY);
    }
}
