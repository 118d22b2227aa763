//! Explain plan analysis subsystem
//!
//! Turns database explain output into per-stage health metrics: scan
//! amplification, key/document ratio, in-memory sort detection and index
//! coverage. Analysis is a pure function of its input and never mutates it.

mod analyzer;
mod coverage;
mod plan;
mod stats;

pub use analyzer::{analyze_explain, ExplainAnalyzer, StageMetrics, UNKNOWN_STAGE};
pub use coverage::{is_covered, projected_fields};
pub use plan::{ChildLink, PlanNode, StageSearch};
pub use stats::ExecutionStats;
