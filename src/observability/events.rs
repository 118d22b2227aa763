//! Observable events for docscope
//!
//! Events are explicit and typed. Scoped operations (advise, cross-collection
//! join) log their own BEGIN/COMPLETE/FAILED lines through `ObservationScope`.

use std::fmt;

use super::logger::Severity;

/// Observable events in docscope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded and validated
    ConfigLoaded,

    // Shape
    /// Filter classified into a query shape
    ShapeNormalized,

    // Explain analysis
    /// Explain output analyzed into stage metrics
    ExplainAnalyzed,
    /// Plan traversal stopped at the node bound
    PlanTraversalTruncated,

    // Advisor
    /// A collaborator call failed during advise
    CollaboratorFailed,

    // Join
    /// Join index built over the right-side documents
    JoinIndexBuilt,
    /// Join produced its merged documents
    JoinComplete,
    /// Fetching one side of a cross-collection join failed
    JoinFetchFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ShapeNormalized => "SHAPE_NORMALIZED",
            Event::ExplainAnalyzed => "EXPLAIN_ANALYZED",
            Event::PlanTraversalTruncated => "PLAN_TRAVERSAL_TRUNCATED",
            Event::CollaboratorFailed => "COLLABORATOR_FAILED",
            Event::JoinIndexBuilt => "JOIN_INDEX_BUILT",
            Event::JoinComplete => "JOIN_COMPLETE",
            Event::JoinFetchFailed => "JOIN_FETCH_FAILED",
        }
    }

    /// Returns the severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::PlanTraversalTruncated => Severity::Warn,
            Event::CollaboratorFailed | Event::JoinFetchFailed => Severity::Error,
            Event::ShapeNormalized | Event::JoinIndexBuilt => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::ShapeNormalized,
            Event::ExplainAnalyzed,
            Event::PlanTraversalTruncated,
            Event::CollaboratorFailed,
            Event::JoinIndexBuilt,
            Event::JoinComplete,
            Event::JoinFetchFailed,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_failure_events_log_as_errors() {
        assert_eq!(Event::CollaboratorFailed.severity(), Severity::Error);
        assert_eq!(Event::JoinFetchFailed.severity(), Severity::Error);
        assert_eq!(Event::PlanTraversalTruncated.severity(), Severity::Warn);
        assert_eq!(Event::JoinComplete.severity(), Severity::Info);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::ExplainAnalyzed), "EXPLAIN_ANALYZED");
    }
}
