//! Collaborator error types
//!
//! These are the failures an external `DocumentSource` reports. Callers
//! annotate them with which call (advisor) or side (join) failed.

use std::fmt;

use thiserror::Error;

/// Result type for collaborator calls
pub type SourceResult<T> = Result<T, SourceError>;

/// The collaborator operation that was invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceCall {
    Explain,
    ListIndexes,
    IndexStats,
    CollectionStats,
    Fetch,
}

impl SourceCall {
    /// Returns the call name used in error messages and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceCall::Explain => "explain",
            SourceCall::ListIndexes => "listIndexes",
            SourceCall::IndexStats => "indexStats",
            SourceCall::CollectionStats => "collectionStats",
            SourceCall::Fetch => "fetch",
        }
    }
}

impl fmt::Display for SourceCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failures reported by a document source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The backing service could not answer
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The namespace does not exist in this source
    #[error("unknown namespace: {0}")]
    UnknownNamespace(String),

    /// The source cannot explain this kind of query
    #[error("cannot explain {query_type} query on {namespace}")]
    UnsupportedQuery {
        namespace: String,
        query_type: &'static str,
    },

    /// A filter used an operator the source cannot evaluate
    #[error("unsupported filter operator: {0}")]
    UnsupportedOperator(String),

    /// A filter was structurally invalid
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
}

impl SourceError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SourceError::Unavailable(_) => "DOCSCOPE_SOURCE_UNAVAILABLE",
            SourceError::UnknownNamespace(_) => "DOCSCOPE_SOURCE_UNKNOWN_NAMESPACE",
            SourceError::UnsupportedQuery { .. } => "DOCSCOPE_SOURCE_UNSUPPORTED_QUERY",
            SourceError::UnsupportedOperator(_) => "DOCSCOPE_SOURCE_UNSUPPORTED_OPERATOR",
            SourceError::InvalidFilter(_) => "DOCSCOPE_SOURCE_INVALID_FILTER",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_names() {
        assert_eq!(SourceCall::ListIndexes.as_str(), "listIndexes");
        assert_eq!(SourceCall::CollectionStats.to_string(), "collectionStats");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SourceError::Unavailable("down".into()).code(),
            "DOCSCOPE_SOURCE_UNAVAILABLE"
        );
        let err = SourceError::UnsupportedQuery {
            namespace: "shop.orders".into(),
            query_type: "count",
        };
        assert_eq!(err.to_string(), "cannot explain count query on shop.orders");
    }
}
