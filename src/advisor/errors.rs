//! Advisor error types

use thiserror::Error;

use crate::source::{SourceCall, SourceError};

/// Result type for advisor operations
pub type AdvisorResult<T> = Result<T, AdvisorError>;

/// Advisor failures. Any one failed collaborator call aborts the whole
/// bundle; no partial bundle is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvisorError {
    /// A collaborator call failed
    #[error("{call} failed for {namespace}: {source}")]
    Collaborator {
        call: SourceCall,
        namespace: String,
        #[source]
        source: SourceError,
    },
}

impl AdvisorError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            AdvisorError::Collaborator { .. } => "DOCSCOPE_ADVISOR_COLLABORATOR_FAILED",
        }
    }

    /// Returns the collaborator call that failed
    pub fn call(&self) -> SourceCall {
        match self {
            AdvisorError::Collaborator { call, .. } => *call,
        }
    }

    /// Advisor errors are collaborator failures, never input violations
    pub fn is_validation(&self) -> bool {
        false
    }
}
