//! Join error types

use std::fmt;

use thiserror::Error;

use crate::source::SourceError;

/// Result type for join operations
pub type JoinResult<T> = Result<T, JoinError>;

/// Which input of a cross-collection join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSide {
    Left,
    Right,
}

impl JoinSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinSide::Left => "left",
            JoinSide::Right => "right",
        }
    }
}

impl fmt::Display for JoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Join failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// A local or foreign field path could not be parsed
    #[error("invalid field path '{path}': {reason}")]
    InvalidFieldPath { path: String, reason: &'static str },

    /// Fetching one side failed; no retry is attempted
    #[error("{side} query failed on {namespace}: {source}")]
    FetchFailed {
        side: JoinSide,
        namespace: String,
        #[source]
        source: SourceError,
    },
}

impl JoinError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            JoinError::InvalidFieldPath { .. } => "DOCSCOPE_JOIN_INVALID_PATH",
            JoinError::FetchFailed { .. } => "DOCSCOPE_JOIN_FETCH_FAILED",
        }
    }

    /// Returns true for input-contract violations
    pub fn is_validation(&self) -> bool {
        matches!(self, JoinError::InvalidFieldPath { .. })
    }

    /// Returns the failed side for fetch failures
    pub fn side(&self) -> Option<JoinSide> {
        match self {
            JoinError::FetchFailed { side, .. } => Some(*side),
            _ => None,
        }
    }
}
