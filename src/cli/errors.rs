//! CLI-specific error types
//!
//! Errors from the diagnostic subsystems keep their own codes; the CLI only
//! adds codes for its own I/O and request decoding.

use std::fmt;
use std::io;

use crate::advisor::AdvisorError;
use crate::config::ConfigError;
use crate::join::JoinError;
use crate::shape::ShapeError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// I/O error (stdin/stdout/files)
    IoError,
    /// Request JSON did not match the command's request schema
    InvalidRequest,
    /// Snapshot file could not be decoded
    InvalidSnapshot,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::IoError => "DOCSCOPE_CLI_IO_ERROR",
            Self::InvalidRequest => "DOCSCOPE_CLI_INVALID_REQUEST",
            Self::InvalidSnapshot => "DOCSCOPE_CLI_INVALID_SNAPSHOT",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: &'static str,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
        }
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Malformed request
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidRequest, msg)
    }

    /// Malformed snapshot
    pub fn invalid_snapshot(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidSnapshot, msg)
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    fn passthrough(code: &'static str, message: String) -> Self {
        Self { code, message }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::passthrough(e.code(), e.to_string())
    }
}

impl From<ShapeError> for CliError {
    fn from(e: ShapeError) -> Self {
        Self::passthrough(e.code(), e.to_string())
    }
}

impl From<AdvisorError> for CliError {
    fn from(e: AdvisorError) -> Self {
        Self::passthrough(e.code(), e.to_string())
    }
}

impl From<JoinError> for CliError {
    fn from(e: JoinError) -> Self {
        Self::passthrough(e.code(), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
