//! docscope configuration
//!
//! Loaded from an explicit JSON file path; every field has a default so an
//! empty object is a valid configuration. Values are validated after load.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, Logger, Severity};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file was not valid JSON for this schema
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value failed validation
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "DOCSCOPE_CONFIG_READ",
            ConfigError::Parse(_) => "DOCSCOPE_CONFIG_PARSE",
            ConfigError::Invalid { .. } => "DOCSCOPE_CONFIG_INVALID",
        }
    }
}

/// Explain analysis tunables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Maximum plan nodes visited while searching for a sort stage
    pub max_plan_nodes: usize,
    /// Stage tag that marks an in-memory sort
    pub sort_stage: String,
    /// Identity field considered by index coverage
    pub identity_field: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_plan_nodes: 10_000,
            sort_stage: "SORT".to_string(),
            identity_field: "_id".to_string(),
        }
    }
}

/// Join tunables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinConfig {
    /// Identity field never copied from right documents
    pub identity_field: String,
    /// Left-side fetch limit when a request does not set one
    pub left_limit: u64,
    /// Left-side skip when a request does not set one
    pub left_skip: u64,
    /// Right-side fetch limit
    pub right_limit: u64,
    /// Also copy the foreign join field onto matched left documents
    pub copy_join_key: bool,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            identity_field: "_id".to_string(),
            left_limit: 100,
            left_skip: 0,
            right_limit: 100,
            copy_join_key: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Minimum severity written: TRACE, INFO, WARN or ERROR
    pub min_severity: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            min_severity: "INFO".to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analyzer: AnalyzerConfig,
    pub join: JoinConfig,
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_json(&content)?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", &path.display().to_string())],
        );

        Ok(config)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.analyzer.max_plan_nodes == 0 {
            return Err(ConfigError::Invalid {
                field: "analyzer.max_plan_nodes",
                reason: "must be > 0".into(),
            });
        }

        if self.analyzer.sort_stage.is_empty() {
            return Err(ConfigError::Invalid {
                field: "analyzer.sort_stage",
                reason: "must not be empty".into(),
            });
        }

        if self.analyzer.identity_field.is_empty() {
            return Err(ConfigError::Invalid {
                field: "analyzer.identity_field",
                reason: "must not be empty".into(),
            });
        }

        if self.join.identity_field.is_empty() {
            return Err(ConfigError::Invalid {
                field: "join.identity_field",
                reason: "must not be empty".into(),
            });
        }

        self.min_severity()?;

        Ok(())
    }

    /// Returns the parsed minimum log severity
    pub fn min_severity(&self) -> ConfigResult<Severity> {
        self.log
            .min_severity
            .parse()
            .map_err(|reason| ConfigError::Invalid {
                field: "log.min_severity",
                reason,
            })
    }

    /// Applies process-wide settings (log threshold)
    pub fn apply(&self) -> ConfigResult<()> {
        Logger::set_min_severity(self.min_severity()?);
        Ok(())
    }
}
