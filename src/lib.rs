//! docscope - query diagnostics for document databases
//!
//! - shape: classify filters by equality and range fields
//! - explain: per-stage metrics from explain output
//! - advisor: diagnostic bundles through a document source
//! - join: application-level cross-collection joins

pub mod advisor;
pub mod cli;
pub mod config;
pub mod explain;
pub mod join;
pub mod observability;
pub mod shape;
pub mod source;
