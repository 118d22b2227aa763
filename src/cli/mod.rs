//! CLI module for docscope
//!
//! Offline command-line surface over captured data:
//! - shape: classify a filter
//! - analyze: per-stage metrics for explain output
//! - advise: diagnostic bundle from a snapshot
//! - join: cross-collection join over a snapshot

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    advise, analyze, join, load_config, run, run_command, shape, AdviseRequest, AnalyzeRequest,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{
    error_envelope, parse_request, read_request, read_snapshot, response_envelope, write_error,
    write_line, write_response,
};
