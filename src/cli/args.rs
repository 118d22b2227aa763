//! CLI argument definitions using clap
//!
//! Commands:
//! - docscope shape   [--input <path>]
//! - docscope analyze [--input <path>]
//! - docscope advise  --snapshot <path> [--input <path>]
//! - docscope join    --snapshot <path> [--input <path>]
//!
//! Every command reads one JSON request from `--input`, or stdin when it is
//! omitted, and writes one JSON response to stdout.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docscope - query diagnostics for document databases
#[derive(Parser, Debug)]
#[command(name = "docscope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file; defaults apply when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Classify a filter into its query shape
    Shape {
        /// Request file (a filter, or `{"filter": ...}`)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Analyze captured explain output
    Analyze {
        /// Request file (`{"explain": ..., "projection": ...}`)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Build a diagnostic bundle for one query
    Advise {
        /// Captured document source snapshot
        #[arg(long)]
        snapshot: PathBuf,

        /// Request file (`{"namespace": ..., "query": ...}`)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Join two collections from a snapshot
    Join {
        /// Captured document source snapshot
        #[arg(long)]
        snapshot: PathBuf,

        /// Request file (a cross-collection request)
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

impl Command {
    /// Returns the request file, if one was given
    pub fn input(&self) -> Option<&PathBuf> {
        match self {
            Command::Shape { input }
            | Command::Analyze { input }
            | Command::Advise { input, .. }
            | Command::Join { input, .. } => input.as_ref(),
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shape_without_input() {
        let cli = Cli::try_parse_from(["docscope", "shape"]).unwrap();
        assert_eq!(cli.command, Command::Shape { input: None });
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_global_config_after_subcommand() {
        let cli = Cli::try_parse_from([
            "docscope", "join", "--snapshot", "snap.json", "--config", "docscope.json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("docscope.json")));
        assert!(cli.command.input().is_none());
    }

    #[test]
    fn test_advise_requires_snapshot() {
        assert!(Cli::try_parse_from(["docscope", "advise"]).is_err());
    }
}
