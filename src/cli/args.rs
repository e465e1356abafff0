//! CLI argument definitions using clap
//!
//! Commands:
//! - tokenmap-inspect <db_path> all
//! - tokenmap-inspect <db_path> chain <root_chain_type>
//! - tokenmap-inspect <db_path> token <root_chain_type> <root_token>
//! - tokenmap-inspect <db_path> keys
//! - tokenmap-inspect <db_path> metadata
//! - tokenmap-inspect <db_path> count
//!
//! The command defaults to `all`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Inspect the cross-chain token map stored in a key-value store
#[derive(Parser, Debug)]
#[command(name = "tokenmap-inspect")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the store directory
    pub db_path: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Report invalid entries without deleting them
    #[arg(long)]
    pub no_repair: bool,

    /// Path to an optional JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all mappings grouped by root chain type
    All,

    /// List the mappings of one chain
    Chain {
        /// Root chain type, e.g. "ethereum"
        root_chain_type: String,
    },

    /// Look up one mapping by chain type and root token
    Token {
        /// Root chain type
        root_chain_type: String,
        /// Root token address
        root_token: String,
    },

    /// List every key in the mapping namespace
    Keys,

    /// Show producer metadata (hash, last event id, checked end block)
    Metadata,

    /// Count mappings per chain
    Count,
}

/// How results are written to stdout
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable listing
    Text,
    /// A single JSON object
    Json,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// The requested command, `all` when none was given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::All)
    }
}

impl Command {
    /// Whether the command scans the mapping namespace and so may repair it
    pub fn scans(&self) -> bool {
        matches!(self, Command::All | Command::Chain { .. } | Command::Count)
    }
}
