//! CLI module for tokenmap-inspect
//!
//! Provides command-line interface for:
//! - all: Every mapping grouped by chain
//! - chain: Mappings of one chain
//! - token: One mapping by chain and root token
//! - keys: Raw key listing
//! - metadata: Producer metadata
//! - count: Mapping count per chain

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, OutputFormat};
pub use commands::{inspect, run, run_command, Report};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{render, write_report};
