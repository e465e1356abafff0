//! CLI command implementations
//!
//! Each command maps onto exactly one query operation. The store is opened
//! once, the command runs, and the store is closed on every path before any
//! error is reported.
//!
//! Only a scanning command under `RepairPolicy::Delete` opens the store for
//! writing. Everything else reads it without touching its files, so the
//! producer can keep using a store the inspector only looked at.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, warn};

use crate::observability;
use crate::query::{Scanned, TokenMapMetadata, TokenMapQuery, TokenMapView};
use crate::storage::{RepairPolicy, StoreHandle, TokenMapItem};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_report;

/// Result of one command, ready for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    All(TokenMapView),
    Chain {
        root_chain_type: String,
        items: Scanned<Vec<TokenMapItem>>,
    },
    Token {
        root_chain_type: String,
        root_token: String,
        item: Option<TokenMapItem>,
    },
    Keys(Vec<String>),
    Metadata(TokenMapMetadata),
    Count(Scanned<BTreeMap<String, usize>>),
}

impl Report {
    /// Invalid entries reported by the scan behind this report
    fn repair_count(&self) -> usize {
        match self {
            Report::All(view) => view.repairs.len(),
            Report::Chain { items, .. } => items.repairs.len(),
            Report::Count(counts) => counts.repairs.len(),
            Report::Token { .. } | Report::Keys(_) | Report::Metadata(_) => 0,
        }
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    let config = Config::load_or_default(cli.config.as_deref())?;
    observability::init_logging(&config.log_filter);

    let policy = if cli.no_repair {
        RepairPolicy::ReportOnly
    } else {
        config.repair_policy()
    };

    let report = inspect(&cli.db_path, &config, policy, &cli.command())?;
    write_report(&report, cli.format)
}

/// Open the store, run one command, close the store
pub fn inspect(
    db_path: &Path,
    config: &Config,
    policy: RepairPolicy,
    command: &Command,
) -> CliResult<Report> {
    let options = config.store_options();
    let store = if policy == RepairPolicy::Delete && command.scans() {
        StoreHandle::open(db_path, &options)
    } else {
        StoreHandle::open_read_only(db_path, &options)
    }
    .map_err(|e| CliError::store_unavailable(&e))?;

    let mut query = TokenMapQuery::with_policy(store, policy);
    let result = run_command(&mut query, command);
    let closed = query.close();

    let report = result?;
    closed?;

    if report.repair_count() > 0 {
        warn!(
            invalid = report.repair_count(),
            policy = ?policy,
            "invalid token map entries encountered"
        );
    }

    Ok(report)
}

/// Run a command against an opened query handle
pub fn run_command(query: &mut TokenMapQuery, command: &Command) -> CliResult<Report> {
    info!(command = ?command, "running command");

    let report = match command {
        Command::All => Report::All(query.list_all()?),
        Command::Chain { root_chain_type } => Report::Chain {
            root_chain_type: root_chain_type.clone(),
            items: query.list_by_chain(root_chain_type)?,
        },
        Command::Token {
            root_chain_type,
            root_token,
        } => Report::Token {
            root_chain_type: root_chain_type.clone(),
            root_token: root_token.clone(),
            item: query.get_one(root_chain_type, root_token)?,
        },
        Command::Keys => Report::Keys(query.list_keys()?),
        Command::Metadata => Report::Metadata(query.metadata()?),
        Command::Count => Report::Count(query.count_by_chain()?),
    };

    Ok(report)
}
