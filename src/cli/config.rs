//! Optional JSON configuration file
//!
//! ```json
//! { "repair": true, "max_open_files": 64, "paranoid_checks": false, "log_filter": "warn" }
//! ```
//!
//! Every field is optional. Command-line flags override the file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::storage::{RepairPolicy, StoreOptions};

use super::errors::{CliError, CliResult};

/// Inspector configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Delete invalid entries found while scanning (default true)
    #[serde(default = "default_repair")]
    pub repair: bool,

    /// Table files the store may hold open, -1 for unlimited (default 64)
    #[serde(default = "default_max_open_files")]
    pub max_open_files: i32,

    /// Aggressive checksum verification (default false)
    #[serde(default)]
    pub paranoid_checks: bool,

    /// Log filter used when RUST_LOG is unset (default "warn")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_repair() -> bool {
    true
}
fn default_max_open_files() -> i32 {
    64
}
fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repair: default_repair(),
            max_open_files: default_max_open_files(),
            paranoid_checks: false,
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.max_open_files != -1 && self.max_open_files < 16 {
            return Err(CliError::config_error(format!(
                "Invalid max_open_files: {}. Must be -1 or at least 16.",
                self.max_open_files
            )));
        }

        if self.log_filter.trim().is_empty() {
            return Err(CliError::config_error("log_filter must not be empty"));
        }

        Ok(())
    }

    /// Store tunables
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            max_open_files: self.max_open_files,
            paranoid_checks: self.paranoid_checks,
        }
    }

    /// Repair policy for scans
    pub fn repair_policy(&self) -> RepairPolicy {
        if self.repair {
            RepairPolicy::Delete
        } else {
            RepairPolicy::ReportOnly
        }
    }
}
