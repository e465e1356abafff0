//! Logging setup
//!
//! The library only emits `tracing` events. The binary installs a single
//! stderr subscriber so stdout stays reserved for query output.
//!
//! `RUST_LOG` takes precedence over the configured filter.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
