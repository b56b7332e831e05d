//! Logging setup for the `pinned-tabs` binary.

use std::env;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter (e.g. `debug`, `pinned_tabs=trace`).
pub const LOG_ENV: &str = "PINNED_TABS_LOG";

/// Filter used when `PINNED_TABS_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "warn";

/// Install a stderr `fmt` subscriber.
///
/// Stdout is reserved for command output. Calling this twice is harmless:
/// the second install is ignored.
pub fn init_logger() {
    let filter = env::var(LOG_ENV)
        .ok()
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .try_init();
}
