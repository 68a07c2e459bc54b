//! Diagnostic logging.
//!
//! Logs go to stderr so they never mix with tables printed on stdout.
//! `RUST_LOG` overrides the level picked by the command.

use tracing_subscriber::{EnvFilter, fmt};

/// Level used by one-shot commands, which print their own output.
pub const QUIET_LEVEL: &str = "warn";

/// Level used by the long running `run` command.
pub const DAEMON_LEVEL: &str = "info";

/// Installs the global subscriber. Does nothing if one is already set.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", crate_target(), default_level)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn crate_target() -> String {
    env!("CARGO_PKG_NAME").replace('-', "_")
}
