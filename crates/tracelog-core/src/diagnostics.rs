//! Operator diagnostics setup.
//!
//! tracelog reports its own trouble (unknown groups, failing sinks) through
//! `tracing`. Hosts that have no subscriber of their own can install this one.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count: 0=warn, 1=info, 2=debug, 3+=trace.
pub fn verbosity_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a stderr fmt subscriber. `RUST_LOG` wins over `verbosity`.
///
/// Returns `false` if a global subscriber was already set.
pub fn init_diagnostics(verbosity: u8) -> bool {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(verbosity_filter(verbosity))),
        )
        .try_init()
        .is_ok()
}
