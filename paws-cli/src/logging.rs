//! Logging setup
//!
//! Structured `tracing` output on stderr, filtered by `RUST_LOG` or the
//! `--log-level` flag.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging to stderr
///
/// Uses the `RUST_LOG` env var if set, otherwise falls back to the provided
/// level. Stdout is left to command output.
pub fn init(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
