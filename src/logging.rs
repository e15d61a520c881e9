//! Logging initialization.
//!
//! Diagnostics go through `tracing` to stderr. Stdout is reserved for the
//! progress lines and summary printed by [`output`](crate::output), so the
//! two never interleave in a pipe.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the global subscriber.
///
/// * `verbose` - DEBUG level (one line per written variant) instead of WARN.
/// * `json_format` - Structured JSON lines instead of human-readable text.
///
/// `RUST_LOG` overrides the level when set.
pub fn init(verbose: bool, json_format: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
