//! Logging setup, following the same tracing/EnvFilter/fmt combination the
//! rest of the pack reaches for.

use tracing_subscriber::EnvFilter;

/// Initialise the global `tracing` subscriber. Safe to call more than once;
/// later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
