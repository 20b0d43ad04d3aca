//! Logging initialization.
//!
//! Installs a `tracing` subscriber with an environment-driven filter.
//! The filter honors `RUST_LOG` and defaults to `info` when unset, so
//! per-stage `debug` events stay quiet unless asked for.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. Call once at startup;
/// later calls fail because a global subscriber is already set.
pub fn init_subscriber() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()?;

    Ok(())
}
