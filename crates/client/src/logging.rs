//! Tracing subscriber setup for the demo binary.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber, honoring `RUST_LOG` with an `info`
/// default.
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))?;

    Ok(())
}
