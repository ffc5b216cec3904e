//! Tracing initialization.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber for library consumers and binaries.
///
/// Installs an fmt layer honoring the `RUST_LOG` environment variable.
/// Calling this twice returns an error from the underlying registry, so
/// binaries should call it exactly once at startup.
///
/// # Errors
///
/// Returns error if subscriber initialization fails.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
