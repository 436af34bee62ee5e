//! Logging initialization
//!
//! Sets up the tracing subscriber with an env-filter. The default level
//! is `info` and can be overridden via `RUST_LOG`.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber
///
/// # Errors
/// Returns an error if a global subscriber has already been installed.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()?;

    Ok(())
}
