//! Logging setup for the dashboard.
//!
//! Installs a global tracing subscriber writing to stdout. Failures are
//! returned so startup can degrade to stderr instead of aborting.

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt};

/// Errors that may occur while initializing logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to set the global tracing subscriber.
    #[error("failed to install global tracing subscriber: {0}")]
    SetGlobal(String),
}

/// Initialize tracing with an env-filter (`RUST_LOG`), defaulting to `info`.
pub fn init() -> Result<(), LoggingError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .try_init()
        .map_err(|err| LoggingError::SetGlobal(err.to_string()))
}
