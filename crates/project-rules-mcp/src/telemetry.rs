//! Diagnostics go to stderr; stdout carries protocol traffic only.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter expression.
pub const LOG_ENV: &str = "PROJECT_RULES_LOG";

const DEFAULT_FILTER: &str = "warn";

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(String),
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(#[from] SetGlobalDefaultError),
}

/// Install the global subscriber. Later calls, including concurrent ones,
/// are no-ops once the first succeeds.
pub fn initialise() -> Result<(), TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(&filter_directives()))
        .map(|_| ())
}

fn filter_directives() -> String {
    std::env::var(LOG_ENV)
        .ok()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

fn install_subscriber(directives: &str) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_new(directives).map_err(|e| TelemetryError::Filter(e.to_string()))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
