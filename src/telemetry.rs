//! Tracing subscriber installation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, filter::ParseError, fmt};

use crate::config::LoggingConfig;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured filter directive does not parse.
    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),

    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter when set.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] for a malformed configured
/// filter, or [`TelemetryError::Install`] when a subscriber already exists.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.filter))?;
    let subscriber = fmt().with_env_filter(env_filter);

    match config.format {
        LogFormat::Text => subscriber.try_init(),
        LogFormat::Json => subscriber.json().try_init(),
    }
    .map_err(|err| TelemetryError::Install(err.to_string()))
}
