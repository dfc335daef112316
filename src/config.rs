//! Layered runtime configuration.
//!
//! Sources, highest priority first:
//!
//! 1. `TRIAGE_*` environment variables, with `__` separating sections
//!    (`TRIAGE_DATABASE__URL` sets `database.url`)
//! 2. The TOML file named by `TRIAGE_CONFIG`, or `triage.toml` in the
//!    working directory
//! 3. Built-in defaults

use std::time::Duration;

use camino::Utf8PathBuf;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::telemetry::LogFormat;

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "TRIAGE_CONFIG";

/// Configuration file read when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "triage.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge failed.
    #[error("configuration error: {0}")]
    Figment(Box<figment::Error>),

    /// A required section is missing values.
    #[error("configuration section '{section}' is not configured")]
    NotConfigured {
        /// Section name.
        section: &'static str,
    },

    /// A field holds an unusable value.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted field path.
        field: &'static str,
        /// Why the value was refused.
        reason: &'static str,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Storage settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Statistics sink settings.
    #[serde(default)]
    pub statistics: StatisticsConfig,
    /// Appointment notification settings.
    #[serde(default)]
    pub notification: NotificationConfig,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// `PostgreSQL` connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL. Empty until configured.
    pub url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
        }
    }
}

impl DatabaseConfig {
    /// Returns `true` once a URL has been supplied.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

/// File-backed statistics sink settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// Directory holding the sample log and the summary table.
    pub directory: Utf8PathBuf,
    /// Sample log file name, one JSON object per line.
    pub samples_file: Utf8PathBuf,
    /// Summary CSV file name.
    pub summary_file: Utf8PathBuf,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            directory: Utf8PathBuf::from("statistics"),
            samples_file: Utf8PathBuf::from("samples.jsonl"),
            summary_file: Utf8PathBuf::from("summary.csv"),
        }
    }
}

/// HTTP notifier settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Endpoint receiving appointment messages.
    pub endpoint: Option<String>,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_ms: 5_000,
        }
    }
}

impl NotificationConfig {
    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Line format.
    pub format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: "info".to_owned(),
        }
    }
}

impl TriageConfig {
    /// Loads and validates configuration from every source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when a source cannot be parsed, or
    /// [`ConfigError::InvalidValue`] when a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the provider chain without extracting it.
    #[must_use]
    pub fn figment() -> Figment {
        let file = Env::var(CONFIG_PATH_ENV).unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_owned());
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("TRIAGE_").ignore(&["config"]).split("__"))
    }

    /// Checks values the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.max_connections",
                reason: "must be at least 1",
            });
        }
        if self.notification.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "notification.timeout_ms",
                reason: "must be at least 1",
            });
        }
        if self.statistics.samples_file == self.statistics.summary_file {
            return Err(ConfigError::InvalidValue {
                field: "statistics.summary_file",
                reason: "must differ from statistics.samples_file",
            });
        }
        Ok(())
    }
}
