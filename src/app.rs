//! Production wiring of the `PostgreSQL`-backed services.

use std::sync::Arc;

use mockable::DefaultClock;
use thiserror::Error;
use tracing::info;

use crate::analytics::{adapters::FileStatisticsSink, ports::StatisticsSinkError};
use crate::catalog::{
    adapters::postgres::{PostgresCaseRepository, PostgresClusterRepository},
    services::CatalogService,
};
use crate::config::{ConfigError, TriageConfig};
use crate::db::{self, DatabaseSetupError};
use crate::directory::{
    adapters::postgres::{PostgresLoadLedger, PostgresUserRepository},
    services::UserDirectoryService,
};
use crate::notification::{adapters::HttpNotifier, ports::NotifierError};
use crate::task::{adapters::postgres::PostgresTaskRepository, services::TaskLifecycleService};

/// Catalog service over `PostgreSQL`.
pub type PostgresCatalog =
    CatalogService<PostgresCaseRepository, PostgresClusterRepository, DefaultClock>;

/// Directory service over `PostgreSQL`.
pub type PostgresDirectory =
    UserDirectoryService<PostgresUserRepository, PostgresLoadLedger, DefaultClock>;

/// Lifecycle engine over `PostgreSQL`, the file sink and the HTTP notifier.
pub type PostgresLifecycle = TaskLifecycleService<
    PostgresTaskRepository,
    PostgresCatalog,
    PostgresDirectory,
    FileStatisticsSink,
    HttpNotifier,
    DefaultClock,
>;

/// Errors raised while assembling the application.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is incomplete or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The database could not be reached or prepared.
    #[error(transparent)]
    Database(#[from] DatabaseSetupError),

    /// The statistics directory could not be opened.
    #[error(transparent)]
    Statistics(#[from] StatisticsSinkError),

    /// The HTTP client could not be built.
    #[error(transparent)]
    Notifier(#[from] NotifierError),
}

/// Fully wired services sharing one connection pool.
pub struct TriageApp {
    catalog: Arc<PostgresCatalog>,
    directory: Arc<PostgresDirectory>,
    lifecycle: PostgresLifecycle,
}

impl TriageApp {
    /// Connects to storage, applies the schema and builds every service.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] (wrapped) when the database URL
    /// or notification endpoint is missing, or the first setup error.
    pub async fn connect(config: &TriageConfig) -> Result<Self, AppError> {
        if !config.database.is_configured() {
            return Err(ConfigError::NotConfigured {
                section: "database",
            }
            .into());
        }
        let endpoint = config
            .notification
            .endpoint
            .as_deref()
            .ok_or(ConfigError::NotConfigured {
                section: "notification",
            })?;

        let pool = db::connect(&config.database.url, config.database.max_connections)?;
        db::apply_migrations(&pool).await?;

        let clock = Arc::new(DefaultClock);
        let catalog = Arc::new(CatalogService::new(
            Arc::new(PostgresCaseRepository::new(pool.clone())),
            Arc::new(PostgresClusterRepository::new(pool.clone())),
            Arc::clone(&clock),
        ));
        let directory = Arc::new(UserDirectoryService::new(
            Arc::new(PostgresUserRepository::new(pool.clone())),
            Arc::new(PostgresLoadLedger::new(pool.clone())),
            Arc::clone(&clock),
        ));
        let statistics = FileStatisticsSink::open(
            &config.statistics.directory,
            config.statistics.samples_file.clone(),
            config.statistics.summary_file.clone(),
        )?;
        let notifier = HttpNotifier::new(endpoint, config.notification.timeout())?;
        let lifecycle = TaskLifecycleService::new(
            Arc::new(PostgresTaskRepository::new(pool)),
            Arc::clone(&catalog),
            Arc::clone(&directory),
            Arc::new(statistics),
            Arc::new(notifier),
            clock,
        );

        info!(statistics_dir = %config.statistics.directory, "triage services ready");
        Ok(Self {
            catalog,
            directory,
            lifecycle,
        })
    }

    /// Returns the catalog service.
    #[must_use]
    pub const fn catalog(&self) -> &Arc<PostgresCatalog> {
        &self.catalog
    }

    /// Returns the directory service.
    #[must_use]
    pub const fn directory(&self) -> &Arc<PostgresDirectory> {
        &self.directory
    }

    /// Returns the lifecycle engine.
    #[must_use]
    pub const fn lifecycle(&self) -> &PostgresLifecycle {
        &self.lifecycle
    }
}
