//! `PostgreSQL` connection pooling and schema bootstrap.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;

/// `PostgreSQL` connection pool shared by every repository adapter.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// SQL creating the support tables.
pub const CREATE_SUPPORT_TABLES_SQL: &str =
    include_str!("../migrations/2026-10-01-000000_create_support_tables/up.sql");

/// Errors raised while preparing the database.
#[derive(Debug, Error)]
pub enum DatabaseSetupError {
    /// The pool could not be built or a connection could not be checked out.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),

    /// Applying the schema failed.
    #[error("migration failed: {0}")]
    Migration(#[from] diesel::result::Error),

    /// The blocking worker panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Builds a connection pool for the given database URL.
///
/// # Errors
///
/// Returns [`DatabaseSetupError::Pool`] when the initial connections cannot
/// be established.
pub fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, DatabaseSetupError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder().max_size(max_connections).build(manager)?;
    Ok(pool)
}

/// Applies the support-table schema.
///
/// # Errors
///
/// Returns [`DatabaseSetupError`] when no connection is available or the
/// schema statements fail.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), DatabaseSetupError> {
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || -> Result<(), DatabaseSetupError> {
        let mut connection = pool.get()?;
        connection.batch_execute(CREATE_SUPPORT_TABLES_SQL)?;
        tracing::info!("support tables created");
        Ok(())
    })
    .await?
}
