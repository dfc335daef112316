//! Repository ports for users and their load ledger.

use crate::directory::domain::{LoadLedgerEntry, User, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory repository operations.
pub type DirectoryRepositoryResult<T> = Result<T, DirectoryRepositoryError>;

/// User persistence contract.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryRepositoryError::DuplicateUser`] when the identifier
    /// exists or [`DirectoryRepositoryError::DuplicateEmail`] when the email is
    /// taken.
    async fn store(&self, user: &User) -> DirectoryRepositoryResult<()>;

    /// Overwrites an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryRepositoryError::UserNotFound`] when the user does
    /// not exist.
    async fn update(&self, user: &User) -> DirectoryRepositoryResult<()>;

    /// Finds a user by identifier, including soft-deleted users.
    async fn find_by_id(&self, id: UserId) -> DirectoryRepositoryResult<Option<User>>;

    /// Returns every user ordered by identifier.
    async fn list_all(&self) -> DirectoryRepositoryResult<Vec<User>>;

    /// Returns the active user with the smallest running average, breaking
    /// ties by lowest identifier.
    async fn find_least_loaded(&self) -> DirectoryRepositoryResult<Option<User>>;
}

/// Append-only store of load changes.
#[async_trait]
pub trait LoadLedger: Send + Sync {
    /// Appends an entry.
    async fn append(&self, entry: &LoadLedgerEntry) -> DirectoryRepositoryResult<()>;

    /// Returns a user's entries in recording order.
    async fn entries_for(&self, user_id: UserId) -> DirectoryRepositoryResult<Vec<LoadLedgerEntry>>;
}

/// Errors returned by directory repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryRepositoryError {
    /// A user with the same identifier already exists.
    #[error("duplicate user identifier: {0}")]
    DuplicateUser(UserId),

    /// Another user already owns the email address.
    #[error("duplicate user email: {0}")]
    DuplicateEmail(String),

    /// The user was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
