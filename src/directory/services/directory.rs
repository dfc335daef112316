//! Service layer for user lookup and running-average bookkeeping.

use crate::directory::{
    domain::{DirectoryDomainError, LoadChange, LoadLedgerEntry, User, UserId, fold_ledger},
    ports::{DirectoryRepositoryError, LoadLedger, UserRepository},
};
use crate::error::ErrorKind;
use crate::task::domain::TaskId;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

/// Service-level errors for directory operations.
#[derive(Debug, Error)]
pub enum UserDirectoryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DirectoryDomainError),

    /// No user exists with the given identifier.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// No active user is available.
    #[error("no active user is available")]
    NoEligibleUser,

    /// Repository operation failed.
    #[error("{operation}: {source}")]
    Repository {
        /// Name of the failing directory operation.
        operation: &'static str,
        /// Underlying repository error.
        #[source]
        source: DirectoryRepositoryError,
    },
}

impl UserDirectoryError {
    /// Wraps a repository error with the failing operation name.
    #[must_use]
    pub const fn repository(operation: &'static str, source: DirectoryRepositoryError) -> Self {
        Self::Repository { operation, source }
    }

    /// Classifies the error into the crate-wide taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::InvalidInput,
            Self::UserNotFound(_) => ErrorKind::NotFound,
            Self::NoEligibleUser => ErrorKind::NoEligibleUser,
            Self::Repository { source, .. } => match source {
                DirectoryRepositoryError::DuplicateUser(_)
                | DirectoryRepositoryError::DuplicateEmail(_) => ErrorKind::Duplicate,
                DirectoryRepositoryError::UserNotFound(_) => ErrorKind::NotFound,
                DirectoryRepositoryError::Persistence(_) => ErrorKind::Dependency,
            },
        }
    }
}

/// Result type for directory service operations.
pub type UserDirectoryResult<T> = Result<T, UserDirectoryError>;

/// User lookup and load bookkeeping service.
#[derive(Clone)]
pub struct UserDirectoryService<U, L, C>
where
    U: UserRepository,
    L: LoadLedger,
    C: Clock + Send + Sync,
{
    users: Arc<U>,
    ledger: Arc<L>,
    clock: Arc<C>,
}

impl<U, L, C> UserDirectoryService<U, L, C>
where
    U: UserRepository,
    L: LoadLedger,
    C: Clock + Send + Sync,
{
    /// Creates a new directory service.
    #[must_use]
    pub const fn new(users: Arc<U>, ledger: Arc<L>, clock: Arc<C>) -> Self {
        Self {
            users,
            ledger,
            clock,
        }
    }

    /// Finds a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Repository`] when lookup fails.
    pub async fn find_user(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        self.users
            .find_by_id(id)
            .await
            .map_err(|source| UserDirectoryError::repository("find_user", source))
    }

    /// Returns a user or a not-found error.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::UserNotFound`] or a repository error.
    pub async fn get_user(&self, id: UserId) -> UserDirectoryResult<User> {
        self.find_user(id)
            .await?
            .ok_or(UserDirectoryError::UserNotFound(id))
    }

    /// Lists every user, including soft-deleted ones.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Repository`] when lookup fails.
    pub async fn list_users(&self) -> UserDirectoryResult<Vec<User>> {
        self.users
            .list_all()
            .await
            .map_err(|source| UserDirectoryError::repository("list_users", source))
    }

    /// Returns the active user with the smallest running average.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::NoEligibleUser`] when no active user
    /// exists, or a repository error.
    pub async fn user_with_minimum_average_duration(&self) -> UserDirectoryResult<User> {
        self.users
            .find_least_loaded()
            .await
            .map_err(|source| {
                UserDirectoryError::repository("user_with_minimum_average_duration", source)
            })?
            .ok_or(UserDirectoryError::NoEligibleUser)
    }

    /// Overwrites a user's running average and records the reset.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::UserNotFound`], a domain error for a
    /// non-finite value, or a repository error.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn update_average_duration(&self, id: UserId, value: f64) -> UserDirectoryResult<User> {
        const OPERATION: &str = "update_average_duration";
        let mut user = self.get_user(id).await?;
        user.set_average_duration(value)?;

        let entry = LoadLedgerEntry::record(id, None, LoadChange::Reset(value), &*self.clock);
        self.ledger
            .append(&entry)
            .await
            .map_err(|source| UserDirectoryError::repository(OPERATION, source))?;
        self.users
            .update(&user)
            .await
            .map_err(|source| UserDirectoryError::repository(OPERATION, source))?;
        Ok(user)
    }

    /// Shifts a user's running average by `delta` on behalf of a task.
    ///
    /// The ledger is folded after the new entry is appended and the result is
    /// written back to the user record. A user without ledger history is first
    /// seeded with a reset to their stored value.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::UserNotFound`], a domain error when the
    /// folded value is not finite, or a repository error.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn adjust_load(
        &self,
        id: UserId,
        task_id: Option<TaskId>,
        delta: f64,
    ) -> UserDirectoryResult<User> {
        const OPERATION: &str = "adjust_load";
        let mut user = self.get_user(id).await?;
        let mut entries = self
            .ledger
            .entries_for(id)
            .await
            .map_err(|source| UserDirectoryError::repository(OPERATION, source))?;

        if entries.is_empty() {
            let seed = LoadLedgerEntry::record(
                id,
                None,
                LoadChange::Reset(user.average_duration()),
                &*self.clock,
            );
            self.ledger
                .append(&seed)
                .await
                .map_err(|source| UserDirectoryError::repository(OPERATION, source))?;
            entries.push(seed);
        }

        let entry = LoadLedgerEntry::record(id, task_id, LoadChange::Adjust(delta), &*self.clock);
        self.ledger
            .append(&entry)
            .await
            .map_err(|source| UserDirectoryError::repository(OPERATION, source))?;
        entries.push(entry);

        let folded = fold_ledger(&entries);
        user.set_average_duration(folded)?;
        self.users
            .update(&user)
            .await
            .map_err(|source| UserDirectoryError::repository(OPERATION, source))?;
        debug!(average_duration = folded, "running average adjusted");
        Ok(user)
    }

    /// Returns a user's ledger in recording order.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Repository`] when lookup fails.
    pub async fn load_history(&self, id: UserId) -> UserDirectoryResult<Vec<LoadLedgerEntry>> {
        self.ledger
            .entries_for(id)
            .await
            .map_err(|source| UserDirectoryError::repository("load_history", source))
    }

    /// Soft-deletes a user so they are never appointed again.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::UserNotFound`] or a repository error.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn deactivate_user(&self, id: UserId) -> UserDirectoryResult<User> {
        let mut user = self.get_user(id).await?;
        user.deactivate();
        self.users
            .update(&user)
            .await
            .map_err(|source| UserDirectoryError::repository("deactivate_user", source))?;
        Ok(user)
    }
}
