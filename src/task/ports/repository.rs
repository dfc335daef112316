//! Repository port for task persistence and listings.

use crate::directory::domain::UserId;
use crate::task::domain::{Task, TaskId, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Listings return tasks in creation order.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Overwrites an existing task. The last write wins.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every task in the given status.
    async fn list_by_status(&self, status: TaskStatus) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the tasks assigned to `user` in the given status.
    async fn list_by_assignee(
        &self,
        user: UserId,
        status: TaskStatus,
    ) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
