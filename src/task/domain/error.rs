//! Error types for task domain validation, transitions and parsing.

use super::{TaskId, TaskStatus};
use crate::directory::domain::UserId;
use thiserror::Error;

/// Errors returned while constructing or mutating tasks.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The average-duration snapshot is negative, NaN or infinite.
    #[error("average duration must be a finite, non-negative number of seconds, got {0}")]
    InvalidAverageDuration(f64),

    /// The task cannot advance from its current status.
    #[error("task {task_id} cannot advance from {from}")]
    InvalidStateTransition {
        /// Task being advanced.
        task_id: TaskId,
        /// Status the task was in.
        from: TaskStatus,
    },

    /// The task already has an assignee.
    #[error("task {task_id} is already assigned to {assignee}")]
    AlreadyAssigned {
        /// Task being appointed.
        task_id: TaskId,
        /// Existing assignee.
        assignee: UserId,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
