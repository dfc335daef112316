//! Domain model for the support task lifecycle.
//!
//! A task moves Open → InProgress → Closed, one step per call. Starting work
//! binds an assignee and stamps `formed_at`; closing stamps `completed_at`
//! and yields the reaction and resolution timings fed to statistics.

mod error;
mod ids;
mod status;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use status::TaskStatus;
pub use task::{PersistedTaskData, Task, TaskDraft, TaskTiming, TaskTransition};
