//! Task aggregate root and its lifecycle transitions.

use super::{TaskDomainError, TaskId, TaskStatus};
use crate::catalog::domain::{CaseId, ClusterId};
use crate::directory::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated caller input for a new task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    title: String,
    description: String,
    average_duration: f64,
}

impl TaskDraft {
    /// Validates the caller-supplied fields of a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for a blank title or
    /// [`TaskDomainError::InvalidAverageDuration`] for a negative or
    /// non-finite duration snapshot.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        average_duration: f64,
    ) -> Result<Self, TaskDomainError> {
        let raw_title = title.into();
        let trimmed = raw_title.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        if !average_duration.is_finite() || average_duration.is_sign_negative() {
            return Err(TaskDomainError::InvalidAverageDuration(average_duration));
        }
        Ok(Self {
            title: trimmed.to_owned(),
            description: description.into(),
            average_duration,
        })
    }
}

/// Reaction and resolution times measured when a task closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskTiming {
    /// Whole seconds from creation to the start of work.
    pub reaction_seconds: i64,
    /// Whole seconds from the start of work to closure.
    pub duration_seconds: i64,
}

/// Outcome of advancing a task by one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskTransition {
    /// Open to in progress; the acting user now owns the task.
    Started {
        /// New assignee.
        assignee: UserId,
    },
    /// In progress to closed.
    Closed {
        /// Measured timings.
        timing: TaskTiming,
    },
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    formed_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    case_id: Option<CaseId>,
    cluster_id: ClusterId,
    assignee: Option<UserId>,
    solution: Option<String>,
    average_duration: f64,
    fired: bool,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted start-of-work timestamp.
    pub formed_at: Option<DateTime<Utc>>,
    /// Persisted closure timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted case reference.
    pub case_id: Option<CaseId>,
    /// Persisted cluster reference.
    pub cluster_id: ClusterId,
    /// Persisted assignee.
    pub assignee: Option<UserId>,
    /// Persisted solution text.
    pub solution: Option<String>,
    /// Persisted average-duration snapshot in seconds.
    pub average_duration: f64,
    /// Persisted escalation flag.
    pub fired: bool,
}

impl Task {
    /// Opens a new task in the given cluster.
    #[must_use]
    pub fn open(draft: TaskDraft, cluster_id: ClusterId, clock: &impl Clock) -> Self {
        Self {
            id: TaskId::new(),
            title: draft.title,
            description: draft.description,
            status: TaskStatus::Open,
            created_at: clock.utc(),
            formed_at: None,
            completed_at: None,
            case_id: None,
            cluster_id,
            assignee: None,
            solution: None,
            average_duration: draft.average_duration,
            fired: false,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            created_at: data.created_at,
            formed_at: data.formed_at,
            completed_at: data.completed_at,
            case_id: data.case_id,
            cluster_id: data.cluster_id,
            assignee: data.assignee,
            solution: data.solution,
            average_duration: data.average_duration,
            fired: data.fired,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when work started, if it has.
    #[must_use]
    pub const fn formed_at(&self) -> Option<DateTime<Utc>> {
        self.formed_at
    }

    /// Returns when the task was closed, if it was.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the attached case, if any.
    #[must_use]
    pub const fn case_id(&self) -> Option<CaseId> {
        self.case_id
    }

    /// Returns the owning cluster.
    #[must_use]
    pub const fn cluster_id(&self) -> ClusterId {
        self.cluster_id
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    /// Returns the solution text, if any.
    #[must_use]
    pub fn solution(&self) -> Option<&str> {
        self.solution.as_deref()
    }

    /// Returns the average-duration snapshot in seconds.
    #[must_use]
    pub const fn average_duration(&self) -> f64 {
        self.average_duration
    }

    /// Returns `true` once the task has been escalated.
    #[must_use]
    pub const fn is_fired(&self) -> bool {
        self.fired
    }

    /// Advances the task by exactly one status on behalf of `actor`.
    ///
    /// Starting binds `actor` as assignee and stamps `formed_at`. Closing
    /// stamps `completed_at` and reports the measured timings.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] for a closed task.
    pub fn advance(
        &mut self,
        actor: UserId,
        clock: &impl Clock,
    ) -> Result<TaskTransition, TaskDomainError> {
        match self.status {
            TaskStatus::Open => {
                self.start(actor, clock)?;
                Ok(TaskTransition::Started { assignee: actor })
            }
            TaskStatus::InProgress => {
                let timing = self.close(clock)?;
                Ok(TaskTransition::Closed { timing })
            }
            TaskStatus::Closed => Err(self.invalid_transition()),
        }
    }

    /// Binds an automatically chosen user and starts work.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyAssigned`] when the task has an
    /// assignee, or [`TaskDomainError::InvalidStateTransition`] when the task
    /// is not open. The task is unchanged on error.
    pub fn appoint(&mut self, user: UserId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_unassigned()?;
        self.start(user, clock)
    }

    /// Fails when the task already has an assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyAssigned`] naming the assignee.
    pub const fn ensure_unassigned(&self) -> Result<(), TaskDomainError> {
        match self.assignee {
            Some(assignee) => Err(TaskDomainError::AlreadyAssigned {
                task_id: self.id,
                assignee,
            }),
            None => Ok(()),
        }
    }

    /// Attaches a case, replacing any previous one.
    pub const fn attach_case(&mut self, case_id: CaseId) {
        self.case_id = Some(case_id);
    }

    /// Detaches the case, if any.
    pub const fn detach_case(&mut self) {
        self.case_id = None;
    }

    /// Records solution text, replacing any previous text.
    pub fn set_solution(&mut self, solution: impl Into<String>) {
        self.solution = Some(solution.into());
    }

    /// Clears the solution text.
    pub fn clear_solution(&mut self) {
        self.solution = None;
    }

    /// Marks the task as escalated. Repeated calls have no further effect.
    pub const fn fire(&mut self) {
        self.fired = true;
    }

    fn start(&mut self, assignee: UserId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.status != TaskStatus::Open {
            return Err(self.invalid_transition());
        }
        self.assignee = Some(assignee);
        self.formed_at = Some(clock.utc());
        self.status = TaskStatus::InProgress;
        Ok(())
    }

    fn close(&mut self, clock: &impl Clock) -> Result<TaskTiming, TaskDomainError> {
        if self.status != TaskStatus::InProgress {
            return Err(self.invalid_transition());
        }
        let completed_at = clock.utc();
        let formed_at = self.formed_at.unwrap_or(self.created_at);
        self.completed_at = Some(completed_at);
        self.status = TaskStatus::Closed;
        Ok(TaskTiming {
            reaction_seconds: formed_at.signed_duration_since(self.created_at).num_seconds(),
            duration_seconds: completed_at.signed_duration_since(formed_at).num_seconds(),
        })
    }

    const fn invalid_transition(&self) -> TaskDomainError {
        TaskDomainError::InvalidStateTransition {
            task_id: self.id,
            from: self.status,
        }
    }
}
