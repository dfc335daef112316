//! Service layer for the support task lifecycle.

use crate::analytics::{
    domain::TimingSample,
    ports::{StatisticsSink, StatisticsSinkError},
};
use crate::catalog::{
    domain::{CaseId, ClusterId},
    services::{CatalogServiceError, ResolveClusterRequest},
};
use crate::directory::{
    domain::{User, UserId},
    services::UserDirectoryError,
};
use crate::error::ErrorKind;
use crate::notification::ports::Notifier;
use crate::task::{
    domain::{Task, TaskDomainError, TaskDraft, TaskId, TaskStatus, TaskTiming, TaskTransition},
    ports::{AgentDirectory, ClusterCatalog, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Request payload for opening a task.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    cluster_index: i64,
    cluster_name: String,
    frequency: u64,
    average_duration: f64,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    ///
    /// `cluster_name` is only used when the cluster index has not been seen
    /// before.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        cluster_index: i64,
        cluster_name: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            cluster_index,
            cluster_name: cluster_name.into(),
            frequency: 0,
            average_duration: 0.0,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the frequency recorded on a newly created cluster.
    #[must_use]
    pub const fn with_frequency(mut self, frequency: u64) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the expected handling time snapshot in seconds.
    #[must_use]
    pub const fn with_average_duration(mut self, average_duration: f64) -> Self {
        self.average_duration = average_duration;
        self
    }
}

/// What happened to the appointment notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// The notifier accepted the message.
    Delivered,
    /// The assignee has no telegram handle.
    Skipped,
    /// Delivery failed; the appointment still stands.
    Failed(String),
}

/// Result of an automatic appointment.
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    /// The task after appointment.
    pub task: Task,
    /// The appointed user with their updated running average.
    pub assignee: User,
    /// Notification result.
    pub notification: NotificationOutcome,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or transition rule failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    /// No user exists with the given identifier.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// No case exists with the given identifier.
    #[error("case {0} not found")]
    CaseNotFound(CaseId),

    /// The task references a cluster that no longer exists.
    #[error("cluster {0} not found")]
    ClusterNotFound(ClusterId),

    /// Task repository operation failed.
    #[error("{operation}: {source}")]
    Repository {
        /// Name of the failing lifecycle operation.
        operation: &'static str,
        /// Underlying repository error.
        #[source]
        source: TaskRepositoryError,
    },

    /// Catalog operation failed.
    #[error("{operation}: {source}")]
    Catalog {
        /// Name of the failing lifecycle operation.
        operation: &'static str,
        /// Underlying catalog error.
        #[source]
        source: CatalogServiceError,
    },

    /// Directory operation failed.
    #[error("{operation}: {source}")]
    Directory {
        /// Name of the failing lifecycle operation.
        operation: &'static str,
        /// Underlying directory error.
        #[source]
        source: UserDirectoryError,
    },

    /// Statistics sink operation failed.
    #[error("{operation}: {source}")]
    Statistics {
        /// Name of the failing lifecycle operation.
        operation: &'static str,
        /// Underlying sink error.
        #[source]
        source: StatisticsSinkError,
    },
}

impl TaskLifecycleError {
    /// Classifies the error into the crate-wide taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(domain) => match domain {
                TaskDomainError::EmptyTitle | TaskDomainError::InvalidAverageDuration(_) => {
                    ErrorKind::InvalidInput
                }
                TaskDomainError::InvalidStateTransition { .. } => ErrorKind::InvalidState,
                TaskDomainError::AlreadyAssigned { .. } => ErrorKind::AlreadyAssigned,
            },
            Self::TaskNotFound(_)
            | Self::UserNotFound(_)
            | Self::CaseNotFound(_)
            | Self::ClusterNotFound(_) => ErrorKind::NotFound,
            Self::Repository { source, .. } => match source {
                TaskRepositoryError::DuplicateTask(_) => ErrorKind::Duplicate,
                TaskRepositoryError::NotFound(_) => ErrorKind::NotFound,
                TaskRepositoryError::Persistence(_) => ErrorKind::Dependency,
            },
            Self::Catalog { source, .. } => match source.kind() {
                ErrorKind::InvalidInput => ErrorKind::InvalidInput,
                _ => ErrorKind::Dependency,
            },
            Self::Directory { source, .. } => match source.kind() {
                ErrorKind::NoEligibleUser => ErrorKind::NoEligibleUser,
                ErrorKind::NotFound => ErrorKind::NotFound,
                _ => ErrorKind::Dependency,
            },
            Self::Statistics { .. } => ErrorKind::Dependency,
        }
    }

    const fn repository(operation: &'static str, source: TaskRepositoryError) -> Self {
        Self::Repository { operation, source }
    }

    const fn catalog(operation: &'static str, source: CatalogServiceError) -> Self {
        Self::Catalog { operation, source }
    }

    const fn directory(operation: &'static str, source: UserDirectoryError) -> Self {
        Self::Directory { operation, source }
    }

    const fn statistics(operation: &'static str, source: StatisticsSinkError) -> Self {
        Self::Statistics { operation, source }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Generic over its task repository `R`, cluster catalog `K`, agent
/// directory `D`, statistics sink `S`, notifier `N` and clock `C`.
#[derive(Clone)]
pub struct TaskLifecycleService<R, K, D, S, N, C>
where
    R: TaskRepository,
    K: ClusterCatalog,
    D: AgentDirectory,
    S: StatisticsSink,
    N: Notifier,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    catalog: Arc<K>,
    directory: Arc<D>,
    statistics: Arc<S>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<R, K, D, S, N, C> TaskLifecycleService<R, K, D, S, N, C>
where
    R: TaskRepository,
    K: ClusterCatalog,
    D: AgentDirectory,
    S: StatisticsSink,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        catalog: Arc<K>,
        directory: Arc<D>,
        statistics: Arc<S>,
        notifier: Arc<N>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            catalog,
            directory,
            statistics,
            notifier,
            clock,
        }
    }

    /// Opens a task, creating its cluster on first reference.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for a blank title or invalid
    /// duration snapshot, [`TaskLifecycleError::Catalog`] when the cluster
    /// cannot be resolved, or a repository error.
    #[instrument(skip(self, request), fields(cluster_index = request.cluster_index))]
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        const OPERATION: &str = "create_task";
        let CreateTaskRequest {
            title,
            description,
            cluster_index,
            cluster_name,
            frequency,
            average_duration,
        } = request;
        let draft = TaskDraft::new(title, description, average_duration)?;

        let cluster = self
            .catalog
            .resolve_or_create_cluster(ResolveClusterRequest::new(
                cluster_index,
                cluster_name,
                frequency,
            ))
            .await
            .map_err(|source| TaskLifecycleError::catalog(OPERATION, source))?;

        let task = Task::open(draft, cluster.id(), &*self.clock);
        self.repository
            .store(&task)
            .await
            .map_err(|source| TaskLifecycleError::repository(OPERATION, source))?;
        info!(task_id = %task.id(), "task opened");
        Ok(task)
    }

    /// Returns a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] or a repository error.
    pub async fn get_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await
            .map_err(|source| TaskLifecycleError::repository("get_task", source))?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }

    /// Advances a task by one status on behalf of `actor`.
    ///
    /// Starting work adds the task's duration snapshot to `actor`'s running
    /// average and binds them. Closing records a timing sample, recomputes the
    /// statistics and releases the snapshot from the assignee. The task is
    /// written last, so a failed side effect leaves it as stored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`],
    /// [`TaskLifecycleError::UserNotFound`], a domain error for a closed task,
    /// or a dependency error.
    #[instrument(skip(self), fields(task_id = %task_id, user_id = %actor))]
    pub async fn change_task_status(
        &self,
        task_id: TaskId,
        actor: UserId,
    ) -> TaskLifecycleResult<Task> {
        const OPERATION: &str = "change_task_status";
        let mut task = self.get_task(task_id).await?;
        self.directory
            .find_user(actor)
            .await
            .map_err(|source| TaskLifecycleError::directory(OPERATION, source))?
            .ok_or(TaskLifecycleError::UserNotFound(actor))?;

        match task.advance(actor, &*self.clock)? {
            TaskTransition::Started { assignee } => {
                self.directory
                    .take_load(assignee, task_id, task.average_duration())
                    .await
                    .map_err(|source| TaskLifecycleError::directory(OPERATION, source))?;
                self.persist(&task, OPERATION).await?;
                info!("task started");
            }
            TaskTransition::Closed { timing } => {
                self.record_closure(&task, timing).await?;
                if let Some(assignee) = task.assignee() {
                    self.directory
                        .release_load(assignee, task_id, task.average_duration())
                        .await
                        .map_err(|source| TaskLifecycleError::directory(OPERATION, source))?;
                }
                self.persist(&task, OPERATION).await?;
                info!(
                    reaction_seconds = timing.reaction_seconds,
                    duration_seconds = timing.duration_seconds,
                    "task closed"
                );
            }
        }
        Ok(task)
    }

    /// Attaches a case to a task in any status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`],
    /// [`TaskLifecycleError::CaseNotFound`] or a dependency error.
    #[instrument(skip(self), fields(task_id = %task_id, case_id = %case_id))]
    pub async fn add_case_to_task(
        &self,
        task_id: TaskId,
        case_id: CaseId,
    ) -> TaskLifecycleResult<Task> {
        const OPERATION: &str = "add_case_to_task";
        let mut task = self.get_task(task_id).await?;
        self.catalog
            .find_case(case_id)
            .await
            .map_err(|source| TaskLifecycleError::catalog(OPERATION, source))?
            .ok_or(TaskLifecycleError::CaseNotFound(case_id))?;

        task.attach_case(case_id);
        self.persist(&task, OPERATION).await?;
        Ok(task)
    }

    /// Detaches the case from a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] or a repository error.
    #[instrument(skip(self), fields(task_id = %task_id))]
    pub async fn remove_case_from_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.get_task(task_id).await?;
        task.detach_case();
        self.persist(&task, "remove_case_from_task").await?;
        Ok(task)
    }

    /// Records solution text on a task in any status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] or a repository error.
    #[instrument(skip(self, solution), fields(task_id = %task_id))]
    pub async fn add_solution_to_task(
        &self,
        task_id: TaskId,
        solution: impl Into<String> + Send,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.get_task(task_id).await?;
        task.set_solution(solution);
        self.persist(&task, "add_solution_to_task").await?;
        Ok(task)
    }

    /// Clears a task's solution text.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] or a repository error.
    #[instrument(skip(self), fields(task_id = %task_id))]
    pub async fn remove_solution_from_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.get_task(task_id).await?;
        task.clear_solution();
        self.persist(&task, "remove_solution_from_task").await?;
        Ok(task)
    }

    /// Appoints the least-loaded active user to an unassigned task.
    ///
    /// The user's running average is updated and the task persisted before
    /// the notifier is called. Notification failure is logged and reported in
    /// the returned [`Appointment`] but never undoes the appointment.
    ///
    /// # Errors
    ///
    /// Returns a domain error of kind [`ErrorKind::AlreadyAssigned`] when the
    /// task has an assignee (the task is unchanged), a directory error of kind
    /// [`ErrorKind::NoEligibleUser`] when nobody is active,
    /// [`TaskLifecycleError::TaskNotFound`], or a dependency error.
    #[instrument(skip(self), fields(task_id = %task_id))]
    pub async fn appoint_user_to_task(&self, task_id: TaskId) -> TaskLifecycleResult<Appointment> {
        const OPERATION: &str = "appoint_user_to_task";
        let mut task = self.get_task(task_id).await?;
        task.ensure_unassigned()?;

        let candidate = self
            .directory
            .least_loaded_user()
            .await
            .map_err(|source| TaskLifecycleError::directory(OPERATION, source))?;
        task.appoint(candidate.id(), &*self.clock)?;

        let assignee = self
            .directory
            .take_load(candidate.id(), task_id, task.average_duration())
            .await
            .map_err(|source| TaskLifecycleError::directory(OPERATION, source))?;
        self.persist(&task, OPERATION).await?;
        info!(user_id = %assignee.id(), "user appointed");

        let notification = self.notify_assignee(&assignee).await;
        Ok(Appointment {
            task,
            assignee,
            notification,
        })
    }

    /// Marks a task as escalated. Idempotent; allowed in any status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] or a repository error.
    #[instrument(skip(self), fields(task_id = %task_id))]
    pub async fn fire_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.get_task(task_id).await?;
        task.fire();
        self.persist(&task, "fire_task").await?;
        Ok(task)
    }

    /// Lists tasks in a status, in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn list_tasks(&self, status: TaskStatus) -> TaskLifecycleResult<Vec<Task>> {
        self.repository
            .list_by_status(status)
            .await
            .map_err(|source| TaskLifecycleError::repository("list_tasks", source))
    }

    /// Lists a user's tasks in a status, in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn list_tasks_by_user(
        &self,
        user: UserId,
        status: TaskStatus,
    ) -> TaskLifecycleResult<Vec<Task>> {
        self.repository
            .list_by_assignee(user, status)
            .await
            .map_err(|source| TaskLifecycleError::repository("list_tasks_by_user", source))
    }

    async fn persist(&self, task: &Task, operation: &'static str) -> TaskLifecycleResult<()> {
        self.repository
            .update(task)
            .await
            .map_err(|source| TaskLifecycleError::repository(operation, source))
    }

    async fn record_closure(&self, task: &Task, timing: TaskTiming) -> TaskLifecycleResult<()> {
        const OPERATION: &str = "change_task_status";
        let cluster = self
            .catalog
            .find_cluster(task.cluster_id())
            .await
            .map_err(|source| TaskLifecycleError::catalog(OPERATION, source))?
            .ok_or(TaskLifecycleError::ClusterNotFound(task.cluster_id()))?;

        let sample = TimingSample::new(
            cluster.index(),
            timing.reaction_seconds,
            timing.duration_seconds,
        );
        self.statistics
            .append_sample(&sample)
            .await
            .map_err(|source| TaskLifecycleError::statistics(OPERATION, source))?;
        self.statistics
            .recompute_aggregate()
            .await
            .map_err(|source| TaskLifecycleError::statistics(OPERATION, source))?;
        Ok(())
    }

    async fn notify_assignee(&self, assignee: &User) -> NotificationOutcome {
        let Some(handle) = assignee.telegram_handle() else {
            return NotificationOutcome::Skipped;
        };
        match self.notifier.notify(handle).await {
            Ok(()) => NotificationOutcome::Delivered,
            Err(err) => {
                warn!(user_id = %assignee.id(), error = %err, "appointment notification failed");
                NotificationOutcome::Failed(err.to_string())
            }
        }
    }
}
