//! Shared world state for task lifecycle BDD scenarios.

use std::sync::Arc;

use triage::analytics::adapters::InMemoryStatisticsSink;
use triage::catalog::{
    adapters::memory::{InMemoryCaseRepository, InMemoryClusterRepository},
    domain::Case,
    services::CatalogService,
};
use triage::directory::{
    adapters::memory::{InMemoryLoadLedger, InMemoryUserRepository},
    domain::User,
    services::UserDirectoryService,
};
use triage::notification::adapters::RecordingNotifier;
use triage::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::Task,
    services::{Appointment, TaskLifecycleError, TaskLifecycleService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Catalog type used by the BDD world.
pub type TestCatalog =
    CatalogService<InMemoryCaseRepository, InMemoryClusterRepository, DefaultClock>;

/// Directory type used by the BDD world.
pub type TestDirectory =
    UserDirectoryService<InMemoryUserRepository, InMemoryLoadLedger, DefaultClock>;

/// Engine type used by the BDD world.
pub type TestEngine = TaskLifecycleService<
    InMemoryTaskRepository,
    TestCatalog,
    TestDirectory,
    InMemoryStatisticsSink,
    RecordingNotifier,
    DefaultClock,
>;

/// Scenario world for task lifecycle behaviour tests.
pub struct TaskLifecycleWorld {
    pub users: Arc<InMemoryUserRepository>,
    pub catalog: Arc<TestCatalog>,
    pub statistics: Arc<InMemoryStatisticsSink>,
    pub engine: TestEngine,
    pub agent: Option<User>,
    pub task: Option<Task>,
    pub case: Option<Case>,
    pub task_before_appointment: Option<Task>,
    pub last_appointment: Option<Result<Appointment, TaskLifecycleError>>,
}

impl TaskLifecycleWorld {
    /// Creates a world over empty in-memory collaborators.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(DefaultClock);
        let users = Arc::new(InMemoryUserRepository::new());
        let catalog = Arc::new(CatalogService::new(
            Arc::new(InMemoryCaseRepository::new()),
            Arc::new(InMemoryClusterRepository::new()),
            Arc::clone(&clock),
        ));
        let directory = Arc::new(UserDirectoryService::new(
            Arc::clone(&users),
            Arc::new(InMemoryLoadLedger::new()),
            Arc::clone(&clock),
        ));
        let statistics = Arc::new(InMemoryStatisticsSink::new());
        let engine = TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::clone(&catalog),
            directory,
            Arc::clone(&statistics),
            Arc::new(RecordingNotifier::new()),
            clock,
        );

        Self {
            users,
            catalog,
            statistics,
            engine,
            agent: None,
            task: None,
            case: None,
            task_before_appointment: None,
            last_appointment: None,
        }
    }

    /// Returns the task under test.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been opened yet.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Returns the seeded agent.
    ///
    /// # Errors
    ///
    /// Returns an error when no agent has been seeded yet.
    pub fn agent(&self) -> Result<&User, eyre::Report> {
        self.agent
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing agent in scenario world"))
    }
}

impl Default for TaskLifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskLifecycleWorld {
    TaskLifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
