//! Shared wiring for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use triage::analytics::adapters::InMemoryStatisticsSink;
use triage::catalog::{
    adapters::memory::{InMemoryCaseRepository, InMemoryClusterRepository},
    services::CatalogService,
};
use triage::directory::{
    adapters::memory::{InMemoryLoadLedger, InMemoryUserRepository},
    domain::{CredentialHash, TelegramHandle, User, UserRole},
    ports::UserRepository,
    services::UserDirectoryService,
};
use triage::notification::adapters::RecordingNotifier;
use triage::task::{adapters::memory::InMemoryTaskRepository, services::TaskLifecycleService};

/// Catalog service over in-memory repositories.
pub type TestCatalog =
    CatalogService<InMemoryCaseRepository, InMemoryClusterRepository, DefaultClock>;

/// Directory service over in-memory repositories.
pub type TestDirectory =
    UserDirectoryService<InMemoryUserRepository, InMemoryLoadLedger, DefaultClock>;

/// Lifecycle engine over in-memory collaborators.
pub type TestEngine = TaskLifecycleService<
    InMemoryTaskRepository,
    TestCatalog,
    TestDirectory,
    InMemoryStatisticsSink,
    RecordingNotifier,
    DefaultClock,
>;

/// Every service and test double sharing one set of stores.
pub struct Stack {
    pub users: Arc<InMemoryUserRepository>,
    pub catalog: Arc<TestCatalog>,
    pub directory: Arc<TestDirectory>,
    pub statistics: Arc<InMemoryStatisticsSink>,
    pub notifier: Arc<RecordingNotifier>,
    pub engine: TestEngine,
}

impl Stack {
    /// Stores an active agent with the given running average.
    ///
    /// # Errors
    ///
    /// Returns an error when the user is invalid or cannot be stored.
    pub async fn seed_agent(
        &self,
        email: &str,
        average: f64,
        handle: Option<&str>,
    ) -> Result<User, eyre::Report> {
        let telegram = handle.map(TelegramHandle::new).transpose()?;
        let mut user = User::new(email, CredentialHash::default(), UserRole::User, telegram)?;
        user.set_average_duration(average)?;
        self.users.store(&user).await?;
        Ok(user)
    }
}

/// Provides a freshly wired stack for each test.
#[fixture]
pub fn stack() -> Stack {
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
    let notifier = Arc::new(RecordingNotifier::new());
    let engine = TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::clone(&catalog),
        Arc::clone(&directory),
        Arc::clone(&statistics),
        Arc::clone(&notifier),
        clock,
    );
    Stack {
        users,
        catalog,
        directory,
        statistics,
        notifier,
        engine,
    }
}

/// Asserts two running averages agree.
///
/// # Errors
///
/// Returns an error describing the mismatch.
pub fn ensure_close(actual: f64, expected: f64) -> Result<(), eyre::Report> {
    eyre::ensure!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
    Ok(())
}
