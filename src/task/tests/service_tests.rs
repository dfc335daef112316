//! Lifecycle engine tests over in-memory collaborators.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use super::ManualTime;
use crate::analytics::adapters::InMemoryStatisticsSink;
use crate::catalog::{
    adapters::memory::{InMemoryCaseRepository, InMemoryClusterRepository},
    domain::{CaseId, ClusterIndex},
    services::{CatalogService, CreateCaseRequest},
};
use crate::directory::{
    adapters::memory::{InMemoryLoadLedger, InMemoryUserRepository},
    domain::{CredentialHash, TelegramHandle, User, UserId, UserRole},
    ports::{DirectoryRepositoryError, UserRepository},
    services::{UserDirectoryError, UserDirectoryResult, UserDirectoryService},
};
use crate::error::ErrorKind;
use crate::notification::adapters::RecordingNotifier;
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{TaskId, TaskStatus},
    ports::AgentDirectory,
    services::{CreateTaskRequest, NotificationOutcome, TaskLifecycleError, TaskLifecycleService},
};
use async_trait::async_trait;
use eyre::{Result, bail, ensure};
use mockable::{DefaultClock, MockClock};
use rstest::{fixture, rstest};

type TestCatalog = CatalogService<InMemoryCaseRepository, InMemoryClusterRepository, DefaultClock>;
type TestDirectory =
    UserDirectoryService<InMemoryUserRepository, InMemoryLoadLedger, DefaultClock>;
type TestEngine = TaskLifecycleService<
    InMemoryTaskRepository,
    TestCatalog,
    TestDirectory,
    InMemoryStatisticsSink,
    RecordingNotifier,
    MockClock,
>;

struct Harness {
    time: ManualTime,
    users: Arc<InMemoryUserRepository>,
    catalog: Arc<TestCatalog>,
    directory: Arc<TestDirectory>,
    statistics: Arc<InMemoryStatisticsSink>,
    notifier: Arc<RecordingNotifier>,
    engine: TestEngine,
}

#[fixture]
fn harness() -> Harness {
    let time = ManualTime::starting_at_noon();
    let users = Arc::new(InMemoryUserRepository::new());
    let catalog = Arc::new(CatalogService::new(
        Arc::new(InMemoryCaseRepository::new()),
        Arc::new(InMemoryClusterRepository::new()),
        Arc::new(DefaultClock),
    ));
    let directory = Arc::new(UserDirectoryService::new(
        Arc::clone(&users),
        Arc::new(InMemoryLoadLedger::new()),
        Arc::new(DefaultClock),
    ));
    let statistics = Arc::new(InMemoryStatisticsSink::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let engine = TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::clone(&catalog),
        Arc::clone(&directory),
        Arc::clone(&statistics),
        Arc::clone(&notifier),
        Arc::new(time.clock()),
    );
    Harness {
        time,
        users,
        catalog,
        directory,
        statistics,
        notifier,
        engine,
    }
}

async fn seed_user(
    harness: &Harness,
    email: &str,
    average: f64,
    handle: Option<&str>,
) -> Result<User> {
    let telegram = handle.map(TelegramHandle::new).transpose()?;
    let mut user = User::new(email, CredentialHash::default(), UserRole::User, telegram)?;
    user.set_average_duration(average)?;
    harness.users.store(&user).await?;
    Ok(user)
}

fn printer_request() -> CreateTaskRequest {
    CreateTaskRequest::new("Printer offline", 7, "Printers").with_average_duration(120.0)
}

/// Directory whose next `take_load` fails before touching the ledger.
struct FlakyDirectory {
    inner: Arc<TestDirectory>,
    fail_take: AtomicBool,
}

impl FlakyDirectory {
    fn failing_once(inner: Arc<TestDirectory>) -> Self {
        Self {
            inner,
            fail_take: AtomicBool::new(true),
        }
    }
}

#[async_trait]
impl AgentDirectory for FlakyDirectory {
    async fn find_user(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        AgentDirectory::find_user(&*self.inner, id).await
    }

    async fn least_loaded_user(&self) -> UserDirectoryResult<User> {
        self.inner.least_loaded_user().await
    }

    async fn take_load(&self, user: UserId, task: TaskId, amount: f64) -> UserDirectoryResult<User> {
        if self.fail_take.swap(false, Ordering::SeqCst) {
            return Err(UserDirectoryError::repository(
                "take_load",
                DirectoryRepositoryError::persistence(std::io::Error::other("ledger offline")),
            ));
        }
        self.inner.take_load(user, task, amount).await
    }

    async fn release_load(
        &self,
        user: UserId,
        task: TaskId,
        amount: f64,
    ) -> UserDirectoryResult<User> {
        self.inner.release_load(user, task, amount).await
    }
}

fn flaky_engine(
    harness: &Harness,
) -> TaskLifecycleService<
    InMemoryTaskRepository,
    TestCatalog,
    FlakyDirectory,
    InMemoryStatisticsSink,
    RecordingNotifier,
    MockClock,
> {
    TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::clone(&harness.catalog),
        Arc::new(FlakyDirectory::failing_once(Arc::clone(&harness.directory))),
        Arc::clone(&harness.statistics),
        Arc::clone(&harness.notifier),
        Arc::new(harness.time.clock()),
    )
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// ── Creation ────────────────────────────────────────────────────────

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_opens_task_in_new_cluster(harness: Harness) -> Result<()> {
    let task = harness
        .engine
        .create_task(printer_request().with_description("Floor 3"))
        .await?;

    let cluster = harness.catalog.get_cluster(task.cluster_id()).await?;
    ensure!(cluster.index() == ClusterIndex::new(7));
    ensure!(cluster.name().as_str() == "Printers");
    ensure!(task.status() == TaskStatus::Open);
    ensure!(task.description() == "Floor 3");
    ensure!(task.created_at() == harness.time.now());
    ensure!(harness.engine.get_task(task.id()).await? == task);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_reuses_cluster_for_known_index(harness: Harness) -> Result<()> {
    let first = harness.engine.create_task(printer_request()).await?;
    let second = harness
        .engine
        .create_task(CreateTaskRequest::new("Toner empty", 7, "Ignored name"))
        .await?;

    ensure!(first.cluster_id() == second.cluster_id());
    ensure!(harness.catalog.list_clusters().await?.len() == 1);
    let cluster = harness.catalog.get_cluster(first.cluster_id()).await?;
    ensure!(cluster.name().as_str() == "Printers");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_with_blank_title_creates_nothing(harness: Harness) -> Result<()> {
    let result = harness
        .engine
        .create_task(CreateTaskRequest::new("   ", 9, "Network"))
        .await;

    let Err(err) = result else {
        bail!("blank title should be rejected");
    };
    ensure!(err.kind() == ErrorKind::InvalidInput);
    ensure!(harness.catalog.list_clusters().await?.is_empty());
    ensure!(harness.engine.list_tasks(TaskStatus::Open).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn get_task_reports_missing_task(harness: Harness) -> Result<()> {
    let missing = TaskId::new();
    let result = harness.engine.get_task(missing).await;
    ensure!(matches!(result, Err(TaskLifecycleError::TaskNotFound(id)) if id == missing));
    Ok(())
}

// ── Status changes ──────────────────────────────────────────────────

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_lifecycle_records_sample_and_balances_load(harness: Harness) -> Result<()> {
    let agent = seed_user(&harness, "agent@example.com", 100.0, None).await?;
    let task = harness.engine.create_task(printer_request()).await?;

    harness.time.advance_seconds(30);
    let start_time = harness.time.now();
    let started = harness
        .engine
        .change_task_status(task.id(), agent.id())
        .await?;
    ensure!(started.status() == TaskStatus::InProgress);
    ensure!(started.assignee() == Some(agent.id()));
    ensure!(started.formed_at() == Some(start_time));
    assert_close(
        harness.directory.get_user(agent.id()).await?.average_duration(),
        220.0,
    );

    harness.time.advance_seconds(300);
    let closed = harness
        .engine
        .change_task_status(task.id(), agent.id())
        .await?;
    ensure!(closed.status() == TaskStatus::Closed);
    ensure!(closed.completed_at() == Some(harness.time.now()));
    ensure!(closed.formed_at() == started.formed_at());
    assert_close(
        harness.directory.get_user(agent.id()).await?.average_duration(),
        100.0,
    );

    let samples = harness.statistics.samples();
    let [sample] = samples.as_slice() else {
        bail!("expected exactly one sample, got {samples:?}");
    };
    ensure!(sample.cluster_index() == ClusterIndex::new(7));
    ensure!(sample.reaction_seconds() == 30);
    ensure!(sample.duration_seconds() == 300);
    let summaries = harness.statistics.summaries();
    ensure!(summaries.len() == 1);
    ensure!(summaries.first().map(|summary| summary.count) == Some(1));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_task_cannot_advance(harness: Harness) -> Result<()> {
    let agent = seed_user(&harness, "agent@example.com", 0.0, None).await?;
    let task = harness.engine.create_task(printer_request()).await?;
    harness.engine.change_task_status(task.id(), agent.id()).await?;
    let closed = harness.engine.change_task_status(task.id(), agent.id()).await?;

    let result = harness.engine.change_task_status(task.id(), agent.id()).await;

    let Err(err) = result else {
        bail!("closed task should not advance");
    };
    ensure!(err.kind() == ErrorKind::InvalidState);
    ensure!(harness.engine.get_task(task.id()).await? == closed);
    ensure!(harness.statistics.samples().len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_change_by_unknown_user_fails(harness: Harness) -> Result<()> {
    let task = harness.engine.create_task(printer_request()).await?;
    let stranger = UserId::new();

    let result = harness.engine.change_task_status(task.id(), stranger).await;

    ensure!(matches!(result, Err(TaskLifecycleError::UserNotFound(id)) if id == stranger));
    ensure!(harness.engine.get_task(task.id()).await?.status() == TaskStatus::Open);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failing_statistics_sink_leaves_task_in_progress(harness: Harness) -> Result<()> {
    let agent = seed_user(&harness, "agent@example.com", 0.0, None).await?;
    let task = harness.engine.create_task(printer_request()).await?;
    harness.engine.change_task_status(task.id(), agent.id()).await?;
    harness.statistics.set_failing(true);

    let result = harness.engine.change_task_status(task.id(), agent.id()).await;

    let Err(err) = result else {
        bail!("closure should fail while the sink is down");
    };
    ensure!(matches!(err, TaskLifecycleError::Statistics { .. }));
    ensure!(err.kind() == ErrorKind::Dependency);
    let stored = harness.engine.get_task(task.id()).await?;
    ensure!(stored.status() == TaskStatus::InProgress);
    ensure!(stored.completed_at().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_load_update_leaves_task_open(harness: Harness) -> Result<()> {
    let agent = seed_user(&harness, "agent@example.com", 0.0, None).await?;
    let engine = flaky_engine(&harness);
    let task = engine.create_task(printer_request()).await?;

    let result = engine.change_task_status(task.id(), agent.id()).await;

    let Err(err) = result else {
        bail!("start should fail while the ledger is down");
    };
    ensure!(matches!(err, TaskLifecycleError::Directory { .. }));
    ensure!(err.kind() == ErrorKind::Dependency);
    let stored = engine.get_task(task.id()).await?;
    ensure!(stored == task);
    ensure!(stored.status() == TaskStatus::Open);
    ensure!(stored.assignee().is_none());
    ensure!(stored.formed_at().is_none());
    ensure!(harness.directory.load_history(agent.id()).await?.is_empty());
    assert_close(
        harness.directory.get_user(agent.id()).await?.average_duration(),
        0.0,
    );

    let started = engine.change_task_status(task.id(), agent.id()).await?;
    ensure!(started.status() == TaskStatus::InProgress);
    assert_close(
        harness.directory.get_user(agent.id()).await?.average_duration(),
        120.0,
    );
    engine.change_task_status(task.id(), agent.id()).await?;
    assert_close(
        harness.directory.get_user(agent.id()).await?.average_duration(),
        0.0,
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_load_update_leaves_task_unappointed(harness: Harness) -> Result<()> {
    let agent = seed_user(&harness, "agent@example.com", 0.0, Some("agent")).await?;
    let engine = flaky_engine(&harness);
    let task = engine.create_task(printer_request()).await?;

    let result = engine.appoint_user_to_task(task.id()).await;

    let Err(err) = result else {
        bail!("appointment should fail while the ledger is down");
    };
    ensure!(err.kind() == ErrorKind::Dependency);
    ensure!(engine.get_task(task.id()).await? == task);
    ensure!(harness.directory.load_history(agent.id()).await?.is_empty());
    ensure!(harness.notifier.handles().is_empty());

    let appointment = engine.appoint_user_to_task(task.id()).await?;
    ensure!(appointment.task.assignee() == Some(agent.id()));
    assert_close(appointment.assignee.average_duration(), 120.0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closing_by_another_user_releases_assignee_load(harness: Harness) -> Result<()> {
    let alice = seed_user(&harness, "alice@example.com", 0.0, None).await?;
    let bob = seed_user(&harness, "bob@example.com", 40.0, None).await?;
    let task = harness.engine.create_task(printer_request()).await?;
    harness.engine.change_task_status(task.id(), alice.id()).await?;
    assert_close(
        harness.directory.get_user(alice.id()).await?.average_duration(),
        120.0,
    );

    let closed = harness.engine.change_task_status(task.id(), bob.id()).await?;

    ensure!(closed.status() == TaskStatus::Closed);
    ensure!(closed.assignee() == Some(alice.id()));
    assert_close(
        harness.directory.get_user(alice.id()).await?.average_duration(),
        0.0,
    );
    assert_close(
        harness.directory.get_user(bob.id()).await?.average_duration(),
        40.0,
    );
    ensure!(harness.directory.load_history(bob.id()).await?.is_empty());
    Ok(())
}

// ── Appointment ─────────────────────────────────────────────────────

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn appoint_picks_least_loaded_user_and_notifies(harness: Harness) -> Result<()> {
    seed_user(&harness, "busy@example.com", 500.0, Some("busy")).await?;
    let idle = seed_user(&harness, "idle@example.com", 10.0, Some("idle")).await?;
    let task = harness.engine.create_task(printer_request()).await?;

    let appointment = harness.engine.appoint_user_to_task(task.id()).await?;

    ensure!(appointment.assignee.id() == idle.id());
    assert_close(appointment.assignee.average_duration(), 130.0);
    ensure!(appointment.task.assignee() == Some(idle.id()));
    ensure!(appointment.task.status() == TaskStatus::InProgress);
    ensure!(appointment.notification == NotificationOutcome::Delivered);
    let handles = harness.notifier.handles();
    ensure!(handles.iter().map(TelegramHandle::as_str).eq(["idle"]));
    ensure!(harness.engine.get_task(task.id()).await? == appointment.task);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn appoint_refuses_assigned_task(harness: Harness) -> Result<()> {
    let first = seed_user(&harness, "first@example.com", 0.0, None).await?;
    seed_user(&harness, "second@example.com", 50.0, None).await?;
    let task = harness.engine.create_task(printer_request()).await?;
    let appointment = harness.engine.appoint_user_to_task(task.id()).await?;

    let result = harness.engine.appoint_user_to_task(task.id()).await;

    let Err(err) = result else {
        bail!("second appointment should be refused");
    };
    ensure!(err.kind() == ErrorKind::AlreadyAssigned);
    ensure!(harness.engine.get_task(task.id()).await? == appointment.task);
    assert_close(
        harness.directory.get_user(first.id()).await?.average_duration(),
        120.0,
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn appoint_without_active_users_fails(harness: Harness) -> Result<()> {
    let retired = seed_user(&harness, "retired@example.com", 0.0, None).await?;
    harness.directory.deactivate_user(retired.id()).await?;
    let task = harness.engine.create_task(printer_request()).await?;

    let result = harness.engine.appoint_user_to_task(task.id()).await;

    let Err(err) = result else {
        bail!("appointment should fail without active users");
    };
    ensure!(err.kind() == ErrorKind::NoEligibleUser);
    ensure!(harness.engine.get_task(task.id()).await?.assignee().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn notification_failure_keeps_appointment(harness: Harness) -> Result<()> {
    let agent = seed_user(&harness, "agent@example.com", 0.0, Some("agent")).await?;
    let task = harness.engine.create_task(printer_request()).await?;
    harness.notifier.set_failing(true);

    let appointment = harness.engine.appoint_user_to_task(task.id()).await?;

    ensure!(matches!(
        appointment.notification,
        NotificationOutcome::Failed(_)
    ));
    let stored = harness.engine.get_task(task.id()).await?;
    ensure!(stored.assignee() == Some(agent.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn user_without_handle_is_not_notified(harness: Harness) -> Result<()> {
    seed_user(&harness, "quiet@example.com", 0.0, None).await?;
    let task = harness.engine.create_task(printer_request()).await?;

    let appointment = harness.engine.appoint_user_to_task(task.id()).await?;

    ensure!(appointment.notification == NotificationOutcome::Skipped);
    ensure!(harness.notifier.handles().is_empty());
    Ok(())
}

// ── Annotations ─────────────────────────────────────────────────────

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn case_attachment_requires_existing_case(harness: Harness) -> Result<()> {
    let task = harness.engine.create_task(printer_request()).await?;
    let case = harness
        .catalog
        .create_case(CreateCaseRequest::new("Jammed tray", "Open tray B").with_cluster(task.cluster_id()))
        .await?;

    let attached = harness.engine.add_case_to_task(task.id(), case.id()).await?;
    ensure!(attached.case_id() == Some(case.id()));

    let missing = CaseId::new();
    let result = harness.engine.add_case_to_task(task.id(), missing).await;
    ensure!(matches!(result, Err(TaskLifecycleError::CaseNotFound(id)) if id == missing));

    let detached = harness.engine.remove_case_from_task(task.id()).await?;
    ensure!(detached.case_id().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn solution_and_escalation_work_on_closed_tasks(harness: Harness) -> Result<()> {
    let agent = seed_user(&harness, "agent@example.com", 0.0, None).await?;
    let task = harness.engine.create_task(printer_request()).await?;
    harness.engine.change_task_status(task.id(), agent.id()).await?;
    let closed = harness.engine.change_task_status(task.id(), agent.id()).await?;
    let formed_at = closed.formed_at();
    let completed_at = closed.completed_at();
    ensure!(formed_at.is_some() && completed_at.is_some());

    let solved = harness
        .engine
        .add_solution_to_task(task.id(), "Replaced fuser")
        .await?;
    ensure!(solved.solution() == Some("Replaced fuser"));
    let fired = harness.engine.fire_task(task.id()).await?;
    let fired_again = harness.engine.fire_task(task.id()).await?;
    ensure!(fired.is_fired() && fired_again == fired);
    let cleared = harness.engine.remove_solution_from_task(task.id()).await?;
    ensure!(cleared.solution().is_none());
    ensure!(cleared.status() == TaskStatus::Closed);
    let case = harness
        .catalog
        .create_case(CreateCaseRequest::new("Fuser worn", "Replace fuser unit"))
        .await?;
    let attached = harness.engine.add_case_to_task(task.id(), case.id()).await?;
    let detached = harness.engine.remove_case_from_task(task.id()).await?;

    for snapshot in [&solved, &fired, &cleared, &attached, &detached] {
        ensure!(snapshot.formed_at() == formed_at);
        ensure!(snapshot.completed_at() == completed_at);
    }
    Ok(())
}

// ── Listings ────────────────────────────────────────────────────────

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listings_filter_by_status_and_user(harness: Harness) -> Result<()> {
    let alice = seed_user(&harness, "alice@example.com", 0.0, None).await?;
    let bob = seed_user(&harness, "bob@example.com", 0.0, None).await?;
    let first = harness.engine.create_task(printer_request()).await?;
    let second = harness
        .engine
        .create_task(CreateTaskRequest::new("Wi-Fi slow", 3, "Network"))
        .await?;
    let third = harness
        .engine
        .create_task(CreateTaskRequest::new("Monitor flicker", 4, "Displays"))
        .await?;
    harness.engine.change_task_status(first.id(), alice.id()).await?;
    harness.engine.change_task_status(third.id(), alice.id()).await?;
    harness.engine.change_task_status(second.id(), bob.id()).await?;

    let in_progress: Vec<_> = harness
        .engine
        .list_tasks(TaskStatus::InProgress)
        .await?
        .iter()
        .map(|task| task.id())
        .collect();
    ensure!(in_progress == vec![first.id(), second.id(), third.id()]);

    let alices: Vec<_> = harness
        .engine
        .list_tasks_by_user(alice.id(), TaskStatus::InProgress)
        .await?
        .iter()
        .map(|task| task.id())
        .collect();
    ensure!(alices == vec![first.id(), third.id()]);
    ensure!(harness.engine.list_tasks(TaskStatus::Open).await?.is_empty());
    Ok(())
}
