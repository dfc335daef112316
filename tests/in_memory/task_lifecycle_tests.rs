//! In-memory integration tests for task creation and status changes.

use super::helpers::{Stack, stack};
use rstest::rstest;
use triage::catalog::domain::ClusterIndex;
use triage::error::ErrorKind;
use triage::task::{domain::TaskStatus, services::CreateTaskRequest};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disk_full_task_opens_new_cluster(stack: Stack) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new("Disk full", 7, "Disk").with_frequency(3);

    let task = stack.engine.create_task(request).await?;

    let cluster = stack.catalog.get_cluster(task.cluster_id()).await?;
    eyre::ensure!(cluster.index() == ClusterIndex::new(7));
    eyre::ensure!(cluster.frequency() == 3);
    eyre::ensure!(task.status() == TaskStatus::Open);
    eyre::ensure!(task.assignee().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn two_status_changes_close_task_and_record_sample(
    stack: Stack,
) -> Result<(), eyre::Report> {
    let agent = stack.seed_agent("u1@example.com", 0.0, None).await?;
    let task = stack
        .engine
        .create_task(CreateTaskRequest::new("Disk full", 7, "Disk"))
        .await?;

    let started = stack.engine.change_task_status(task.id(), agent.id()).await?;
    eyre::ensure!(started.status() == TaskStatus::InProgress);
    eyre::ensure!(started.formed_at().is_some());
    eyre::ensure!(started.assignee() == Some(agent.id()));
    eyre::ensure!(stack.statistics.samples().is_empty());

    let closed = stack.engine.change_task_status(task.id(), agent.id()).await?;
    eyre::ensure!(closed.status() == TaskStatus::Closed);
    eyre::ensure!(closed.completed_at().is_some());
    eyre::ensure!(closed.formed_at() == started.formed_at());
    eyre::ensure!(stack.engine.get_task(task.id()).await? == closed);
    let samples = stack.statistics.samples();
    eyre::ensure!(samples.len() == 1, "expected one sample, got {}", samples.len());
    eyre::ensure!(
        samples
            .first()
            .is_some_and(|sample| sample.cluster_index() == ClusterIndex::new(7))
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closure_samples_accumulate_per_cluster(stack: Stack) -> Result<(), eyre::Report> {
    let agent = stack.seed_agent("u1@example.com", 0.0, None).await?;
    for (title, index) in [("Disk full", 7), ("Disk slow", 7), ("No network", 2)] {
        let task = stack
            .engine
            .create_task(CreateTaskRequest::new(title, index, "Cluster"))
            .await?;
        stack.engine.change_task_status(task.id(), agent.id()).await?;
        stack.engine.change_task_status(task.id(), agent.id()).await?;
    }

    let summaries = stack.statistics.summaries();
    let counts: Vec<_> = summaries
        .iter()
        .map(|summary| (summary.cluster_index, summary.count))
        .collect();
    eyre::ensure!(
        counts == vec![(ClusterIndex::new(2), 1), (ClusterIndex::new(7), 2)],
        "unexpected summary counts {counts:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn case_round_trip_keeps_status(stack: Stack) -> Result<(), eyre::Report> {
    let task = stack
        .engine
        .create_task(CreateTaskRequest::new("Disk full", 7, "Disk"))
        .await?;
    let case = stack
        .catalog
        .create_case(triage::catalog::services::CreateCaseRequest::new(
            "Clean temp files",
            "Remove old build artefacts",
        ))
        .await?;

    stack.engine.add_case_to_task(task.id(), case.id()).await?;
    let detached = stack.engine.remove_case_from_task(task.id()).await?;

    eyre::ensure!(detached.case_id().is_none());
    eyre::ensure!(detached.status() == TaskStatus::Open);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_duration_snapshot_is_invalid_input(stack: Stack) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new("Disk full", 7, "Disk").with_average_duration(f64::NAN);

    let result = stack.engine.create_task(request).await;

    eyre::ensure!(
        result
            .as_ref()
            .is_err_and(|err| err.kind() == ErrorKind::InvalidInput),
        "expected invalid input, got {result:?}"
    );
    Ok(())
}
