//! Then steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use triage::catalog::domain::ClusterIndex;
use triage::error::ErrorKind;
use triage::task::domain::TaskStatus;
use rstest_bdd_macros::then;

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskLifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.task()?;
    eyre::ensure!(
        task.status() == expected,
        "expected status {expected}, found {}",
        task.status()
    );
    Ok(())
}

#[then(r#"the task belongs to cluster {index:i64} named "{name}""#)]
fn task_belongs_to_cluster(
    world: &TaskLifecycleWorld,
    index: i64,
    name: String,
) -> Result<(), eyre::Report> {
    let cluster = run_async(world.catalog.get_cluster(world.task()?.cluster_id()))?;
    eyre::ensure!(cluster.index() == ClusterIndex::new(index), "cluster index mismatch");
    eyre::ensure!(cluster.name().as_str() == name, "cluster name mismatch");
    Ok(())
}

#[then("the task is assigned to the agent")]
fn task_assigned_to_agent(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let agent_id = world.agent()?.id();
    eyre::ensure!(
        world.task()?.assignee() == Some(agent_id),
        "task should be assigned to the acting agent"
    );
    Ok(())
}

#[then("the task has a start time")]
fn task_has_start_time(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(world.task()?.formed_at().is_some(), "missing formed_at");
    Ok(())
}

#[then("the task has a completion time")]
fn task_has_completion_time(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(world.task()?.completed_at().is_some(), "missing completed_at");
    Ok(())
}

#[then("one timing sample was recorded for cluster {index:i64}")]
fn one_sample_recorded(world: &TaskLifecycleWorld, index: i64) -> Result<(), eyre::Report> {
    let samples = world.statistics.samples();
    let [sample] = samples.as_slice() else {
        return Err(eyre::eyre!("expected one sample, found {}", samples.len()));
    };
    eyre::ensure!(
        sample.cluster_index() == ClusterIndex::new(index),
        "sample recorded for the wrong cluster"
    );
    Ok(())
}

#[then("the task has no case")]
fn task_has_no_case(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(world.task()?.case_id().is_none(), "case should be detached");
    Ok(())
}

#[then("the appointment fails with an already assigned error")]
fn appointment_fails_already_assigned(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_appointment
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing appointment result"))?;
    match result {
        Err(err) if err.kind() == ErrorKind::AlreadyAssigned => Ok(()),
        other => Err(eyre::eyre!("expected AlreadyAssigned, got {other:?}")),
    }
}

#[then("the stored task is unchanged")]
fn stored_task_unchanged(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let before = world
        .task_before_appointment
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing pre-appointment snapshot"))?;
    let stored = run_async(world.engine.get_task(before.id()))?;
    eyre::ensure!(&stored == before, "task changed after refused appointment");
    Ok(())
}
