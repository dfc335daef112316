//! In-memory integration tests for automatic appointment.

use super::helpers::{Stack, ensure_close, stack};
use rstest::rstest;
use triage::error::ErrorKind;
use triage::task::services::{CreateTaskRequest, NotificationOutcome};

fn request(title: &str) -> CreateTaskRequest {
    CreateTaskRequest::new(title, 5, "Accounts").with_average_duration(90.0)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn appointments_spread_across_agents(stack: Stack) -> Result<(), eyre::Report> {
    let first = stack.seed_agent("first@example.com", 0.0, Some("first")).await?;
    let second = stack.seed_agent("second@example.com", 50.0, Some("second")).await?;
    let one = stack.engine.create_task(request("Locked out")).await?;
    let two = stack.engine.create_task(request("Password reset")).await?;

    let a = stack.engine.appoint_user_to_task(one.id()).await?;
    let b = stack.engine.appoint_user_to_task(two.id()).await?;

    eyre::ensure!(a.assignee.id() == first.id());
    eyre::ensure!(b.assignee.id() == second.id(), "second task should go to the now idler agent");
    ensure_close(a.assignee.average_duration(), 90.0)?;
    ensure_close(b.assignee.average_duration(), 140.0)?;
    let handles: Vec<_> = stack
        .notifier
        .handles()
        .iter()
        .map(|handle| handle.as_str().to_owned())
        .collect();
    eyre::ensure!(handles == ["first", "second"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn double_appointment_is_refused(stack: Stack) -> Result<(), eyre::Report> {
    stack.seed_agent("solo@example.com", 0.0, None).await?;
    let task = stack.engine.create_task(request("Locked out")).await?;
    let first = stack.engine.appoint_user_to_task(task.id()).await?;

    let second = stack.engine.appoint_user_to_task(task.id()).await;

    eyre::ensure!(
        second
            .as_ref()
            .is_err_and(|err| err.kind() == ErrorKind::AlreadyAssigned),
        "expected AlreadyAssigned, got {second:?}"
    );
    eyre::ensure!(stack.engine.get_task(task.id()).await? == first.task);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn notifier_outage_does_not_undo_appointment(stack: Stack) -> Result<(), eyre::Report> {
    let agent = stack.seed_agent("agent@example.com", 0.0, Some("agent")).await?;
    let task = stack.engine.create_task(request("Locked out")).await?;
    stack.notifier.set_failing(true);

    let appointment = stack.engine.appoint_user_to_task(task.id()).await?;

    eyre::ensure!(matches!(
        appointment.notification,
        NotificationOutcome::Failed(_)
    ));
    let stored = stack.engine.get_task(task.id()).await?;
    eyre::ensure!(stored.assignee() == Some(agent.id()));
    let reloaded = stack.directory.get_user(agent.id()).await?;
    ensure_close(reloaded.average_duration(), 90.0)?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_directory_has_no_eligible_user(stack: Stack) -> Result<(), eyre::Report> {
    let task = stack.engine.create_task(request("Locked out")).await?;

    let result = stack.engine.appoint_user_to_task(task.id()).await;

    eyre::ensure!(
        result
            .as_ref()
            .is_err_and(|err| err.kind() == ErrorKind::NoEligibleUser),
        "expected NoEligibleUser, got {result:?}"
    );
    Ok(())
}
