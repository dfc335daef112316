//! In-memory integration tests for running-average bookkeeping.

use super::helpers::{Stack, ensure_close, stack};
use rstest::rstest;
use triage::directory::domain::fold_ledger;
use triage::task::services::CreateTaskRequest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ledger_reproduces_running_average(stack: Stack) -> Result<(), eyre::Report> {
    let agent = stack.seed_agent("agent@example.com", 40.0, None).await?;
    let mut tasks = Vec::new();
    for (title, average) in [("Slow login", 100.0), ("Broken mouse", 25.0)] {
        let request = CreateTaskRequest::new(title, 1, "Desk").with_average_duration(average);
        tasks.push(stack.engine.create_task(request).await?);
    }
    for task in &tasks {
        stack.engine.change_task_status(task.id(), agent.id()).await?;
    }
    if let Some(first) = tasks.first() {
        stack.engine.change_task_status(first.id(), agent.id()).await?;
    }

    let user = stack.directory.get_user(agent.id()).await?;
    let history = stack.directory.load_history(agent.id()).await?;
    ensure_close(user.average_duration(), 65.0)?;
    ensure_close(fold_ledger(&history), user.average_duration())?;
    eyre::ensure!(history.len() == 4, "seed, two takes and one release expected");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manual_reset_restarts_the_fold(stack: Stack) -> Result<(), eyre::Report> {
    let agent = stack.seed_agent("agent@example.com", 0.0, None).await?;
    let task = stack
        .engine
        .create_task(CreateTaskRequest::new("Slow login", 1, "Desk").with_average_duration(30.0))
        .await?;
    stack.engine.change_task_status(task.id(), agent.id()).await?;

    stack.directory.update_average_duration(agent.id(), 10.0).await?;

    let history = stack.directory.load_history(agent.id()).await?;
    ensure_close(fold_ledger(&history), 10.0)?;
    Ok(())
}
