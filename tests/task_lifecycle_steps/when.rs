//! When steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use triage::task::services::CreateTaskRequest;

#[when(
    r#"a task "{title}" is opened in cluster {index:i64} named "{name}" with frequency {frequency:u64}"#
)]
fn task_is_opened(
    world: &mut TaskLifecycleWorld,
    title: String,
    index: i64,
    name: String,
    frequency: u64,
) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(title, index, name).with_frequency(frequency);
    let task = run_async(world.engine.create_task(request)).wrap_err("open task")?;
    world.task = Some(task);
    Ok(())
}

#[when("the agent advances the task")]
fn agent_advances(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let agent_id = world.agent()?.id();
    let advanced =
        run_async(world.engine.change_task_status(task_id, agent_id)).wrap_err("advance task")?;
    world.task = Some(advanced);
    Ok(())
}

#[when("the case is attached to the task")]
fn case_attached(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let case_id = world
        .case
        .as_ref()
        .map(|case| case.id())
        .ok_or_else(|| eyre::eyre!("missing case in scenario world"))?;
    let updated =
        run_async(world.engine.add_case_to_task(task_id, case_id)).wrap_err("attach case")?;
    world.task = Some(updated);
    Ok(())
}

#[when("the case is detached from the task")]
fn case_detached(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let updated =
        run_async(world.engine.remove_case_from_task(task_id)).wrap_err("detach case")?;
    world.task = Some(updated);
    Ok(())
}

#[when("the task is appointed again")]
fn task_appointed_again(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    world.last_appointment = Some(run_async(world.engine.appoint_user_to_task(task_id)));
    Ok(())
}
