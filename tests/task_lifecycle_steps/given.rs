//! Given steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use triage::catalog::services::CreateCaseRequest;
use triage::directory::{
    domain::{CredentialHash, TelegramHandle, User, UserRole},
    ports::UserRepository,
};
use triage::task::services::CreateTaskRequest;

#[given(r#"an active agent "{email}""#)]
fn active_agent(world: &mut TaskLifecycleWorld, email: String) -> Result<(), eyre::Report> {
    let handle = TelegramHandle::new("support_agent")?;
    let user = User::new(email, CredentialHash::default(), UserRole::User, Some(handle))?;
    run_async(world.users.store(&user)).wrap_err("store scenario agent")?;
    world.agent = Some(user);
    Ok(())
}

#[given(r#"a task "{title}" opened in cluster {index:i64} named "{name}""#)]
fn task_opened(
    world: &mut TaskLifecycleWorld,
    title: String,
    index: i64,
    name: String,
) -> Result<(), eyre::Report> {
    let task = run_async(
        world
            .engine
            .create_task(CreateTaskRequest::new(title, index, name).with_average_duration(60.0)),
    )
    .wrap_err("open task for scenario setup")?;
    world.task = Some(task);
    Ok(())
}

#[given("the agent has advanced the task")]
fn agent_has_advanced(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let agent_id = world.agent()?.id();
    let advanced = run_async(world.engine.change_task_status(task_id, agent_id))
        .wrap_err("advance task in scenario setup")?;
    world.task = Some(advanced);
    Ok(())
}

#[given(r#"a case "{title}" exists"#)]
fn case_exists(world: &mut TaskLifecycleWorld, title: String) -> Result<(), eyre::Report> {
    let cluster_id = world.task()?.cluster_id();
    let case = run_async(
        world
            .catalog
            .create_case(CreateCaseRequest::new(title, "rm -rf /tmp/*").with_cluster(cluster_id)),
    )
    .wrap_err("create case for scenario setup")?;
    world.case = Some(case);
    Ok(())
}

#[given("the task has been appointed")]
fn task_has_been_appointed(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let appointment = run_async(world.engine.appoint_user_to_task(task_id))
        .wrap_err("appoint task in scenario setup")?;
    world.task = Some(appointment.task.clone());
    world.task_before_appointment = Some(appointment.task);
    Ok(())
}
