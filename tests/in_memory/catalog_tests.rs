//! In-memory integration tests for cluster resolution and cases.

use super::helpers::{Stack, stack};
use rstest::rstest;
use triage::catalog::{
    domain::ClusterIndex,
    services::{CreateCaseRequest, ResolveClusterRequest},
};
use triage::error::ErrorKind;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_resolution_yields_one_cluster(stack: Stack) -> Result<(), eyre::Report> {
    let mut handles = Vec::new();
    for worker in 0..8 {
        let catalog = std::sync::Arc::clone(&stack.catalog);
        handles.push(tokio::spawn(async move {
            catalog
                .resolve_or_create_cluster(ResolveClusterRequest::new(
                    11,
                    format!("Worker {worker}"),
                    1,
                ))
                .await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await??.id());
    }
    ids.dedup();
    eyre::ensure!(ids.len() == 1, "expected a single cluster id, got {ids:?}");
    eyre::ensure!(stack.catalog.list_clusters().await?.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clusters_list_in_index_order(stack: Stack) -> Result<(), eyre::Report> {
    for index in [30, 10, 20] {
        stack
            .catalog
            .resolve_or_create_cluster(ResolveClusterRequest::new(index, "Cluster", 0))
            .await?;
    }

    let indices: Vec<_> = stack
        .catalog
        .list_clusters()
        .await?
        .iter()
        .map(|cluster| cluster.index())
        .collect();
    eyre::ensure!(
        indices
            == vec![
                ClusterIndex::new(10),
                ClusterIndex::new(20),
                ClusterIndex::new(30)
            ]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_case_cannot_be_attached(stack: Stack) -> Result<(), eyre::Report> {
    let task = stack
        .engine
        .create_task(triage::task::services::CreateTaskRequest::new(
            "Disk full",
            7,
            "Disk",
        ))
        .await?;
    let case = stack
        .catalog
        .create_case(CreateCaseRequest::new("Clean temp", "Delete /tmp").with_cluster(task.cluster_id()))
        .await?;
    stack.catalog.delete_case(case.id()).await?;

    let result = stack.engine.add_case_to_task(task.id(), case.id()).await;

    eyre::ensure!(
        result
            .as_ref()
            .is_err_and(|err| err.kind() == ErrorKind::NotFound),
        "expected NotFound, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_case_leaves_in_memory_task_reference(stack: Stack) -> Result<(), eyre::Report> {
    let task = stack
        .engine
        .create_task(triage::task::services::CreateTaskRequest::new(
            "Disk full",
            7,
            "Disk",
        ))
        .await?;
    let case = stack
        .catalog
        .create_case(CreateCaseRequest::new("Clean temp", "Delete /tmp"))
        .await?;
    stack.engine.add_case_to_task(task.id(), case.id()).await?;

    stack.catalog.delete_case(case.id()).await?;

    let stored = stack.engine.get_task(task.id()).await?;
    eyre::ensure!(stored.case_id() == Some(case.id()));
    eyre::ensure!(stack.catalog.find_case(case.id()).await?.is_none());
    let detached = stack.engine.remove_case_from_task(task.id()).await?;
    eyre::ensure!(detached.case_id().is_none());
    Ok(())
}
