//! Narrow views of the catalog and the directory used by the lifecycle
//! engine.
//!
//! The engine never sees the catalog's or directory's repositories, only the
//! handful of capabilities listed here.

use crate::catalog::{
    domain::{Case, CaseId, Cluster, ClusterId},
    services::{CatalogServiceResult, ResolveClusterRequest},
};
use crate::directory::{
    domain::{User, UserId},
    services::UserDirectoryResult,
};
use crate::task::domain::TaskId;
use async_trait::async_trait;

/// Cluster and case lookups needed by the engine.
#[async_trait]
pub trait ClusterCatalog: Send + Sync {
    /// Returns the cluster for an external index, creating it when absent.
    async fn resolve_or_create_cluster(
        &self,
        request: ResolveClusterRequest,
    ) -> CatalogServiceResult<Cluster>;

    /// Finds a cluster by internal identifier.
    async fn find_cluster(&self, id: ClusterId) -> CatalogServiceResult<Option<Cluster>>;

    /// Finds a case by identifier.
    async fn find_case(&self, id: CaseId) -> CatalogServiceResult<Option<Case>>;
}

/// Agent lookups and load bookkeeping needed by the engine.
#[async_trait]
pub trait AgentDirectory: Send + Sync {
    /// Finds a user by identifier.
    async fn find_user(&self, id: UserId) -> UserDirectoryResult<Option<User>>;

    /// Returns the active user with the smallest running average.
    async fn least_loaded_user(&self) -> UserDirectoryResult<User>;

    /// Adds a task's duration snapshot to the user's running average.
    async fn take_load(&self, user: UserId, task: TaskId, amount: f64)
    -> UserDirectoryResult<User>;

    /// Removes a task's duration snapshot from the user's running average.
    async fn release_load(
        &self,
        user: UserId,
        task: TaskId,
        amount: f64,
    ) -> UserDirectoryResult<User>;
}
