//! Repository ports for case and cluster persistence.

use crate::catalog::domain::{Case, CaseId, Cluster, ClusterId, ClusterIndex};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for catalog repository operations.
pub type CatalogRepositoryResult<T> = Result<T, CatalogRepositoryError>;

/// Cluster persistence contract.
#[async_trait]
pub trait ClusterRepository: Send + Sync {
    /// Stores a new cluster.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::DuplicateClusterIndex`] when another
    /// cluster already owns the external index, or
    /// [`CatalogRepositoryError::DuplicateCluster`] when the identifier exists.
    async fn store(&self, cluster: &Cluster) -> CatalogRepositoryResult<()>;

    /// Overwrites an existing cluster.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::ClusterNotFound`] when the cluster
    /// does not exist.
    async fn update(&self, cluster: &Cluster) -> CatalogRepositoryResult<()>;

    /// Finds a cluster by internal identifier.
    async fn find_by_id(&self, id: ClusterId) -> CatalogRepositoryResult<Option<Cluster>>;

    /// Finds a cluster by its unique external index.
    async fn find_by_index(&self, index: ClusterIndex) -> CatalogRepositoryResult<Option<Cluster>>;

    /// Returns every cluster ordered by external index.
    async fn list_all(&self) -> CatalogRepositoryResult<Vec<Cluster>>;
}

/// Case persistence contract.
#[async_trait]
pub trait CaseRepository: Send + Sync {
    /// Stores a new case.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::DuplicateCase`] when the identifier
    /// already exists.
    async fn store(&self, case: &Case) -> CatalogRepositoryResult<()>;

    /// Overwrites an existing case.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::CaseNotFound`] when the case does not
    /// exist.
    async fn update(&self, case: &Case) -> CatalogRepositoryResult<()>;

    /// Removes a case.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::CaseNotFound`] when the case does not
    /// exist.
    async fn delete(&self, id: CaseId) -> CatalogRepositoryResult<()>;

    /// Finds a case by identifier.
    async fn find_by_id(&self, id: CaseId) -> CatalogRepositoryResult<Option<Case>>;

    /// Returns the cases owned by a cluster, oldest first.
    async fn list_by_cluster(&self, cluster_id: ClusterId) -> CatalogRepositoryResult<Vec<Case>>;
}

/// Errors returned by catalog repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CatalogRepositoryError {
    /// A cluster with the same identifier already exists.
    #[error("duplicate cluster identifier: {0}")]
    DuplicateCluster(ClusterId),

    /// A cluster already owns the external index.
    #[error("duplicate cluster index: {0}")]
    DuplicateClusterIndex(ClusterIndex),

    /// A case with the same identifier already exists.
    #[error("duplicate case identifier: {0}")]
    DuplicateCase(CaseId),

    /// The cluster was not found.
    #[error("cluster not found: {0}")]
    ClusterNotFound(ClusterId),

    /// The case was not found.
    #[error("case not found: {0}")]
    CaseNotFound(CaseId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CatalogRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
