//! Service layer for case and cluster management.

use crate::catalog::{
    domain::{Case, CaseId, CatalogDomainError, Cluster, ClusterId, ClusterIndex, ClusterName},
    ports::{CaseRepository, CatalogRepositoryError, ClusterRepository},
};
use crate::error::ErrorKind;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Request payload for resolving a cluster by external index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveClusterRequest {
    index: ClusterIndex,
    name: String,
    frequency: u64,
}

impl ResolveClusterRequest {
    /// Creates a request. Name and frequency are only used when the cluster
    /// does not exist yet.
    #[must_use]
    pub fn new(index: i64, name: impl Into<String>, frequency: u64) -> Self {
        Self {
            index: ClusterIndex::new(index),
            name: name.into(),
            frequency,
        }
    }

    /// Returns the requested external index.
    #[must_use]
    pub const fn index(&self) -> ClusterIndex {
        self.index
    }
}

/// Request payload for creating a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCaseRequest {
    title: String,
    solution: String,
    cluster_id: Option<ClusterId>,
}

impl CreateCaseRequest {
    /// Creates a request for an unscoped case.
    #[must_use]
    pub fn new(title: impl Into<String>, solution: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            solution: solution.into(),
            cluster_id: None,
        }
    }

    /// Scopes the case to a cluster.
    #[must_use]
    pub const fn with_cluster(mut self, cluster_id: ClusterId) -> Self {
        self.cluster_id = Some(cluster_id);
        self
    }
}

/// Service-level errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] CatalogDomainError),

    /// Repository operation failed.
    #[error("{operation}: {source}")]
    Repository {
        /// Name of the failing catalog operation.
        operation: &'static str,
        /// Underlying repository error.
        #[source]
        source: CatalogRepositoryError,
    },

    /// No cluster exists with the given identifier.
    #[error("cluster {0} not found")]
    ClusterNotFound(ClusterId),

    /// No case exists with the given identifier.
    #[error("case {0} not found")]
    CaseNotFound(CaseId),
}

impl CatalogServiceError {
    /// Wraps a repository error with the failing operation name.
    #[must_use]
    pub const fn repository(operation: &'static str, source: CatalogRepositoryError) -> Self {
        Self::Repository { operation, source }
    }

    /// Classifies the error into the crate-wide taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::InvalidInput,
            Self::ClusterNotFound(_) | Self::CaseNotFound(_) => ErrorKind::NotFound,
            Self::Repository { source, .. } => match source {
                CatalogRepositoryError::DuplicateCluster(_)
                | CatalogRepositoryError::DuplicateClusterIndex(_)
                | CatalogRepositoryError::DuplicateCase(_) => ErrorKind::Duplicate,
                CatalogRepositoryError::ClusterNotFound(_)
                | CatalogRepositoryError::CaseNotFound(_) => ErrorKind::NotFound,
                CatalogRepositoryError::Persistence(_) => ErrorKind::Dependency,
            },
        }
    }
}

/// Result type for catalog service operations.
pub type CatalogServiceResult<T> = Result<T, CatalogServiceError>;

/// Case and cluster orchestration service.
#[derive(Clone)]
pub struct CatalogService<CR, KR, C>
where
    CR: CaseRepository,
    KR: ClusterRepository,
    C: Clock + Send + Sync,
{
    cases: Arc<CR>,
    clusters: Arc<KR>,
    clock: Arc<C>,
}

impl<CR, KR, C> CatalogService<CR, KR, C>
where
    CR: CaseRepository,
    KR: ClusterRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new catalog service.
    #[must_use]
    pub const fn new(cases: Arc<CR>, clusters: Arc<KR>, clock: Arc<C>) -> Self {
        Self {
            cases,
            clusters,
            clock,
        }
    }

    /// Returns the cluster owning the external index, creating it on first
    /// reference.
    ///
    /// When a concurrent caller creates the same index first, the lookup is
    /// repeated once and the winner's cluster is returned.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Domain`] when a new cluster would have an
    /// empty name, or a repository error (kind
    /// [`ErrorKind::Duplicate`] when the index collision cannot be resolved).
    #[instrument(skip(self, request), fields(cluster_index = %request.index()))]
    pub async fn resolve_or_create_cluster(
        &self,
        request: ResolveClusterRequest,
    ) -> CatalogServiceResult<Cluster> {
        const OPERATION: &str = "resolve_or_create_cluster";
        let ResolveClusterRequest {
            index,
            name,
            frequency,
        } = request;

        if let Some(existing) = self
            .clusters
            .find_by_index(index)
            .await
            .map_err(|source| CatalogServiceError::repository(OPERATION, source))?
        {
            return Ok(existing);
        }

        let cluster = Cluster::new(index, ClusterName::new(name)?, frequency);
        match self.clusters.store(&cluster).await {
            Ok(()) => {
                info!(cluster_id = %cluster.id(), "cluster created");
                Ok(cluster)
            }
            Err(CatalogRepositoryError::DuplicateClusterIndex(_)) => {
                debug!("cluster created concurrently, repeating lookup");
                self.clusters
                    .find_by_index(index)
                    .await
                    .map_err(|source| CatalogServiceError::repository(OPERATION, source))?
                    .ok_or(CatalogServiceError::repository(
                        OPERATION,
                        CatalogRepositoryError::DuplicateClusterIndex(index),
                    ))
            }
            Err(source) => Err(CatalogServiceError::repository(OPERATION, source)),
        }
    }

    /// Finds a cluster by internal identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when lookup fails.
    pub async fn find_cluster(&self, id: ClusterId) -> CatalogServiceResult<Option<Cluster>> {
        self.clusters
            .find_by_id(id)
            .await
            .map_err(|source| CatalogServiceError::repository("find_cluster", source))
    }

    /// Returns a cluster or a not-found error.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::ClusterNotFound`] when no cluster has
    /// the identifier, or a repository error.
    pub async fn get_cluster(&self, id: ClusterId) -> CatalogServiceResult<Cluster> {
        self.find_cluster(id)
            .await?
            .ok_or(CatalogServiceError::ClusterNotFound(id))
    }

    /// Lists every cluster ordered by external index.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when lookup fails.
    pub async fn list_clusters(&self) -> CatalogServiceResult<Vec<Cluster>> {
        self.clusters
            .list_all()
            .await
            .map_err(|source| CatalogServiceError::repository("list_clusters", source))
    }

    /// Renames a cluster, keeping its external index.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::ClusterNotFound`], a domain error for an
    /// empty name, or a repository error.
    #[instrument(skip(self, name), fields(cluster_id = %id))]
    pub async fn rename_cluster(
        &self,
        id: ClusterId,
        name: impl Into<String> + Send,
    ) -> CatalogServiceResult<Cluster> {
        let validated = ClusterName::new(name)?;
        let mut cluster = self.get_cluster(id).await?;
        cluster.rename(validated);
        self.clusters
            .update(&cluster)
            .await
            .map_err(|source| CatalogServiceError::repository("rename_cluster", source))?;
        Ok(cluster)
    }

    /// Creates a case, optionally scoped to an existing cluster.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::ClusterNotFound`] when the requested
    /// cluster does not exist, a domain error for an empty title, or a
    /// repository error.
    #[instrument(skip(self, request))]
    pub async fn create_case(&self, request: CreateCaseRequest) -> CatalogServiceResult<Case> {
        let CreateCaseRequest {
            title,
            solution,
            cluster_id,
        } = request;
        if let Some(id) = cluster_id {
            self.get_cluster(id).await?;
        }

        let case = Case::new(title, solution, cluster_id, &*self.clock)?;
        self.cases
            .store(&case)
            .await
            .map_err(|source| CatalogServiceError::repository("create_case", source))?;
        info!(case_id = %case.id(), "case created");
        Ok(case)
    }

    /// Finds a case by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when lookup fails.
    pub async fn find_case(&self, id: CaseId) -> CatalogServiceResult<Option<Case>> {
        self.cases
            .find_by_id(id)
            .await
            .map_err(|source| CatalogServiceError::repository("find_case", source))
    }

    /// Returns a case or a not-found error.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::CaseNotFound`] when no case has the
    /// identifier, or a repository error.
    pub async fn get_case(&self, id: CaseId) -> CatalogServiceResult<Case> {
        self.find_case(id)
            .await?
            .ok_or(CatalogServiceError::CaseNotFound(id))
    }

    /// Replaces a case's title and solution.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::CaseNotFound`], a domain error for an
    /// empty title, or a repository error.
    #[instrument(skip(self, title, solution), fields(case_id = %id))]
    pub async fn update_case(
        &self,
        id: CaseId,
        title: impl Into<String> + Send,
        solution: impl Into<String> + Send,
    ) -> CatalogServiceResult<Case> {
        let mut case = self.get_case(id).await?;
        case.revise(title, solution)?;
        self.cases
            .update(&case)
            .await
            .map_err(|source| CatalogServiceError::repository("update_case", source))?;
        Ok(case)
    }

    /// Deletes a case.
    ///
    /// # Errors
    ///
    /// Returns a repository error (kind [`ErrorKind::NotFound`] when the case
    /// does not exist).
    #[instrument(skip(self), fields(case_id = %id))]
    pub async fn delete_case(&self, id: CaseId) -> CatalogServiceResult<()> {
        self.cases
            .delete(id)
            .await
            .map_err(|source| CatalogServiceError::repository("delete_case", source))?;
        info!("case deleted");
        Ok(())
    }

    /// Lists the cases owned by a cluster, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogServiceError::Repository`] when lookup fails.
    pub async fn list_cases_by_cluster(
        &self,
        cluster_id: ClusterId,
    ) -> CatalogServiceResult<Vec<Case>> {
        self.cases
            .list_by_cluster(cluster_id)
            .await
            .map_err(|source| CatalogServiceError::repository("list_cases_by_cluster", source))
    }
}
