//! [`ClusterCatalog`] backed by the catalog service.

use crate::catalog::{
    domain::{Case, CaseId, Cluster, ClusterId},
    ports::{CaseRepository, ClusterRepository},
    services::{CatalogService, CatalogServiceResult, ResolveClusterRequest},
};
use crate::task::ports::ClusterCatalog;
use async_trait::async_trait;
use mockable::Clock;

#[async_trait]
impl<CR, KR, C> ClusterCatalog for CatalogService<CR, KR, C>
where
    CR: CaseRepository,
    KR: ClusterRepository,
    C: Clock + Send + Sync,
{
    async fn resolve_or_create_cluster(
        &self,
        request: ResolveClusterRequest,
    ) -> CatalogServiceResult<Cluster> {
        Self::resolve_or_create_cluster(self, request).await
    }

    async fn find_cluster(&self, id: ClusterId) -> CatalogServiceResult<Option<Cluster>> {
        Self::find_cluster(self, id).await
    }

    async fn find_case(&self, id: CaseId) -> CatalogServiceResult<Option<Case>> {
        Self::find_case(self, id).await
    }
}
