//! In-memory cluster repository.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::catalog::{
    domain::{Cluster, ClusterId, ClusterIndex},
    ports::{CatalogRepositoryError, CatalogRepositoryResult, ClusterRepository},
};

/// Thread-safe in-memory cluster repository.
///
/// The index map plays the role of the unique constraint on the external
/// index, so racing creates for one index resolve to a single winner.
#[derive(Debug, Clone, Default)]
pub struct InMemoryClusterRepository {
    state: Arc<RwLock<InMemoryClusterState>>,
}

#[derive(Debug, Default)]
struct InMemoryClusterState {
    clusters: HashMap<ClusterId, Cluster>,
    index: BTreeMap<ClusterIndex, ClusterId>,
}

impl InMemoryClusterRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: &impl ToString) -> CatalogRepositoryError {
    CatalogRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ClusterRepository for InMemoryClusterRepository {
    async fn store(&self, cluster: &Cluster) -> CatalogRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        if state.clusters.contains_key(&cluster.id()) {
            return Err(CatalogRepositoryError::DuplicateCluster(cluster.id()));
        }
        if state.index.contains_key(&cluster.index()) {
            return Err(CatalogRepositoryError::DuplicateClusterIndex(
                cluster.index(),
            ));
        }
        state.index.insert(cluster.index(), cluster.id());
        state.clusters.insert(cluster.id(), cluster.clone());
        Ok(())
    }

    async fn update(&self, cluster: &Cluster) -> CatalogRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        let stored = state
            .clusters
            .get_mut(&cluster.id())
            .ok_or(CatalogRepositoryError::ClusterNotFound(cluster.id()))?;
        *stored = cluster.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: ClusterId) -> CatalogRepositoryResult<Option<Cluster>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.clusters.get(&id).cloned())
    }

    async fn find_by_index(&self, index: ClusterIndex) -> CatalogRepositoryResult<Option<Cluster>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state
            .index
            .get(&index)
            .and_then(|id| state.clusters.get(id))
            .cloned())
    }

    async fn list_all(&self) -> CatalogRepositoryResult<Vec<Cluster>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state
            .index
            .values()
            .filter_map(|id| state.clusters.get(id).cloned())
            .collect())
    }
}
