//! In-memory case repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::catalog::{
    domain::{Case, CaseId, ClusterId},
    ports::{CaseRepository, CatalogRepositoryError, CatalogRepositoryResult},
};

/// Thread-safe in-memory case repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCaseRepository {
    state: Arc<RwLock<InMemoryCaseState>>,
}

#[derive(Debug, Default)]
struct InMemoryCaseState {
    cases: HashMap<CaseId, Case>,
    insertion_order: Vec<CaseId>,
}

impl InMemoryCaseRepository {
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
impl CaseRepository for InMemoryCaseRepository {
    async fn store(&self, case: &Case) -> CatalogRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        if state.cases.contains_key(&case.id()) {
            return Err(CatalogRepositoryError::DuplicateCase(case.id()));
        }
        state.insertion_order.push(case.id());
        state.cases.insert(case.id(), case.clone());
        Ok(())
    }

    async fn update(&self, case: &Case) -> CatalogRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        let stored = state
            .cases
            .get_mut(&case.id())
            .ok_or(CatalogRepositoryError::CaseNotFound(case.id()))?;
        *stored = case.clone();
        Ok(())
    }

    async fn delete(&self, id: CaseId) -> CatalogRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| lock_error(&err))?;
        if state.cases.remove(&id).is_none() {
            return Err(CatalogRepositoryError::CaseNotFound(id));
        }
        state.insertion_order.retain(|stored_id| *stored_id != id);
        Ok(())
    }

    async fn find_by_id(&self, id: CaseId) -> CatalogRepositoryResult<Option<Case>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state.cases.get(&id).cloned())
    }

    async fn list_by_cluster(&self, cluster_id: ClusterId) -> CatalogRepositoryResult<Vec<Case>> {
        let state = self.state.read().map_err(|err| lock_error(&err))?;
        Ok(state
            .insertion_order
            .iter()
            .filter_map(|id| state.cases.get(id))
            .filter(|case| case.cluster_id() == Some(cluster_id))
            .cloned()
            .collect())
    }
}
