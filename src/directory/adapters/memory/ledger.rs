//! In-memory load ledger.

use super::lock_error;
use crate::directory::{
    domain::{LoadLedgerEntry, UserId},
    ports::{DirectoryRepositoryResult, LoadLedger},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory ledger keeping entries in append order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoadLedger {
    entries: Arc<RwLock<Vec<LoadLedgerEntry>>>,
}

impl InMemoryLoadLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoadLedger for InMemoryLoadLedger {
    async fn append(&self, entry: &LoadLedgerEntry) -> DirectoryRepositoryResult<()> {
        let mut entries = self.entries.write().map_err(|err| lock_error(&err))?;
        entries.push(entry.clone());
        Ok(())
    }

    async fn entries_for(&self, user_id: UserId) -> DirectoryRepositoryResult<Vec<LoadLedgerEntry>> {
        let entries = self.entries.read().map_err(|err| lock_error(&err))?;
        Ok(entries
            .iter()
            .filter(|entry| entry.user_id() == user_id)
            .cloned()
            .collect())
    }
}
