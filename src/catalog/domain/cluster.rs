//! Cluster aggregate grouping similar tickets.

use super::{ClusterId, ClusterIndex, ClusterName};
use serde::{Deserialize, Serialize};

/// A named group of similar tickets keyed by a stable external index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    id: ClusterId,
    index: ClusterIndex,
    name: ClusterName,
    frequency: u64,
}

/// Parameter object for reconstructing a persisted cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedClusterData {
    /// Persisted cluster identifier.
    pub id: ClusterId,
    /// Persisted external index.
    pub index: ClusterIndex,
    /// Persisted display name.
    pub name: ClusterName,
    /// Persisted observed frequency.
    pub frequency: u64,
}

impl Cluster {
    /// Creates a new cluster for a previously unseen external index.
    #[must_use]
    pub fn new(index: ClusterIndex, name: ClusterName, frequency: u64) -> Self {
        Self {
            id: ClusterId::new(),
            index,
            name,
            frequency,
        }
    }

    /// Reconstructs a cluster from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedClusterData) -> Self {
        Self {
            id: data.id,
            index: data.index,
            name: data.name,
            frequency: data.frequency,
        }
    }

    /// Returns the internal identifier.
    #[must_use]
    pub const fn id(&self) -> ClusterId {
        self.id
    }

    /// Returns the immutable external index.
    #[must_use]
    pub const fn index(&self) -> ClusterIndex {
        self.index
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &ClusterName {
        &self.name
    }

    /// Returns the observed frequency count.
    #[must_use]
    pub const fn frequency(&self) -> u64 {
        self.frequency
    }

    /// Replaces the display name. The external index is left untouched.
    pub fn rename(&mut self, name: ClusterName) {
        self.name = name;
    }
}
