//! Timing samples recorded when a task closes.

use crate::catalog::domain::ClusterIndex;
use serde::{Deserialize, Serialize};

/// Reaction and resolution time of one closed task.
///
/// Reaction is the time from creation to the start of work; duration is the
/// time from the start of work to closure. Both are whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingSample {
    cluster_index: ClusterIndex,
    #[serde(rename = "reaction_time")]
    reaction_seconds: i64,
    #[serde(rename = "duration_time")]
    duration_seconds: i64,
}

impl TimingSample {
    /// Creates a sample for a cluster.
    #[must_use]
    pub const fn new(
        cluster_index: ClusterIndex,
        reaction_seconds: i64,
        duration_seconds: i64,
    ) -> Self {
        Self {
            cluster_index,
            reaction_seconds,
            duration_seconds,
        }
    }

    /// Returns the external index of the task's cluster.
    #[must_use]
    pub const fn cluster_index(&self) -> ClusterIndex {
        self.cluster_index
    }

    /// Returns the reaction time in seconds.
    #[must_use]
    pub const fn reaction_seconds(&self) -> i64 {
        self.reaction_seconds
    }

    /// Returns the resolution time in seconds.
    #[must_use]
    pub const fn duration_seconds(&self) -> i64 {
        self.duration_seconds
    }
}
