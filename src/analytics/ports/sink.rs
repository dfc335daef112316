//! Statistics sink port.

use crate::analytics::domain::{ClusterSummary, TimingSample};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for statistics sink operations.
pub type StatisticsSinkResult<T> = Result<T, StatisticsSinkError>;

/// Destination for closure timings and their aggregate.
#[async_trait]
pub trait StatisticsSink: Send + Sync {
    /// Appends one sample to the sample log.
    async fn append_sample(&self, sample: &TimingSample) -> StatisticsSinkResult<()>;

    /// Rebuilds the per-cluster summary from the full sample log and returns
    /// it.
    async fn recompute_aggregate(&self) -> StatisticsSinkResult<Vec<ClusterSummary>>;
}

/// Errors returned by statistics sinks.
#[derive(Debug, Clone, Error)]
pub enum StatisticsSinkError {
    /// A line of the sample log could not be decoded.
    #[error("sample log line {line} is malformed: {source}")]
    CorruptSample {
        /// One-based line number.
        line: usize,
        /// Decoding error.
        #[source]
        source: Arc<serde_json::Error>,
    },

    /// The underlying storage failed.
    #[error("statistics storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl StatisticsSinkError {
    /// Wraps a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
