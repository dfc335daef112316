//! In-memory statistics sink with failure injection.

use crate::analytics::{
    domain::{ClusterSummary, TimingSample, summarise},
    ports::{StatisticsSink, StatisticsSinkError, StatisticsSinkResult},
};
use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

/// Thread-safe in-memory sink for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStatisticsSink {
    state: Arc<RwLock<SinkState>>,
}

#[derive(Debug, Default)]
struct SinkState {
    samples: Vec<TimingSample>,
    summaries: Vec<ClusterSummary>,
    failing: bool,
}

impl InMemoryStatisticsSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent operation fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .failing = failing;
    }

    /// Returns the recorded samples in append order.
    #[must_use]
    pub fn samples(&self) -> Vec<TimingSample> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .samples
            .clone()
    }

    /// Returns the most recently computed aggregate.
    #[must_use]
    pub fn summaries(&self) -> Vec<ClusterSummary> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .summaries
            .clone()
    }
}

fn injected_failure() -> StatisticsSinkError {
    StatisticsSinkError::storage(std::io::Error::other("statistics sink unavailable"))
}

#[async_trait]
impl StatisticsSink for InMemoryStatisticsSink {
    async fn append_sample(&self, sample: &TimingSample) -> StatisticsSinkResult<()> {
        let mut state = self.state.write().map_err(|err| {
            StatisticsSinkError::storage(std::io::Error::other(err.to_string()))
        })?;
        if state.failing {
            return Err(injected_failure());
        }
        state.samples.push(*sample);
        Ok(())
    }

    async fn recompute_aggregate(&self) -> StatisticsSinkResult<Vec<ClusterSummary>> {
        let mut state = self.state.write().map_err(|err| {
            StatisticsSinkError::storage(std::io::Error::other(err.to_string()))
        })?;
        if state.failing {
            return Err(injected_failure());
        }
        let summaries = summarise(&state.samples);
        state.summaries.clone_from(&summaries);
        Ok(summaries)
    }
}
