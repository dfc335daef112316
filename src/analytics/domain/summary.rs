//! Per-cluster summary statistics over timing samples.

use super::TimingSample;
use crate::catalog::domain::ClusterIndex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Header row of the CSV summary.
pub const SUMMARY_CSV_HEADER: &str = "ClusterIndex,Count,AvgDuration,MedianDuration,StdDevDuration,AvgReaction,MedianReaction,StdDevReaction";

/// Location and spread of one measured quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    /// Arithmetic mean.
    pub mean: f64,
    /// Median; the mean of the two middle values for even counts.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

/// Aggregated timings for one cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// External cluster index.
    pub cluster_index: ClusterIndex,
    /// Number of samples aggregated.
    pub count: usize,
    /// Resolution time statistics in seconds.
    pub duration: Distribution,
    /// Reaction time statistics in seconds.
    pub reaction: Distribution,
}

/// Groups samples by cluster and summarises each group.
///
/// The result is ordered by cluster index. Clusters without samples do not
/// appear.
#[must_use]
pub fn summarise(samples: &[TimingSample]) -> Vec<ClusterSummary> {
    let mut groups: BTreeMap<ClusterIndex, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for sample in samples {
        let (durations, reactions) = groups.entry(sample.cluster_index()).or_default();
        durations.push(seconds(sample.duration_seconds()));
        reactions.push(seconds(sample.reaction_seconds()));
    }

    groups
        .into_iter()
        .map(|(cluster_index, (durations, reactions))| ClusterSummary {
            cluster_index,
            count: durations.len(),
            duration: describe(durations),
            reaction: describe(reactions),
        })
        .collect()
}

/// Renders summaries as CSV with two decimals per statistic.
#[must_use]
pub fn render_summary_csv(summaries: &[ClusterSummary]) -> String {
    let mut lines = Vec::with_capacity(summaries.len().saturating_add(1));
    lines.push(SUMMARY_CSV_HEADER.to_owned());
    lines.extend(summaries.iter().map(|summary| {
        format!(
            "{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            summary.cluster_index,
            summary.count,
            summary.duration.mean,
            summary.duration.median,
            summary.duration.std_dev,
            summary.reaction.mean,
            summary.reaction.median,
            summary.reaction.std_dev,
        )
    }));
    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

#[expect(
    clippy::cast_precision_loss,
    reason = "timings are whole seconds well inside the exact f64 range"
)]
const fn seconds(value: i64) -> f64 {
    value as f64
}

#[expect(
    clippy::float_arithmetic,
    reason = "summary statistics are fractional by definition"
)]
#[expect(
    clippy::cast_precision_loss,
    reason = "sample counts are far below 2^52"
)]
#[expect(clippy::integer_division, reason = "locates the middle of a sorted sample")]
fn describe(mut values: Vec<f64>) -> Distribution {
    if values.is_empty() {
        return Distribution::default();
    }
    values.sort_by(f64::total_cmp);

    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;

    let middle = values.len() / 2;
    let upper = values.get(middle).copied().unwrap_or_default();
    let median = if values.len().is_multiple_of(2) {
        let lower = middle
            .checked_sub(1)
            .and_then(|index| values.get(index))
            .copied()
            .unwrap_or(upper);
        (lower + upper) / 2.0
    } else {
        upper
    };

    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / count;

    Distribution {
        mean,
        median,
        std_dev: variance.sqrt(),
    }
}
