//! Domain model for closure statistics.

mod sample;
mod summary;

pub use sample::TimingSample;
pub use summary::{
    ClusterSummary, Distribution, SUMMARY_CSV_HEADER, render_summary_csv, summarise,
};
