//! Filesystem-backed statistics sink.
//!
//! Samples go to a JSON Lines log opened in append mode. The summary is
//! written to a temporary sibling and renamed over the previous file, so
//! readers never observe a partially written CSV.

use crate::analytics::{
    domain::{ClusterSummary, TimingSample, render_summary_csv, summarise},
    ports::{StatisticsSink, StatisticsSinkError, StatisticsSinkResult},
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::OpenOptions;
use cap_std::fs_utf8::Dir;
use std::io::{ErrorKind, Write};
use std::sync::Arc;

/// Statistics sink writing into a single capability-scoped directory.
#[derive(Debug, Clone)]
pub struct FileStatisticsSink {
    dir: Arc<Dir>,
    samples_file: Utf8PathBuf,
    summary_file: Utf8PathBuf,
}

impl FileStatisticsSink {
    /// Opens (creating if needed) the statistics directory.
    ///
    /// # Errors
    ///
    /// Returns [`StatisticsSinkError::Storage`] when the directory cannot be
    /// created or opened.
    pub fn open(
        directory: &Utf8Path,
        samples_file: impl Into<Utf8PathBuf>,
        summary_file: impl Into<Utf8PathBuf>,
    ) -> StatisticsSinkResult<Self> {
        Dir::create_ambient_dir_all(directory, ambient_authority())
            .map_err(StatisticsSinkError::storage)?;
        let dir = Dir::open_ambient_dir(directory, ambient_authority())
            .map_err(StatisticsSinkError::storage)?;
        Ok(Self {
            dir: Arc::new(dir),
            samples_file: samples_file.into(),
            summary_file: summary_file.into(),
        })
    }

    async fn run_blocking<F, T>(&self, f: F) -> StatisticsSinkResult<T>
    where
        F: FnOnce(&Dir, &Utf8Path, &Utf8Path) -> StatisticsSinkResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        let samples_file = self.samples_file.clone();
        let summary_file = self.summary_file.clone();
        tokio::task::spawn_blocking(move || f(&dir, &samples_file, &summary_file))
            .await
            .map_err(StatisticsSinkError::storage)?
    }
}

#[async_trait]
impl StatisticsSink for FileStatisticsSink {
    async fn append_sample(&self, sample: &TimingSample) -> StatisticsSinkResult<()> {
        let mut line = serde_json::to_string(sample).map_err(StatisticsSinkError::storage)?;
        line.push('\n');

        self.run_blocking(move |dir, samples_file, _| {
            let mut options = OpenOptions::new();
            options.append(true).create(true);
            let mut file = dir
                .open_with(samples_file, &options)
                .map_err(StatisticsSinkError::storage)?;
            file.write_all(line.as_bytes())
                .map_err(StatisticsSinkError::storage)?;
            file.flush().map_err(StatisticsSinkError::storage)
        })
        .await
    }

    async fn recompute_aggregate(&self) -> StatisticsSinkResult<Vec<ClusterSummary>> {
        self.run_blocking(|dir, samples_file, summary_file| {
            let samples = read_samples(dir, samples_file)?;
            let summaries = summarise(&samples);

            let staging = summary_file.with_extension("csv.tmp");
            dir.write(&staging, render_summary_csv(&summaries))
                .map_err(StatisticsSinkError::storage)?;
            dir.rename(&staging, dir, summary_file)
                .map_err(StatisticsSinkError::storage)?;
            Ok(summaries)
        })
        .await
    }
}

fn read_samples(dir: &Dir, samples_file: &Utf8Path) -> StatisticsSinkResult<Vec<TimingSample>> {
    let contents = match dir.read_to_string(samples_file) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(StatisticsSinkError::storage(err)),
    };

    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line).map_err(|err| StatisticsSinkError::CorruptSample {
                line: number.saturating_add(1),
                source: Arc::new(err),
            })
        })
        .collect()
}
