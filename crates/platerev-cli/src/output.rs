//! Per-location review output.
//!
//! One pretty-printed JSON array per location, plus an append-only summary
//! text file recording `slug: count` lines. The summary file is named after
//! the output directory itself (`reviews/reviews.txt` for the default
//! configuration), so separate runs into separate directories keep separate
//! tallies.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;

use platerev_core::OutputMode;
use platerev_scraper::Review;

pub(crate) struct ReviewWriter {
    out_dir: PathBuf,
    summary_path: PathBuf,
    mode: OutputMode,
}

impl ReviewWriter {
    /// Create the output directory and the writer over it.
    pub(crate) fn new(out_dir: PathBuf, mode: OutputMode) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;

        let dir_name = out_dir
            .file_name()
            .and_then(|name| name.to_str())
            .map_or_else(|| "summary".to_string(), str::to_owned);
        let summary_path = out_dir.join(format!("{dir_name}.txt"));

        Ok(Self {
            out_dir,
            summary_path,
            mode,
        })
    }

    /// Write one location's reviews and append its summary line.
    ///
    /// Returns the number of records written.
    pub(crate) fn write_location(&self, slug: &str, reviews: &[Review]) -> anyhow::Result<usize> {
        let json_path = self.out_dir.join(format!("{slug}.json"));
        let file = File::create(&json_path)
            .with_context(|| format!("failed to create {}", json_path.display()))?;

        match self.mode {
            OutputMode::Full => serde_json::to_writer_pretty(&file, reviews)?,
            OutputMode::RatingsOnly => {
                let ratings: Vec<_> = reviews.iter().map(|review| &review.ratings).collect();
                serde_json::to_writer_pretty(&file, &ratings)?;
            }
        }
        tracing::info!(path = %json_path.display(), count = reviews.len(), "wrote reviews");

        let mut summary = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.summary_path)
            .with_context(|| format!("failed to open {}", self.summary_path.display()))?;
        writeln!(summary, "{slug}: {}", reviews.len())
            .with_context(|| format!("failed to append to {}", self.summary_path.display()))?;

        Ok(reviews.len())
    }
}
