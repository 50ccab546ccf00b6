// src/pipeline.rs

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::{export, inspect, normalize, sample};

pub const PARQUET_FILE_NAME: &str = "pq_handoff_sample.parquet";
pub const CSV_FILE_NAME: &str = "pq_handoff_sample.csv";

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Destination directory, created if absent.
    pub outdir: PathBuf,
    /// How many of the demo rows to emit.
    pub rows: usize,
    /// Date the sample is laid out against (first transaction is ten days earlier).
    pub today: NaiveDate,
    /// Read both files back and compare them after writing.
    pub verify: bool,
}

impl Config {
    pub fn new(outdir: impl Into<PathBuf>, today: NaiveDate) -> Self {
        Self {
            outdir: outdir.into(),
            rows: sample::MAX_SAMPLE_ROWS,
            today,
            verify: false,
        }
    }
}

/// Where the two handoff files land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffPaths {
    pub parquet: PathBuf,
    pub csv: PathBuf,
}

impl HandoffPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            parquet: dir.join(PARQUET_FILE_NAME),
            csv: dir.join(CSV_FILE_NAME),
        }
    }
}

/// Build → normalize → write Parquet → write CSV (→ verify).
#[instrument(level = "info", skip(config), fields(outdir = %config.outdir.display(), rows = config.rows))]
pub fn run(config: &Config) -> Result<HandoffPaths> {
    let raw = sample::create_sample_batch(config.rows, config.today)
        .context("building sample table")?;
    let table = normalize::normalize_and_order(&raw).context("normalizing sample table")?;

    let paths = HandoffPaths::in_dir(&config.outdir);
    export::export_parquet(&table, &paths.parquet)?;
    export::export_csv(&table, &paths.csv)?;

    if config.verify {
        inspect::compare_exports(&paths.parquet, &paths.csv)
            .context("verifying written files")?;
    }

    info!(rows = table.num_rows(), cols = table.num_columns(), "handoff files written");
    Ok(paths)
}
