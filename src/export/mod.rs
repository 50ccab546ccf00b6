// src/export/mod.rs

pub mod csv;
pub mod parquet;

pub use self::csv::{export_csv, render_cells, render_dates};
pub use self::parquet::export_parquet;

use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Create every missing parent directory of `path`.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display())),
        _ => Ok(()),
    }
}
