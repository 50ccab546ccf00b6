// src/inspect.rs

use anyhow::{bail, ensure, Context, Result};
use arrow::{compute::concat_batches, record_batch::RecordBatch};
use csv::ReaderBuilder;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::{fmt, fs::File, path::Path};
use tracing::{debug, info, instrument};

use crate::export::{render_cells, render_dates};

/// A CSV file as read back: header names plus every row as strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Per-column facts from a Parquet footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSummary {
    pub name: String,
    pub physical: String,
    pub logical: Option<String>,
    /// Summed over row groups; None when any row group lacks statistics.
    pub null_count: Option<u64>,
}

/// File-level facts from a Parquet footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParquetSummary {
    pub created_by: Option<String>,
    pub version: i32,
    pub num_rows: i64,
    pub num_row_groups: usize,
    pub file_size: u64,
    pub columns: Vec<ColumnSummary>,
}

/// Read a whole Parquet file back into one batch.
pub fn read_parquet(path: &Path) -> Result<RecordBatch> {
    let file =
        File::open(path).with_context(|| format!("opening Parquet file {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .with_context(|| format!("reading Parquet metadata of {}", path.display()))?;
    let schema = builder.schema().clone();
    let reader = builder
        .build()
        .with_context(|| format!("building Parquet reader for {}", path.display()))?;

    let batches = reader
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("decoding rows of {}", path.display()))?;
    concat_batches(&schema, &batches).context("concatenating Parquet batches")
}

/// Read a CSV file with a header row; every field is kept as text.
pub fn read_csv(path: &Path) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening CSV file {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("reading CSV header of {}", path.display()))?
        .iter()
        .map(str::to_owned)
        .collect();
    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("reading CSV row {} of {}", i, path.display()))?;
        rows.push(record.iter().map(str::to_owned).collect());
    }

    Ok(CsvTable { headers, rows })
}

/// Summarize a Parquet file's footer: schema, row groups, null counts.
pub fn describe_parquet(path: &Path) -> Result<ParquetSummary> {
    let file =
        File::open(path).with_context(|| format!("opening Parquet file {}", path.display()))?;
    let reader = SerializedFileReader::new(file)
        .with_context(|| format!("reading Parquet footer of {}", path.display()))?;
    let meta = reader.metadata();
    let file_meta = meta.file_metadata();
    let file_size = std::fs::metadata(path)
        .with_context(|| format!("stat {}", path.display()))?
        .len();

    let columns = file_meta
        .schema_descr()
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, descr)| {
            let null_count = meta.row_groups().iter().try_fold(0u64, |acc, rg| {
                rg.column(idx)
                    .statistics()
                    .and_then(|s| s.null_count_opt())
                    .map(|n| acc + n)
            });
            ColumnSummary {
                name: descr.name().to_string(),
                physical: format!("{:?}", descr.physical_type()),
                logical: descr.logical_type().as_ref().map(|lt| format!("{:?}", lt)),
                null_count,
            }
        })
        .collect();

    Ok(ParquetSummary {
        created_by: file_meta.created_by().map(str::to_owned),
        version: file_meta.version(),
        num_rows: file_meta.num_rows(),
        num_row_groups: meta.num_row_groups(),
        file_size,
        columns,
    })
}

impl fmt::Display for ParquetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Created by:           {}",
            self.created_by.as_deref().unwrap_or("<unknown>")
        )?;
        writeln!(f, "Parquet version:      {}", self.version)?;
        writeln!(f, "Total rows:           {}", self.num_rows)?;
        writeln!(f, "Number of row groups: {}", self.num_row_groups)?;
        writeln!(f, "File size on disk:    {} bytes", self.file_size)?;
        writeln!(f)?;
        writeln!(f, "=== Columns ===")?;
        for col in &self.columns {
            let nulls = col
                .null_count
                .map_or_else(|| "?".to_string(), |n| n.to_string());
            writeln!(
                f,
                "- {:<14} | Physical: {:<10} | Logical: {:<10} | Nulls: {}",
                col.name,
                col.physical,
                col.logical.as_deref().unwrap_or("<none>"),
                nulls
            )?;
        }
        Ok(())
    }
}

/// Check that a Parquet export and a CSV export carry the same table:
/// same header, same row count, and every Parquet cell renders to the CSV cell.
#[instrument(level = "info", skip_all, fields(parquet = %parquet.display(), csv = %csv.display()))]
pub fn compare_exports(parquet: &Path, csv: &Path) -> Result<()> {
    let batch = render_dates(&read_parquet(parquet)?)?;
    let table = read_csv(csv)?;

    let names: Vec<String> = batch
        .schema_ref()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    ensure!(
        names == table.headers,
        "header mismatch: parquet {:?} vs csv {:?}",
        names,
        table.headers
    );
    ensure!(
        batch.num_rows() == table.rows.len(),
        "row count mismatch: parquet {} vs csv {}",
        batch.num_rows(),
        table.rows.len()
    );

    let cells = render_cells(&batch)?;
    for (row, (expected, found)) in cells.iter().zip(&table.rows).enumerate() {
        for (col, (e, f)) in expected.iter().zip(found).enumerate() {
            if e != f {
                bail!(
                    "row {} column {}: parquet {:?} vs csv {:?}",
                    row,
                    names[col],
                    e,
                    f
                );
            }
        }
        debug!(row, "row matches");
    }

    info!(rows = batch.num_rows(), cols = names.len(), "exports agree");
    Ok(())
}
