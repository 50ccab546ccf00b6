// src/export/parquet.rs

use anyhow::{Context, Result};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use tracing::{info, instrument};

use super::ensure_parent_dir;

/// Write `batch` to `path` as a single-row-group Parquet file, replacing any
/// existing file. The Arrow schema is embedded so Date32 and nullable Boolean
/// columns read back with their original types.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = batch.num_rows()))]
pub fn export_parquet(batch: &RecordBatch, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_dictionary_enabled(true)
        .build();

    let file = File::create(path)
        .with_context(|| format!("creating Parquet file {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .with_context(|| format!("opening Parquet writer for {}", path.display()))?;
    writer
        .write(batch)
        .with_context(|| format!("writing rows to {}", path.display()))?;
    writer
        .close()
        .with_context(|| format!("finalizing {}", path.display()))?;

    info!(cols = batch.num_columns(), "wrote Parquet");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::read_parquet;
    use crate::normalize::normalize_and_order;
    use crate::sample::{create_sample_batch, MAX_SAMPLE_ROWS};
    use arrow::array::{Array, AsArray};
    use arrow::datatypes::Float64Type;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn normalized() -> Result<RecordBatch> {
        let today = NaiveDate::from_ymd_opt(2024, 10, 1).unwrap();
        normalize_and_order(&create_sample_batch(MAX_SAMPLE_ROWS, today)?)
    }

    #[test]
    fn round_trips_types_and_nulls() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested/deeper/sample.parquet");
        let batch = normalized()?;

        export_parquet(&batch, &path)?;
        let read = read_parquet(&path)?;

        assert_eq!(read.num_rows(), batch.num_rows());
        assert_eq!(read.num_columns(), batch.num_columns());
        for (i, field) in batch.schema_ref().fields().iter().enumerate() {
            let got = read.schema_ref().field(i).clone();
            assert_eq!(got.name(), field.name());
            assert_eq!(got.data_type(), field.data_type());
            assert_eq!(read.column(i), batch.column(i), "column {}", field.name());
        }

        // unknown booleans and the missing amount survive as nulls
        let recurring = read.column_by_name("is_recurring").unwrap().as_boolean();
        assert!(recurring.is_null(4));
        let amount = read
            .column_by_name("amount")
            .unwrap()
            .as_primitive::<Float64Type>();
        assert!(amount.is_null(7));
        Ok(())
    }

    #[test]
    fn overwrites_existing_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("sample.parquet");
        std::fs::write(&path, b"stale bytes that are not parquet")?;

        export_parquet(&normalized()?, &path)?;
        assert_eq!(read_parquet(&path)?.num_rows(), MAX_SAMPLE_ROWS);
        Ok(())
    }

    #[test]
    fn unwritable_destination_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        // a regular file where a directory is expected
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"")?;
        let err = export_parquet(&normalized()?, &blocker.join("out.parquet")).unwrap_err();
        assert!(format!("{err:#}").contains("blocker"), "{err:#}");
        Ok(())
    }
}
