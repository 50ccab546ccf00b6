// src/export/csv.rs

use anyhow::{Context, Result};
use arrow::{
    array::{Array, ArrayRef, AsArray, BooleanArray, StringArray},
    datatypes::{DataType, Date32Type, Field, Schema},
    record_batch::{RecordBatch, RecordBatchOptions},
    util::display::{ArrayFormatter, FormatOptions},
};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

use super::ensure_parent_dir;
use crate::normalize::coerce_column;
use crate::schema::{ColumnType, DATE_COLUMNS};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Replace every date column with its `YYYY-MM-DD` text rendering.
/// Values that are not dates become nulls, which the writer emits as empty fields.
pub fn render_dates(batch: &RecordBatch) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(batch.num_columns());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns());

    for (field, array) in batch.schema_ref().fields().iter().zip(batch.columns()) {
        if !DATE_COLUMNS.contains(&field.name().as_str()) {
            fields.push(field.as_ref().clone());
            columns.push(array.clone());
            continue;
        }
        let dates = coerce_column(field.name(), array, ColumnType::Date)?;
        let rendered: StringArray = dates
            .as_primitive::<Date32Type>()
            .iter()
            .map(|d| d.map(|d| Date32Type::to_naive_date(d).format(DATE_FORMAT).to_string()))
            .collect();
        fields.push(Field::new(field.name(), DataType::Utf8, true));
        columns.push(Arc::new(rendered));
    }

    RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        columns,
        &RecordBatchOptions::new().with_row_count(Some(batch.num_rows())),
    )
    .context("building date-rendered RecordBatch")
}

enum CellFormatter<'a> {
    Bool(&'a BooleanArray),
    Display(ArrayFormatter<'a>),
}

impl CellFormatter<'_> {
    fn render(&self, row: usize) -> String {
        match self {
            CellFormatter::Bool(flags) if flags.is_null(row) => String::new(),
            CellFormatter::Bool(flags) => bool_text(flags.value(row)).to_string(),
            CellFormatter::Display(f) => f.value(row).to_string(),
        }
    }
}

fn bool_text(flag: bool) -> &'static str {
    if flag {
        "True"
    } else {
        "False"
    }
}

/// Render every cell of `batch` as CSV text; nulls become empty strings.
/// Booleans are written `True`/`False`, everything else via Arrow's display.
pub fn render_cells(batch: &RecordBatch) -> Result<Vec<Vec<String>>> {
    let options = FormatOptions::default().with_null("");
    let formatters = batch
        .columns()
        .iter()
        .map(|col| match col.data_type() {
            DataType::Boolean => Ok(CellFormatter::Bool(col.as_boolean())),
            _ => ArrayFormatter::try_new(col.as_ref(), &options).map(CellFormatter::Display),
        })
        .collect::<Result<Vec<_>, _>>()
        .context("building cell formatters")?;

    Ok((0..batch.num_rows())
        .map(|row| formatters.iter().map(|f| f.render(row)).collect())
        .collect())
}

/// Write `batch` to `path` as UTF-8 CSV: comma-delimited, `\n` line endings,
/// header row, dates as `YYYY-MM-DD`, quotes only where needed (embedded quotes doubled).
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = batch.num_rows()))]
pub fn export_csv(batch: &RecordBatch, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;

    let rendered = render_dates(batch)?;
    let cells = render_cells(&rendered)?;

    let file =
        File::create(path).with_context(|| format!("creating CSV file {}", path.display()))?;
    let mut writer = WriterBuilder::new()
        .delimiter(b',')
        .terminator(Terminator::Any(b'\n'))
        .quote_style(QuoteStyle::Necessary)
        .from_writer(file);

    writer
        .write_record(rendered.schema_ref().fields().iter().map(|f| f.name()))
        .with_context(|| format!("writing CSV header to {}", path.display()))?;
    for record in &cells {
        writer
            .write_record(record)
            .with_context(|| format!("writing CSV row to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;

    info!(cols = rendered.num_columns(), "wrote CSV");
    Ok(())
}
