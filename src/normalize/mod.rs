// src/normalize/mod.rs

pub mod convert;
pub mod date_parser;
pub mod headers;
pub mod utils;

pub use convert::coerce_column;
pub use headers::normalize_header;

use anyhow::{Context, Result};
use arrow::{
    array::{new_null_array, ArrayRef},
    datatypes::{Field, Schema},
    record_batch::{RecordBatch, RecordBatchOptions},
};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::schema::{canonical_rank, declared_type, map_to_arrow_type, ORDER, SCHEMA};

/// Make any batch conform to the handoff schema:
/// 1) normalize every header,
/// 2) add schema columns that are missing as typed nulls,
/// 3) coerce declared columns to their type (bad values → null),
/// 4) put canonical columns first in canonical order, then everything else
///    in its existing relative order.
#[instrument(level = "info", skip(batch), fields(rows = batch.num_rows(), cols = batch.num_columns()))]
pub fn normalize_and_order(batch: &RecordBatch) -> Result<RecordBatch> {
    let rows = batch.num_rows();

    // 1) headers
    let mut columns: Vec<(String, ArrayRef)> = batch
        .schema_ref()
        .fields()
        .iter()
        .zip(batch.columns())
        .map(|(field, array)| (normalize_header(field.name()), array.clone()))
        .collect();

    // 2) missing schema columns
    for col in SCHEMA {
        if !columns.iter().any(|(name, _)| name == col.name) {
            debug!(column = col.name, "synthesizing missing column as nulls");
            columns.push((
                col.name.to_string(),
                new_null_array(&map_to_arrow_type(col.ty), rows),
            ));
        }
    }

    // 3) coercion
    for (name, array) in columns.iter_mut() {
        if let Some(ty) = declared_type(name.as_str()) {
            *array = coerce_column(name.as_str(), array, ty)?;
        }
    }

    // 4) stable sort: unknown columns share the last rank and keep their order
    columns.sort_by_key(|(name, _)| canonical_rank(name).unwrap_or(ORDER.len()));

    let fields: Vec<Field> = columns
        .iter()
        .map(|(name, array)| Field::new(name, array.data_type().clone(), true))
        .collect();
    let arrays: Vec<ArrayRef> = columns.into_iter().map(|(_, array)| array).collect();

    let out = RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        arrays,
        &RecordBatchOptions::new().with_row_count(Some(rows)),
    )
    .context("building normalized RecordBatch")?;
    debug!(cols = out.num_columns(), "normalized batch");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{create_sample_batch, MAX_SAMPLE_ROWS};
    use arrow::array::{Array, AsArray, StringArray};
    use arrow::datatypes::{DataType, Date32Type, Float64Type};
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn names(batch: &RecordBatch) -> Vec<String> {
        batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    fn string_batch(cols: &[(&str, Vec<Option<&str>>)]) -> RecordBatch {
        let fields: Vec<Field> = cols
            .iter()
            .map(|(name, _)| Field::new(*name, DataType::Utf8, true))
            .collect();
        let arrays: Vec<ArrayRef> = cols
            .iter()
            .map(|(_, values)| Arc::new(StringArray::from(values.clone())) as ArrayRef)
            .collect();
        RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).unwrap()
    }

    #[test]
    fn sample_is_already_conformant() -> Result<()> {
        for n in 0..=MAX_SAMPLE_ROWS {
            let out = normalize_and_order(&create_sample_batch(n, today())?)?;
            assert_eq!(out.num_rows(), n);
            assert_eq!(names(&out), ORDER);
            for col in SCHEMA {
                let field = out.schema_ref().field_with_name(col.name)?.clone();
                assert_eq!(field.data_type(), &map_to_arrow_type(col.ty));
            }
        }
        Ok(())
    }

    #[test]
    fn sample_nan_amount_becomes_null() -> Result<()> {
        let out = normalize_and_order(&create_sample_batch(MAX_SAMPLE_ROWS, today())?)?;
        let amount = out.column(8).as_primitive::<Float64Type>();
        assert!(amount.is_null(7));
        assert_eq!(amount.null_count(), 1);
        assert_eq!(amount.value(2), -12.5);
        let recurring = out.column(9).as_boolean();
        assert!(recurring.is_null(4));
        assert_eq!(recurring.null_count(), 1);
        Ok(())
    }

    #[test]
    fn missing_schema_columns_are_typed_nulls() -> Result<()> {
        let input = string_batch(&[(" Txn ID ", vec![Some("A1"), Some("A2")])]);
        let out = normalize_and_order(&input)?;

        assert_eq!(
            names(&out),
            vec![
                "txn_id",
                "account_id",
                "merchant",
                "memo",
                "category",
                "currency",
                "amount"
            ]
        );
        let memo = out.column_by_name("memo").unwrap();
        assert_eq!(memo.data_type(), &DataType::Utf8);
        assert_eq!(memo.null_count(), 2);
        let amount = out.column_by_name("amount").unwrap();
        assert_eq!(amount.data_type(), &DataType::Float64);
        assert_eq!(amount.null_count(), 2);
        Ok(())
    }

    #[test]
    fn reversed_input_is_reordered_with_extras_last() -> Result<()> {
        let mut cols: Vec<(&str, Vec<Option<&str>>)> = ORDER
            .iter()
            .rev()
            .map(|name| {
                let value = match *name {
                    "txn_date" | "posted_date" => "2024-05-01",
                    "is_recurring" | "is_refund" => "false",
                    "amount" => "1.25",
                    _ => "x",
                };
                (*name, vec![Some(value)])
            })
            .collect();
        cols.insert(3, ("Notes", vec![Some("free text")]));
        cols.push(("zz extra", vec![None]));

        let out = normalize_and_order(&string_batch(&cols))?;
        let mut expected: Vec<&str> = ORDER.to_vec();
        expected.push("notes");
        expected.push("zz_extra");
        assert_eq!(names(&out), expected);

        let txn_date = out.column_by_name("txn_date").unwrap();
        assert_eq!(
            txn_date.as_primitive::<Date32Type>().value(0),
            Date32Type::from_naive_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
        );
        let refund = out.column_by_name("is_refund").unwrap();
        assert_eq!(refund.data_type(), &DataType::Boolean);
        assert!(!refund.as_boolean().value(0));
        // extras are left untouched
        assert_eq!(
            out.column_by_name("notes").unwrap().data_type(),
            &DataType::Utf8
        );
        Ok(())
    }

    #[test]
    fn unknown_booleans_are_not_false() -> Result<()> {
        let input = string_batch(&[(
            "Is Recurring",
            vec![Some("true"), None, Some("n/a"), Some("false")],
        )]);
        let out = normalize_and_order(&input)?;
        let flags = out.column_by_name("is_recurring").unwrap().as_boolean();
        assert!(flags.value(0));
        assert!(flags.is_null(1));
        assert!(flags.is_null(2));
        assert!(!flags.is_null(3) && !flags.value(3));
        Ok(())
    }

    #[test]
    fn headers_normalize_idempotently_through_the_pipeline() -> Result<()> {
        let input = string_batch(&[
            ("Posted  Date", vec![Some("2024-01-01")]),
            ("MERCHANT-NAME", vec![Some("Acme")]),
        ]);
        let once = normalize_and_order(&input)?;
        let twice = normalize_and_order(&once)?;
        assert_eq!(names(&once), names(&twice));
        assert!(names(&once).contains(&"merchant_name".to_string()));
        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn empty_input_still_gets_the_schema() -> Result<()> {
        let out = normalize_and_order(&RecordBatch::new_empty(Arc::new(Schema::empty())))?;
        assert_eq!(out.num_rows(), 0);
        assert_eq!(out.num_columns(), SCHEMA.len());
        Ok(())
    }
}
