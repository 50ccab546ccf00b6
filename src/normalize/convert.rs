// src/normalize/convert.rs

use anyhow::{Context, Result};
use arrow::{
    array::{
        new_null_array, timezone::Tz, Array, ArrayRef, AsArray, BooleanArray, Date32Array,
        Float64Array,
    },
    compute::{can_cast_types, cast_with_options, CastOptions},
    datatypes::{
        ArrowTimestampType, DataType, Date32Type, Float64Type, TimeUnit,
        TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
        TimestampSecondType,
    },
    temporal_conversions::{as_datetime, as_datetime_with_timezone},
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::normalize::{date_parser, utils};
use crate::schema::{map_to_arrow_type, ColumnType};

/// Coerce one column into its declared type.
///
/// Values that cannot be converted become nulls; only Arrow kernel failures are errors.
pub fn coerce_column(name: &str, array: &ArrayRef, ty: ColumnType) -> Result<ArrayRef> {
    let out = match ty {
        ColumnType::Text => to_utf8(array)?,
        ColumnType::Float => to_float64(array)?,
        ColumnType::Date => to_date32(array)?,
        ColumnType::Bool => to_boolean(array)?,
    };
    debug_assert_eq!(out.data_type(), &map_to_arrow_type(ty));

    let nulled = out.null_count().saturating_sub(array.null_count());
    if nulled > 0 {
        debug!(column = name, values = nulled, ty = ?ty, "coerced values to null");
    }
    Ok(out)
}

/// Borrow the values of any string-typed array.
fn string_values(array: &ArrayRef) -> Option<Vec<Option<&str>>> {
    match array.data_type() {
        DataType::Utf8 => Some(array.as_string::<i32>().iter().collect()),
        DataType::LargeUtf8 => Some(array.as_string::<i64>().iter().collect()),
        DataType::Utf8View => Some(array.as_string_view().iter().collect()),
        _ => None,
    }
}

/// Safe Arrow cast: bad values become null, impossible casts give an all-null column.
fn cast_or_null(array: &ArrayRef, to: &DataType) -> Result<ArrayRef> {
    if array.data_type() == to {
        return Ok(array.clone());
    }
    if !can_cast_types(array.data_type(), to) {
        warn!(from = ?array.data_type(), to = ?to, "no cast available; column degraded to nulls");
        return Ok(new_null_array(to, array.len()));
    }
    let opts = CastOptions {
        safe: true,
        ..Default::default()
    };
    cast_with_options(array, to, &opts)
        .with_context(|| format!("casting {} to {}", array.data_type(), to))
}

fn to_utf8(array: &ArrayRef) -> Result<ArrayRef> {
    cast_or_null(array, &DataType::Utf8)
}

// NaN is the float null marker
fn to_float64(array: &ArrayRef) -> Result<ArrayRef> {
    let floats: Float64Array = match string_values(array) {
        Some(values) => values
            .into_iter()
            .map(|opt| opt.and_then(|s| utils::clean_str(s).parse::<f64>().ok()))
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect(),
        None => cast_or_null(array, &DataType::Float64)?
            .as_primitive::<Float64Type>()
            .iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect(),
    };
    Ok(Arc::new(floats))
}

fn to_date32(array: &ArrayRef) -> Result<ArrayRef> {
    if let Some(values) = string_values(array) {
        let dates: Date32Array = values
            .into_iter()
            .map(|opt| {
                opt.and_then(date_parser::parse_date_lenient)
                    .map(Date32Type::from_naive_date)
            })
            .collect();
        return Ok(Arc::new(dates));
    }

    match array.data_type() {
        DataType::Timestamp(unit, tz) => {
            let tz = tz.as_deref();
            let dates = match unit {
                TimeUnit::Second => timestamp_dates::<TimestampSecondType>(array, tz),
                TimeUnit::Millisecond => timestamp_dates::<TimestampMillisecondType>(array, tz),
                TimeUnit::Microsecond => timestamp_dates::<TimestampMicrosecondType>(array, tz),
                TimeUnit::Nanosecond => timestamp_dates::<TimestampNanosecondType>(array, tz),
            };
            Ok(Arc::new(dates))
        }
        _ => cast_or_null(array, &DataType::Date32),
    }
}

/// Local wall date of each timestamp; the zone itself is dropped.
fn timestamp_dates<T: ArrowTimestampType>(array: &ArrayRef, tz: Option<&str>) -> Date32Array {
    let tz: Option<Tz> = tz.and_then(|name| match name.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(e) => {
            warn!(tz = name, error = %e, "unknown timezone; using naive timestamps");
            None
        }
    });

    array
        .as_primitive::<T>()
        .iter()
        .map(|opt| {
            opt.and_then(|v| match tz {
                Some(tz) => as_datetime_with_timezone::<T>(v, tz).map(|dt| dt.date_naive()),
                None => as_datetime::<T>(v).map(|dt| dt.date()),
            })
            .map(Date32Type::from_naive_date)
        })
        .collect()
}

fn to_boolean(array: &ArrayRef) -> Result<ArrayRef> {
    if let Some(values) = string_values(array) {
        let flags: BooleanArray = values
            .into_iter()
            .map(|opt| opt.and_then(parse_bool_lenient))
            .collect();
        return Ok(Arc::new(flags));
    }

    let dt = array.data_type();
    if dt.is_numeric() {
        let flags: BooleanArray = cast_or_null(array, &DataType::Float64)?
            .as_primitive::<Float64Type>()
            .iter()
            .map(|v| match v {
                Some(x) if x == 0.0 => Some(false),
                Some(x) if x == 1.0 => Some(true),
                _ => None,
            })
            .collect();
        return Ok(Arc::new(flags));
    }

    cast_or_null(array, &DataType::Boolean)
}

/// Tri-state parse: anything unrecognized is unknown, never false.
fn parse_bool_lenient(raw: &str) -> Option<bool> {
    match utils::clean_str(raw).to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
