// src/schema/arrow.rs

use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema};
use std::sync::Arc;

use super::types::ColumnType;
use super::{declared_type, ORDER};

/// Map a declared column type onto the Arrow type it is stored as.
///
/// - Text  → Utf8
/// - Float → Float64
/// - Date  → Date32 (days since epoch, no timezone)
/// - Bool  → Boolean (nullable, so null is the "unknown" state)
pub fn map_to_arrow_type(ty: ColumnType) -> DataType {
    match ty {
        ColumnType::Text => DataType::Utf8,
        ColumnType::Float => DataType::Float64,
        ColumnType::Date => DataType::Date32,
        ColumnType::Bool => DataType::Boolean,
    }
}

/// Build the ArrowSchema (inside an Arc) of a fully normalized handoff table:
/// every canonical column, in canonical order, all nullable.
pub fn canonical_arrow_schema() -> Arc<ArrowSchema> {
    let fields: Vec<ArrowField> = ORDER
        .iter()
        .filter_map(|name| {
            declared_type(name)
                .map(|ty| ArrowField::new(*name, map_to_arrow_type(ty), /* nullable = */ true))
        })
        .collect();

    Arc::new(ArrowSchema::new(fields))
}
