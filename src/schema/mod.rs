// src/schema/mod.rs

pub mod arrow;
pub mod types;

pub use self::arrow::{canonical_arrow_schema, map_to_arrow_type};
pub use self::types::{Column, ColumnType};

/// Columns every normalized table must carry, with their declared types.
/// Missing ones are synthesized as typed nulls.
pub const SCHEMA: &[Column] = &[
    Column::new("txn_id", ColumnType::Text),
    Column::new("account_id", ColumnType::Text),
    Column::new("merchant", ColumnType::Text),
    Column::new("memo", ColumnType::Text),
    Column::new("category", ColumnType::Text),
    Column::new("currency", ColumnType::Text),
    Column::new("amount", ColumnType::Float),
];

/// Calendar-date columns; coerced only when present.
pub const DATE_COLUMNS: &[&str] = &["txn_date", "posted_date"];

/// Tri-state boolean columns; coerced only when present.
pub const BOOL_COLUMNS: &[&str] = &["is_recurring", "is_refund"];

/// Canonical column order of the exported files.
pub const ORDER: &[&str] = &[
    "txn_id",
    "txn_date",
    "posted_date",
    "account_id",
    "merchant",
    "memo",
    "category",
    "currency",
    "amount",
    "is_recurring",
    "is_refund",
];

/// Declared type of `name`, if it is one of the known handoff columns.
pub fn declared_type(name: &str) -> Option<ColumnType> {
    if let Some(col) = SCHEMA.iter().find(|c| c.name == name) {
        Some(col.ty)
    } else if DATE_COLUMNS.contains(&name) {
        Some(ColumnType::Date)
    } else if BOOL_COLUMNS.contains(&name) {
        Some(ColumnType::Bool)
    } else {
        None
    }
}

/// Position of `name` in the canonical order.
pub fn canonical_rank(name: &str) -> Option<usize> {
    ORDER.iter().position(|c| *c == name)
}
