// src/schema/types.rs

/// Declared type of a handoff column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Text,
    Float,
    /// Calendar date: no time-of-day, no timezone.
    Date,
    /// Tri-state: true, false, or unknown (null).
    Bool,
}

/// A single column definition from the fixed handoff schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
}

impl Column {
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self { name, ty }
    }
}
