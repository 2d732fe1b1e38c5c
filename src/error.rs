/// Error types for CatalogView
///
/// Only unreadable uploads, table-access problems and template failures are
/// errors. Malformed rows and cell-level parse failures never reach this
/// type; they become `ColumnValue::Null` instead.
use thiserror::Error;

use crate::column::ColumnType;

#[derive(Debug, Error)]
pub enum Error {
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is empty")]
    EmptyInput,

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Row {row} out of range [0, {len})")]
    RowOutOfRange { row: usize, len: usize },

    #[error("Type mismatch in column '{column}': expected {expected:?}, got {found}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        found: String,
    },

    #[error("Column '{column}' has {found} values, table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Template rendering failed: {0}")]
    Render(#[from] askama::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
