use thiserror::Error;

use crate::schema::FieldKind;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("missing column: {column}")]
    MissingColumn { column: String },
    #[error("cannot cast '{value}' in column {column} (row {row}) to {kind}")]
    Cast {
        column: String,
        row: usize,
        value: String,
        kind: FieldKind,
    },
    #[error("row {row} out of range (table has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },
}

impl TableError {
    pub fn missing(column: impl Into<String>) -> Self {
        TableError::MissingColumn {
            column: column.into(),
        }
    }
}
