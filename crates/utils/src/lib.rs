//! Shared building blocks for statement parsers: a typed cell grid read from a
//! spreadsheet, label lookup, section slicing and record tables with declared schemas.

pub mod error;
pub mod grid;
pub mod schema;
pub mod section;
pub mod table;

// Re-export commonly used items
pub use crate::error::TableError;
pub use crate::grid::{Anchor, CellValue, Grid};
pub use crate::schema::{numeric_value, parse_number, round_decimal, Field, FieldKind, Schema};
pub use crate::section::{extract_section, section_for, starts_with_text, truncate_at_non_text};
pub use crate::table::Table;
