use crate::error::TableError;
use crate::grid::{Anchor, CellValue, Grid};
use crate::table::Table;

/// Carves the section below `anchor`: the next row is the header, the rest are data rows.
/// The section spans the full grid width and runs to the end of the grid.
pub fn extract_section(grid: &Grid, anchor: Anchor) -> Table {
    let header_row = anchor.row + 1;
    let Some(header) = grid.row(header_row) else {
        return Table::empty();
    };

    let columns = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| match cell {
            CellValue::Null => format!("column_{}", idx),
            other => other.to_string(),
        })
        .collect();

    let rows = grid
        .rows()
        .skip(header_row + 1)
        .map(|r| r.to_vec())
        .collect();

    Table::new(columns, rows)
}

/// Locates `label` and extracts its section; `None` when the statement has no such section.
pub fn section_for(grid: &Grid, label: &str) -> Option<Table> {
    grid.locate(label).map(|anchor| extract_section(grid, anchor))
}

/// Cuts the table at the first row whose `key` cell is not text.
pub fn truncate_at_non_text(table: Table, key: &str) -> Result<Table, TableError> {
    let end = table
        .column(key)?
        .iter()
        .position(|c| !c.is_text());
    Ok(match end {
        Some(n) => table.head(n),
        None => table,
    })
}

/// Whether the first data row carries text in `key`. False for a section without rows.
pub fn starts_with_text(table: &Table, key: &str) -> Result<bool, TableError> {
    Ok(table
        .column(key)?
        .first()
        .map(|c| c.is_text())
        .unwrap_or(false))
}
