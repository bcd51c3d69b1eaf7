use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;
use std::ops::Range;

use crate::error::TableError;
use crate::grid::CellValue;

/// An ordered, named-column table. Every transformation consumes the table and
/// returns a new one, so a table handed out is never changed behind the caller's back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Rows shorter than `columns` are padded with `Null`, longer rows are cut.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, CellValue::Null);
                r
            })
            .collect();
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn require(&self, name: &str) -> Result<usize, TableError> {
        self.column_index(name)
            .ok_or_else(|| TableError::missing(name))
    }

    pub fn get(&self, row: usize, name: &str) -> Option<&CellValue> {
        let idx = self.column_index(name)?;
        self.rows.get(row)?.get(idx)
    }

    pub fn column(&self, name: &str) -> Result<Vec<&CellValue>, TableError> {
        let idx = self.require(name)?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Keeps the first `n` rows.
    pub fn head(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Sets (or appends) a column from per-row values. Missing values are `Null`.
    pub fn with_column(mut self, name: &str, values: Vec<CellValue>) -> Self {
        let mut values = values.into_iter();
        match self.column_index(name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = values.next().unwrap_or(CellValue::Null);
                }
            }
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(values.next().unwrap_or(CellValue::Null));
                }
            }
        }
        self
    }

    pub fn with_constant(self, name: &str, value: CellValue) -> Self {
        let values = vec![value; self.rows.len()];
        self.with_column(name, values)
    }

    /// Copies `source` into `name`.
    pub fn with_copy(self, name: &str, source: &str) -> Result<Self, TableError> {
        let values = self.column(source)?.into_iter().cloned().collect();
        Ok(self.with_column(name, values))
    }

    /// Builds `name` by applying `f` to every cell of `source`.
    pub fn with_derived<F>(self, name: &str, source: &str, f: F) -> Result<Self, TableError>
    where
        F: Fn(&CellValue) -> CellValue,
    {
        let values = self.column(source)?.into_iter().map(f).collect();
        Ok(self.with_column(name, values))
    }

    /// Builds `name` row by row from the whole table; `f` gets the row index.
    pub fn try_with_rows<F>(self, name: &str, f: F) -> Result<Self, TableError>
    where
        F: Fn(&Table, usize) -> Result<CellValue, TableError>,
    {
        let values = (0..self.rows.len())
            .map(|r| f(&self, r))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.with_column(name, values))
    }

    /// Sets a single cell, adding the column (all `Null`) if needed.
    pub fn with_cell(self, row: usize, name: &str, value: CellValue) -> Result<Self, TableError> {
        let len = self.rows.len();
        if row >= len {
            return Err(TableError::RowOutOfRange { row, len });
        }
        let mut table = if self.has_column(name) {
            self
        } else {
            self.with_constant(name, CellValue::Null)
        };
        let idx = table.require(name)?;
        table.rows[row][idx] = value;
        Ok(table)
    }

    /// Renames every column whose label appears as a key in `map`.
    pub fn rename(mut self, map: &[(&str, &str)]) -> Self {
        for col in &mut self.columns {
            if let Some((_, to)) = map.iter().find(|(from, _)| from == col) {
                *col = to.to_string();
            }
        }
        self
    }

    pub fn fill_null(mut self, value: CellValue) -> Self {
        for cell in self.rows.iter_mut().flatten() {
            if cell.is_null() {
                *cell = value.clone();
            }
        }
        self
    }

    fn retain_columns<F>(self, keep: F) -> Self
    where
        F: Fn(usize) -> bool,
    {
        let idx: Vec<usize> = (0..self.columns.len()).filter(|&c| keep(c)).collect();
        let columns = idx.iter().map(|&c| self.columns[c].clone()).collect();
        let rows = self
            .rows
            .into_iter()
            .map(|r| idx.iter().map(|&c| r[c].clone()).collect())
            .collect();
        Self { columns, rows }
    }

    /// Drops columns whose cells are all `Null` within `rows`. Rows past the end are ignored.
    pub fn drop_columns_null_in_rows(self, rows: Range<usize>) -> Self {
        let end = rows.end.min(self.rows.len());
        let start = rows.start.min(end);
        let window = &self.rows[start..end];
        let keep: Vec<bool> = (0..self.columns.len())
            .map(|c| window.iter().any(|r| !r[c].is_null()))
            .collect();
        self.retain_columns(|c| keep[c])
    }

    /// Drops columns whose every value is `Null`. A table without rows loses all columns.
    pub fn drop_null_columns(self) -> Self {
        let len = self.rows.len();
        self.drop_columns_null_in_rows(0..len)
    }

    /// Stacks tables vertically. Columns are the union in first-seen order; cells a
    /// table does not have are `Null`. Tables with neither rows nor columns drop out.
    pub fn concat<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = Table>,
    {
        let tables: Vec<Table> = tables
            .into_iter()
            .filter(|t| !(t.rows.is_empty() && t.columns.is_empty()))
            .collect();

        let mut seen = HashSet::new();
        let mut columns: Vec<String> = Vec::new();
        for t in &tables {
            for c in &t.columns {
                if seen.insert(c.clone()) {
                    columns.push(c.clone());
                }
            }
        }

        let mut rows = Vec::new();
        for t in tables {
            let idx: Vec<Option<usize>> = columns.iter().map(|c| t.column_index(c)).collect();
            for r in t.rows {
                rows.push(
                    idx.iter()
                        .map(|i| i.map(|i| r[i].clone()).unwrap_or(CellValue::Null))
                        .collect(),
                );
            }
        }

        Self { columns, rows }
    }
}

struct RowRef<'a> {
    columns: &'a [String],
    cells: &'a [CellValue],
}

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (c, v) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(c, v)?;
        }
        map.end()
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows.iter().map(|cells| RowRef {
            columns: &self.columns,
            cells,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn t(s: &str) -> CellValue {
        CellValue::from(s)
    }

    fn sample() -> Table {
        Table::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                vec![t("1"), CellValue::Null, t("x")],
                vec![t("2"), CellValue::Null, CellValue::Null],
            ],
        )
    }

    #[test]
    fn test_with_constant_and_copy() {
        let table = sample()
            .with_constant("CURRENCY", t("RMB"))
            .with_copy("a2", "a")
            .unwrap();
        assert_eq!(table.columns(), &["a", "b", "c", "CURRENCY", "a2"]);
        assert_eq!(table.get(1, "CURRENCY"), Some(&t("RMB")));
        assert_eq!(table.get(1, "a2"), Some(&t("2")));
    }

    #[test]
    fn test_with_copy_missing_source() {
        let err = sample().with_copy("z", "nope").unwrap_err();
        assert!(matches!(err, TableError::MissingColumn { column } if column == "nope"));
    }

    #[test]
    fn test_with_cell_adds_column_and_sets_row() {
        let table = sample().with_cell(0, "A_VAL", CellValue::Float(3.5)).unwrap();
        assert_eq!(table.get(0, "A_VAL"), Some(&CellValue::Float(3.5)));
        assert_eq!(table.get(1, "A_VAL"), Some(&CellValue::Null));
        assert!(Table::empty().with_cell(0, "A_VAL", CellValue::Null).is_err());
    }

    #[test]
    fn test_rename_keeps_unmapped_labels() {
        let table = sample().rename(&[("a", "ALPHA"), ("zzz", "Z")]);
        assert_eq!(table.columns(), &["ALPHA", "b", "c"]);
    }

    #[test]
    fn test_drop_null_columns() {
        let table = sample().drop_null_columns();
        assert_eq!(table.columns(), &["a", "c"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_drop_null_columns_on_empty_table_removes_everything() {
        let table = sample().head(0).drop_null_columns();
        assert_eq!(table.width(), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_drop_columns_null_in_first_row_only() {
        let table = sample().drop_columns_null_in_rows(1..2);
        assert_eq!(table.columns(), &["a"]);
        let table = sample().drop_columns_null_in_rows(0..1);
        assert_eq!(table.columns(), &["a", "c"]);
    }

    #[test]
    fn test_fill_null() {
        let table = sample().fill_null(CellValue::Float(0.0));
        assert_eq!(table.get(1, "c"), Some(&CellValue::Float(0.0)));
        assert_eq!(table.get(0, "c"), Some(&t("x")));
    }

    #[test]
    fn test_concat_unions_columns_in_order() {
        let left = Table::new(vec!["a".into(), "b".into()], vec![vec![t("1"), t("2")]]);
        let right = Table::new(vec!["b".into(), "d".into()], vec![vec![t("3"), t("4")]]);
        let out = Table::concat([left, right]);

        assert_eq!(out.columns(), &["a", "b", "d"]);
        assert_eq!(out.len(), 2);
        assert_eq!(out.get(1, "a"), Some(&CellValue::Null));
        assert_eq!(out.get(1, "b"), Some(&t("3")));
        assert_eq!(out.get(0, "d"), Some(&CellValue::Null));
    }

    #[test]
    fn test_concat_of_nothing_is_empty() {
        let out = Table::concat([Table::empty(), Table::empty()]);
        assert!(out.is_empty());
        assert_eq!(out.width(), 0);
    }

    #[test]
    fn test_serialize_rows_as_objects() {
        let table = sample().with_constant("n", CellValue::Int(5)).head(1);
        let value = serde_json::to_value(&table).unwrap();
        assert_eq!(value, json!([{"a": "1", "b": null, "c": "x", "n": 5}]));
    }
}
