use calamine::{Data, Range};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::fmt;

/// A single cell of a statement sheet or of a record table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Text(String),
    Float(f64),
    Int(i64),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, CellValue::Text(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric view of the cell. Text is not parsed here, see `schema` for casting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(f) => Some(*f),
            CellValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            // Security codes and account numbers stored as numbers must render without ".0"
            CellValue::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{}", *v as i64),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            CellValue::Null
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::from(s.as_str())
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::String(s) => CellValue::from(s.as_str()),
            Data::Float(f) => CellValue::Float(*f),
            Data::Int(i) => CellValue::Int(*i),
            Data::Bool(b) => CellValue::Text(b.to_string()),
            Data::DateTime(dt) => excel_datetime_text(dt.as_f64())
                .map(CellValue::Text)
                .unwrap_or(CellValue::Float(dt.as_f64())),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::from(s.as_str()),
            Data::Empty | Data::Error(_) => CellValue::Null,
        }
    }
}

/// Date-formatted cells are read the way the sheet shows them, `YYYY-MM-DD HH:MM:SS`.
/// Serials use the 1899-12-30 base.
fn excel_datetime_text(serial: f64) -> Option<String> {
    if !serial.is_finite() || !(0.0..2_958_466.0).contains(&serial) {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    base.checked_add_signed(Duration::seconds(seconds))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Position of a label inside a [`Grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub row: usize,
    pub col: usize,
}

/// Raw sheet content, row-major, no header row assumed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl Grid {
    /// Builds a grid from rows of possibly different lengths; short rows are padded with `Null`.
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, CellValue::Null);
                r
            })
            .collect();
        Self { rows, width }
    }

    /// Convenience constructor from string cells. Empty strings become `Null`.
    pub fn from_strs(rows: &[&[&str]]) -> Self {
        Self::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|s| CellValue::from(*s)).collect())
                .collect(),
        )
    }

    pub fn from_range(range: &Range<Data>) -> Self {
        Self::from_rows(
            range
                .rows()
                .map(|row| row.iter().map(CellValue::from).collect())
                .collect(),
        )
    }

    /// Removes fully blank rows, then fully blank columns.
    pub fn strip_blank(self) -> Self {
        let rows: Vec<Vec<CellValue>> = self
            .rows
            .into_iter()
            .filter(|r| r.iter().any(|c| !c.is_null()))
            .collect();

        let keep: Vec<usize> = (0..self.width)
            .filter(|&c| rows.iter().any(|r| !r[c].is_null()))
            .collect();

        let rows = rows
            .into_iter()
            .map(|r| keep.iter().map(|&c| r[c].clone()).collect())
            .collect();

        Self {
            rows,
            width: keep.len(),
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn row(&self, row: usize) -> Option<&[CellValue]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row)?.get(col)
    }

    /// First cell (row-major) whose text equals `label`.
    pub fn locate(&self, label: &str) -> Option<Anchor> {
        let label = label.trim();
        self.rows.iter().enumerate().find_map(|(row, cells)| {
            cells
                .iter()
                .position(|c| c.as_text() == Some(label))
                .map(|col| Anchor { row, col })
        })
    }

    /// The non-null cell immediately right of `anchor`, the usual place for a labeled value.
    pub fn value_right_of(&self, anchor: Anchor) -> Option<&CellValue> {
        self.get(anchor.row, anchor.col + 1).filter(|c| !c.is_null())
    }
}
