use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

use crate::error::TableError;
use crate::grid::CellValue;
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Int,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Float => f.write_str("float"),
            FieldKind::Int => f.write_str("integer"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl Field {
    pub const fn float(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Float,
        }
    }

    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Int,
        }
    }
}

/// Typed fields a record table must carry. Columns not listed are left as they are.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    fields: &'static [Field],
}

impl Schema {
    pub const fn new(fields: &'static [Field]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [Field] {
        self.fields
    }

    /// Casts every declared field. A declared field the table lacks is an error.
    pub fn conform(&self, table: Table) -> Result<Table, TableError> {
        self.fields
            .iter()
            .try_fold(table, |t, field| t.cast_column(field.name, field.kind))
    }
}

/// Parses statement numbers such as `"1,234.50"` or `" -3 "`.
///
/// Thousands separators are accepted on purpose: statements exported with number
/// formatting print them, and dropping them cannot change the value.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn cast_error(column: &str, row: usize, value: &CellValue, kind: FieldKind) -> TableError {
    TableError::Cast {
        column: column.to_string(),
        row,
        value: value.to_string(),
        kind,
    }
}

/// Numeric value of a cell for arithmetic. `Null` is `None`; unparseable text is an error.
pub fn numeric_value(column: &str, row: usize, value: &CellValue) -> Result<Option<f64>, TableError> {
    match value {
        CellValue::Null => Ok(None),
        CellValue::Float(f) => Ok(Some(*f)),
        CellValue::Int(i) => Ok(Some(*i as f64)),
        CellValue::Text(s) => parse_number(s)
            .map(Some)
            .ok_or_else(|| cast_error(column, row, value, FieldKind::Float)),
    }
}

fn cast_value(column: &str, row: usize, value: &CellValue, kind: FieldKind) -> Result<CellValue, TableError> {
    if value.is_null() {
        return Ok(CellValue::Null);
    }
    match kind {
        FieldKind::Float => Ok(numeric_value(column, row, value)?
            .map(CellValue::Float)
            .unwrap_or(CellValue::Null)),
        // Integral float text such as "100.00" is accepted; a fraction is a cast error.
        FieldKind::Int => {
            if let CellValue::Int(i) = value {
                return Ok(CellValue::Int(*i));
            }
            let v = numeric_value(column, row, value)
                .map_err(|_| cast_error(column, row, value, kind))?
                .unwrap_or_default();
            if v.fract() != 0.0 || v.abs() > i64::MAX as f64 {
                return Err(cast_error(column, row, value, kind));
            }
            Ok(CellValue::Int(v as i64))
        }
    }
}

/// Rounds the exact binary value of `value` to `dp` places, ties to even.
///
/// `2.675` is stored as `2.67499999...` and gives `2.67`; `320.125` is an exact tie
/// and gives `320.12`.
pub fn round_decimal(value: f64, dp: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .and_then(|d| {
            d.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven)
                .to_f64()
        })
        .unwrap_or(value)
}

impl Table {
    pub fn cast_column(self, name: &str, kind: FieldKind) -> Result<Table, TableError> {
        let cast = self
            .column(name)?
            .into_iter()
            .enumerate()
            .map(|(row, v)| cast_value(name, row, v, kind))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.with_column(name, cast))
    }

    /// Rounds a float column to `dp` places; `Null` stays `Null`.
    pub fn round_column(self, name: &str, dp: u32) -> Result<Table, TableError> {
        let rounded = self
            .column(name)?
            .into_iter()
            .map(|v| match v {
                CellValue::Float(f) => CellValue::Float(round_decimal(*f, dp)),
                other => other.clone(),
            })
            .collect();
        Ok(self.with_column(name, rounded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRADE: Schema = Schema::new(&[Field::float("PRICE"), Field::int("VOLUME")]);

    fn table(price: &str, volume: &str) -> Table {
        Table::new(
            vec!["PRICE".into(), "VOLUME".into(), "NAME".into()],
            vec![vec![
                CellValue::from(price),
                CellValue::from(volume),
                CellValue::from("平安银行"),
            ]],
        )
    }

    #[test]
    fn test_conform_casts_declared_fields() {
        let out = TRADE.conform(table("1,012.50", "300")).unwrap();
        assert_eq!(out.get(0, "PRICE"), Some(&CellValue::Float(1012.5)));
        assert_eq!(out.get(0, "VOLUME"), Some(&CellValue::Int(300)));
        assert_eq!(out.get(0, "NAME"), Some(&CellValue::text("平安银行")));
    }

    #[test]
    fn test_conform_accepts_integral_float_text_for_int() {
        let out = TRADE.conform(table("1", "100.00")).unwrap();
        assert_eq!(out.get(0, "VOLUME"), Some(&CellValue::Int(100)));
    }

    #[test]
    fn test_conform_rejects_malformed_numbers() {
        let err = TRADE.conform(table("abc", "1")).unwrap_err();
        match err {
            TableError::Cast { column, row, value, kind } => {
                assert_eq!(column, "PRICE");
                assert_eq!(row, 0);
                assert_eq!(value, "abc");
                assert_eq!(kind, FieldKind::Float);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(TRADE.conform(table("1", "2.5")).is_err());
    }

    #[test]
    fn test_conform_missing_field() {
        let t = Table::new(vec!["PRICE".into()], vec![vec![CellValue::from("1")]]);
        assert!(matches!(
            TRADE.conform(t),
            Err(TableError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_null_survives_cast() {
        let out = TRADE.conform(table("", "")).unwrap();
        assert_eq!(out.get(0, "PRICE"), Some(&CellValue::Null));
        assert_eq!(out.get(0, "VOLUME"), Some(&CellValue::Null));
    }

    #[test]
    fn test_round_decimal_uses_binary_value() {
        assert_eq!(round_decimal(12.345, 2), 12.35);
        assert_eq!(round_decimal(2.675, 2), 2.67);
        assert_eq!(round_decimal(-1.005, 2), -1.0);
        assert_eq!(round_decimal(1700.505, 2), 1700.51);
        assert_eq!(round_decimal(7.0, 2), 7.0);
    }

    #[test]
    fn test_round_decimal_exact_ties_go_to_even() {
        assert_eq!(round_decimal(320.125, 2), 320.12);
        assert_eq!(round_decimal(0.375, 2), 0.38);
        assert_eq!(round_decimal(-0.125, 2), -0.12);
    }

    #[test]
    fn test_round_column() {
        let t = Table::new(
            vec!["PRICE".into()],
            vec![
                vec![CellValue::Float(12.345)],
                vec![CellValue::Float(320.125)],
                vec![CellValue::Float(2.675)],
                vec![CellValue::Null],
            ],
        );
        let out = t.round_column("PRICE", 2).unwrap();
        assert_eq!(out.get(0, "PRICE"), Some(&CellValue::Float(12.35)));
        assert_eq!(out.get(1, "PRICE"), Some(&CellValue::Float(320.12)));
        assert_eq!(out.get(2, "PRICE"), Some(&CellValue::Float(2.67)));
        assert_eq!(out.get(3, "PRICE"), Some(&CellValue::Null));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 3.00 "), Some(3.0));
        assert_eq!(parse_number("1,500"), Some(1500.0));
        assert_eq!(parse_number("--"), None);
        assert_eq!(parse_number(""), None);
    }
}
