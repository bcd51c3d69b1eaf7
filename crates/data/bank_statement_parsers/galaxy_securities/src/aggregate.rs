use utils::{numeric_value, CellValue, Table, TableError};

use crate::columns::{ASSET_ACCOUNT, EXCHANGE, VAL};
use crate::exchange::{Exchange, MarketSegment};

/// Sum of the configured fee columns for one row. Absent columns and blank cells add nothing.
pub fn other_fee(table: &Table, row: usize, fee_columns: &[&str]) -> Result<f64, TableError> {
    fee_columns.iter().try_fold(0.0, |total, column| {
        let fee = match table.get(row, column) {
            Some(cell) => numeric_value(column, row, cell)?.unwrap_or(0.0),
            None => 0.0,
        };
        Ok(total + fee)
    })
}

/// `other_fee` as a cell, shaped for `Table::try_with_rows`.
pub fn other_fee_cell(table: &Table, row: usize, fee_columns: &[&str]) -> Result<CellValue, TableError> {
    other_fee(table, row, fee_columns).map(CellValue::Float)
}

/// Total market value of `account`'s positions listed on exchanges in `segment`.
///
/// Expects a finished position table (target column names, `VAL` already cast).
/// A table without the needed columns, e.g. an empty one, sums to zero.
pub fn market_value(positions: &Table, account: &str, segment: MarketSegment) -> Result<f64, TableError> {
    if ![ASSET_ACCOUNT, EXCHANGE, VAL]
        .iter()
        .all(|c| positions.has_column(c))
    {
        return Ok(0.0);
    }

    let accounts = positions.column(ASSET_ACCOUNT)?;
    let exchanges = positions.column(EXCHANGE)?;
    let values = positions.column(VAL)?;

    let mut total = 0.0;
    for (row, ((acct, exchange), value)) in accounts.iter().zip(&exchanges).zip(&values).enumerate() {
        if acct.to_string() != account {
            continue;
        }
        let in_segment = exchange
            .as_text()
            .and_then(Exchange::from_code)
            .map(|e| e.segment() == segment)
            .unwrap_or(false);
        if in_segment {
            total += numeric_value(VAL, row, value)?.unwrap_or(0.0);
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::OTHER_FEE_COLUMNS;

    fn fee_table() -> Table {
        Table::new(
            vec!["过户费".into(), "证管费".into(), "佣金".into()],
            vec![
                vec![CellValue::from("3.00"), CellValue::from("1.50"), CellValue::from("5.00")],
                vec![CellValue::Null, CellValue::Float(0.25), CellValue::Null],
                vec![CellValue::from("n/a"), CellValue::Null, CellValue::Null],
            ],
        )
    }

    #[test]
    fn test_other_fee_treats_absent_columns_as_zero() {
        let fees = ["过户费", "经手费", "证管费"];
        assert_eq!(other_fee(&fee_table(), 0, &fees).unwrap(), 4.5);
        assert_eq!(other_fee(&fee_table(), 1, &fees).unwrap(), 0.25);
    }

    #[test]
    fn test_other_fee_ignores_commission() {
        assert_eq!(other_fee(&fee_table(), 0, OTHER_FEE_COLUMNS).unwrap(), 4.5);
    }

    #[test]
    fn test_other_fee_rejects_malformed_amount() {
        let err = other_fee(&fee_table(), 2, OTHER_FEE_COLUMNS).unwrap_err();
        assert!(matches!(err, TableError::Cast { row: 2, .. }));
    }

    fn positions() -> Table {
        let row = |acct: &str, ex: &str, val: f64| {
            vec![CellValue::text(acct), CellValue::text(ex), CellValue::Float(val)]
        };
        Table::new(
            vec![ASSET_ACCOUNT.into(), EXCHANGE.into(), VAL.into()],
            vec![
                row("0101", "SH", 100.0),
                row("0101", "SZ", 50.5),
                row("0101", "HK", 30.0),
                row("0202", "SH", 1000.0),
            ],
        )
    }

    #[test]
    fn test_market_value_by_segment() {
        let t = positions();
        assert_eq!(market_value(&t, "0101", MarketSegment::Domestic).unwrap(), 150.5);
        assert_eq!(market_value(&t, "0101", MarketSegment::HongKong).unwrap(), 30.0);
        assert_eq!(market_value(&t, "0202", MarketSegment::HongKong).unwrap(), 0.0);
    }

    #[test]
    fn test_market_value_of_empty_positions() {
        assert_eq!(market_value(&Table::empty(), "0101", MarketSegment::Domestic).unwrap(), 0.0);
    }
}
