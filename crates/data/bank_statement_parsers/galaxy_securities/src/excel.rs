use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Reader};
use settings_loader::ParserSettings;
use std::path::Path;
use tracing::{debug, info, warn};
use utils::{section_for, starts_with_text, truncate_at_non_text, CellValue, Grid, Table, TableError};

use crate::aggregate::{market_value, other_fee_cell};
use crate::columns::*;
use crate::dates::normalize_date;
use crate::exchange::{exchange_cell, MarketSegment};
use crate::{StatementError, StatementStrategy, StatementTables};

/// The statement date is the leading part of the period caption.
const STATEMENT_DATE_CHARS: usize = 11;

/// Account id and statement date, stamped on every record table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementHeader {
    pub account: String,
    pub date: String,
}

pub struct GalaxyExcelParser {
    settings: ParserSettings,
}

impl GalaxyExcelParser {
    pub fn new(settings: ParserSettings) -> Self {
        Self { settings }
    }

    pub fn broker(&self) -> &str {
        &self.settings.broker
    }

    pub fn product(&self) -> &str {
        &self.settings.product
    }

    /// Parse a single .xls/.xlsx statement.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<StatementTables> {
        let path = path.as_ref();
        let grid = load_grid(path)?;
        debug!(
            file = %path.display(),
            rows = grid.height(),
            cols = grid.width(),
            "statement sheet loaded"
        );
        self.parse_grid(&grid)
            .with_context(|| format!("Failed parsing {}", path.display()))
    }

    /// Parse an already loaded sheet (blank rows and columns removed).
    pub fn parse_grid(&self, grid: &Grid) -> Result<StatementTables, StatementError> {
        let header = read_header(grid)?;
        debug!(account = %header.account, date = %header.date, "statement header");

        let position = self
            .positions(grid, &header)
            .map_err(StatementError::in_section(POSITION_SECTION))?;

        let a_val = market_value(&position, &header.account, MarketSegment::Domestic)
            .map_err(StatementError::in_section(POSITION_SECTION))?;
        let h_val = market_value(&position, &header.account, MarketSegment::HongKong)
            .map_err(StatementError::in_section(POSITION_SECTION))?;

        let amount = self
            .assets(grid, &header, a_val, h_val)
            .map_err(StatementError::in_section(ASSET_SECTION))?;

        let trade_record = self.trade_records(grid, &header)?;

        info!(
            account = %header.account,
            amount = amount.len(),
            position = position.len(),
            trade_record = trade_record.len(),
            "statement parsed"
        );

        Ok(StatementTables {
            amount,
            position,
            trade_record,
        })
    }

    fn positions(&self, grid: &Grid, header: &StatementHeader) -> Result<Table, TableError> {
        let Some(section) = find_section(grid, POSITION_SECTION) else {
            return Ok(Table::empty());
        };

        let table = truncate_at_non_text(section, SECURITY_NAME)?
            .with_constant(ACCOUNT, CellValue::text(&header.account))
            .with_constant(DATE, CellValue::text(&header.date))
            .with_derived(MARKET, SECURITY_CODE, exchange_cell)?
            .with_constant(FROZEN, CellValue::Float(0.0))
            .with_constant(INTRANSIT, CellValue::Float(0.0))
            .with_copy(CLIENT_ID_IN_BROKER, ACCOUNT)?
            .with_constant(CURRENCY, CellValue::text(&self.settings.currency))
            .with_constant(BROKER_NAME, CellValue::text(&self.settings.broker_name))
            .with_constant(CLOSE_PRICE_CURRENCY, CellValue::text(&self.settings.currency))
            .rename(POSITION_COLUMN_MAP);

        Ok(POSITION_SCHEMA.conform(table)?.drop_null_columns())
    }

    fn assets(
        &self,
        grid: &Grid,
        header: &StatementHeader,
        a_val: f64,
        h_val: f64,
    ) -> Result<Table, TableError> {
        let Some(section) = find_section(grid, ASSET_SECTION) else {
            return Ok(Table::empty());
        };

        let table = section
            .head(ASSET_ROWS)
            .drop_columns_null_in_rows(0..ASSET_ROWS)
            .with_constant(ACCOUNT, CellValue::text(&header.account))
            .with_constant(DATE, CellValue::text(&header.date))
            .with_copy(CLIENT_ID_IN_BROKER, ACCOUNT)?
            .with_constant(FINANCING_AMOUNT, CellValue::Float(0.0))
            .with_constant(MARGIN_AMOUNT, CellValue::Float(0.0))
            .with_constant(BROKER_NAME, CellValue::text(&self.settings.broker_name))
            .with_cell(0, A_VAL, CellValue::Float(a_val))?
            .with_cell(0, H_VAL, CellValue::Float(h_val))?
            .fill_null(CellValue::Float(0.0))
            .rename(ASSET_COLUMN_MAP);

        Ok(ASSET_SCHEMA.conform(table)?.drop_null_columns())
    }

    fn trade_records(&self, grid: &Grid, header: &StatementHeader) -> Result<Table, StatementError> {
        let delivered = self
            .delivered_trades(grid, header)
            .map_err(StatementError::in_section(DELIVERED_SECTION))?;
        let undelivered = self
            .undelivered_trades(grid, header)
            .map_err(StatementError::in_section(UNDELIVERED_SECTION))?;

        merge_trades(delivered, undelivered)
    }

    fn delivered_trades(&self, grid: &Grid, header: &StatementHeader) -> Result<Option<Table>, TableError> {
        let Some(section) = trade_section(grid, DELIVERED_SECTION)? else {
            return Ok(None);
        };

        let table = section
            .with_constant(ACCOUNT, CellValue::text(&header.account))
            .with_derived(MARKET, SECURITY_CODE, exchange_cell)?
            .with_copy(CLIENT_ID_IN_BROKER, ACCOUNT)?
            .with_constant(CURRENCY, CellValue::text(&self.settings.currency))
            .with_copy(KF_ABSTRACT, BUSINESS_FLAG)?
            .with_constant(BROKER_NAME, CellValue::text(&self.settings.broker_name))
            .with_derived(DATE, DATE, normalize_date)?
            .try_with_rows(OTHER_FEE, |t, row| other_fee_cell(t, row, OTHER_FEE_COLUMNS))?
            .rename(TRADE_RECORD_COLUMN_MAP);

        TRADE_RECORD_SCHEMA.conform(table).map(Some)
    }

    fn undelivered_trades(&self, grid: &Grid, header: &StatementHeader) -> Result<Option<Table>, TableError> {
        let Some(section) = trade_section(grid, UNDELIVERED_SECTION)? else {
            return Ok(None);
        };

        let table = section
            .drop_columns_null_in_rows(0..1)
            .with_constant(ACCOUNT, CellValue::text(&header.account))
            .with_derived(MARKET, SECURITY_CODE, exchange_cell)?
            .with_copy(CLIENT_ID_IN_BROKER, ACCOUNT)?
            .with_constant(CURRENCY, CellValue::text(&self.settings.currency))
            .with_constant(BROKER_NAME, CellValue::text(&self.settings.broker_name))
            .with_derived(ORDER_DATE, ORDER_DATE, normalize_date)?
            .try_with_rows(OTHER_FEE, |t, row| other_fee_cell(t, row, OTHER_FEE_COLUMNS))?
            .with_constant(BUSINESS_FLAG, CellValue::text(UNDELIVERED_BUSINESS_FLAG))
            .with_copy(KF_ABSTRACT, BUSINESS_FLAG)?
            .rename(UNDELIVERED_TRADE_RENAMES)
            .rename(TRADE_RECORD_COLUMN_MAP);

        TRADE_RECORD_SCHEMA.conform(table).map(Some)
    }
}

/// Settled trades first, then unsettled ones, prices rounded to cents.
fn merge_trades(delivered: Option<Table>, undelivered: Option<Table>) -> Result<Table, StatementError> {
    let trades = Table::concat(delivered.into_iter().chain(undelivered));
    if trades.width() == 0 {
        return Ok(trades);
    }
    let trades = trades
        .round_column(PRICE, 2)
        .map_err(StatementError::in_section(TRADE_RECORD_SECTION))?;
    Ok(trades.drop_null_columns())
}

impl StatementStrategy for GalaxyExcelParser {
    fn parse(&self, path: &Path) -> Result<StatementTables> {
        self.parse_file(path)
    }
}

/// Reads the first worksheet, dropping fully blank rows and columns.
pub fn load_grid<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let path = path.as_ref();
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("Cannot open {}", path.display()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("No sheets found in {}", path.display()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Cannot read sheet '{}' in {}", sheet_name, path.display()))?;

    Ok(Grid::from_range(&range).strip_blank())
}

/// Account id and statement date. Both are required.
pub fn read_header(grid: &Grid) -> Result<StatementHeader, StatementError> {
    let account = labeled_value(grid, ACCOUNT_LABEL)?;
    let period = labeled_value(grid, PERIOD_LABEL)?;
    let date = period
        .chars()
        .take(STATEMENT_DATE_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string();
    Ok(StatementHeader { account, date })
}

fn labeled_value(grid: &Grid, label: &'static str) -> Result<String, StatementError> {
    let anchor = grid
        .locate(label)
        .ok_or(StatementError::MissingField { label })?;
    grid.value_right_of(anchor)
        .map(|v| v.to_string())
        .ok_or(StatementError::MissingField { label })
}

/// A section with at least one row, or `None`.
fn find_section(grid: &Grid, label: &str) -> Option<Table> {
    match section_for(grid, label) {
        Some(section) if !section.is_empty() => {
            debug!(section = label, rows = section.len(), "section found");
            Some(section)
        }
        Some(_) => {
            debug!(section = label, "section has no rows");
            None
        }
        None => {
            debug!(section = label, "section not present");
            None
        }
    }
}

/// A trade section counts only when its first bank cell is text; it then runs
/// until the first row without a bank name.
fn trade_section(grid: &Grid, label: &str) -> Result<Option<Table>, TableError> {
    let Some(section) = find_section(grid, label) else {
        return Ok(None);
    };
    if !section.has_column(BANK) {
        warn!(section = label, column = BANK, "trade section without bank column, skipping");
        return Ok(None);
    }
    if !starts_with_text(&section, BANK)? {
        debug!(section = label, "no trades listed");
        return Ok(None);
    }
    truncate_at_non_text(section, BANK).map(Some)
}
