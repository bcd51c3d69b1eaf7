//! Parser for China Galaxy Securities (银河证券) settlement statements.
//!
//! A statement is a single sheet holding several labeled blocks: account header,
//! asset summary, security positions, settled and unsettled trades. The parser finds
//! each block by its caption, reshapes it into a record table and returns
//! `amount`, `position` and `trade_record` tables.

pub mod aggregate;
pub mod columns;
pub mod dates;
pub mod exchange;
pub mod excel;
pub mod text;

use anyhow::Result;
use serde::Serialize;
use settings_loader::ParserSettings;
use std::path::{Path, PathBuf};
use thiserror::Error;
use utils::{Table, TableError};

pub use crate::excel::GalaxyExcelParser;
pub use crate::text::GalaxyTextParser;

pub const PARSER_NAME: &str = "galaxy_securities";

#[derive(Debug, Error)]
pub enum StatementError {
    #[error("statement field '{label}' not found")]
    MissingField { label: &'static str },
    #[error("section '{section}': {source}")]
    Section {
        section: &'static str,
        #[source]
        source: TableError,
    },
}

impl StatementError {
    pub(crate) fn in_section(section: &'static str) -> impl Fn(TableError) -> Self {
        move |source| StatementError::Section { section, source }
    }
}

/// The three record tables extracted from one statement file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatementTables {
    pub amount: Table,
    pub position: Table,
    pub trade_record: Table,
}

impl StatementTables {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.amount.is_empty() && self.position.is_empty() && self.trade_record.is_empty()
    }
}

/// A parser that turns one statement file into record tables.
pub trait StatementStrategy {
    fn parse(&self, path: &Path) -> Result<StatementTables>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    Excel,
    Text,
    Unsupported,
}

impl StatementFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("xls") | Some("xlsx") => StatementFormat::Excel,
            Some("txt") => StatementFormat::Text,
            _ => StatementFormat::Unsupported,
        }
    }
}

/// Picks the parser for one file by its extension.
pub struct GalaxyContext {
    file: PathBuf,
    parser: Option<Box<dyn StatementStrategy>>,
}

impl GalaxyContext {
    pub fn new(settings: &ParserSettings, file: impl AsRef<Path>) -> Self {
        let file = file.as_ref().to_path_buf();
        let parser: Option<Box<dyn StatementStrategy>> = match StatementFormat::from_path(&file) {
            StatementFormat::Excel => Some(Box::new(GalaxyExcelParser::new(settings.clone()))),
            StatementFormat::Text => Some(Box::new(GalaxyTextParser)),
            StatementFormat::Unsupported => {
                tracing::warn!(file = %file.display(), "unsupported extension, cannot parse file");
                None
            }
        };
        Self { file, parser }
    }

    pub fn is_supported(&self) -> bool {
        self.parser.is_some()
    }

    /// Unsupported files give three empty tables rather than an error.
    pub fn parse(&self) -> Result<StatementTables> {
        match &self.parser {
            Some(parser) => parser.parse(&self.file),
            None => Ok(StatementTables::empty()),
        }
    }
}

/// Entry point for the broker dispatch layer: builds a context per file.
#[derive(Debug, Clone, Default)]
pub struct GalaxyStrategy {
    pub settings: ParserSettings,
}

impl GalaxyStrategy {
    pub fn new(settings: ParserSettings) -> Self {
        Self { settings }
    }
}

impl StatementStrategy for GalaxyStrategy {
    fn parse(&self, path: &Path) -> Result<StatementTables> {
        tracing::debug!(
            broker = %self.settings.broker,
            product = %self.settings.product,
            file = %path.display(),
            "dispatching statement"
        );
        GalaxyContext::new(&self.settings, path).parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_from_path() {
        assert_eq!(StatementFormat::from_path(Path::new("a.xls")), StatementFormat::Excel);
        assert_eq!(StatementFormat::from_path(Path::new("a.XLSX")), StatementFormat::Excel);
        assert_eq!(StatementFormat::from_path(Path::new("a.txt")), StatementFormat::Text);
        assert_eq!(StatementFormat::from_path(Path::new("a.csv")), StatementFormat::Unsupported);
        assert_eq!(StatementFormat::from_path(Path::new("xls")), StatementFormat::Unsupported);
    }

    #[test]
    fn test_unsupported_extension_yields_empty_tables() {
        let strategy = GalaxyStrategy::default();
        let tables = strategy.parse(Path::new("does/not/exist/statement.csv")).unwrap();
        assert!(tables.is_empty());
        assert_eq!(tables, StatementTables::empty());
        assert!(!GalaxyContext::new(&strategy.settings, "x.csv").is_supported());
    }

    #[test]
    fn test_text_statement_is_a_stub() {
        let context = GalaxyContext::new(&ParserSettings::default(), "does/not/exist/statement.txt");
        assert!(context.is_supported());
        assert!(context.parse().unwrap().is_empty());
    }

    #[test]
    fn test_missing_excel_file_is_an_error() {
        let strategy = GalaxyStrategy::default();
        let err = strategy.parse(Path::new("does/not/exist/statement.xlsx")).unwrap_err();
        assert!(err.to_string().contains("statement.xlsx"));
    }

    #[test]
    fn test_empty_tables_serialize_as_empty_arrays() {
        let value = serde_json::to_value(StatementTables::empty()).unwrap();
        assert_eq!(
            value,
            json!({"amount": [], "position": [], "trade_record": []})
        );
    }
}
