use anyhow::Result;
use std::path::Path;

use crate::{StatementStrategy, StatementTables};

/// Plain-text statements are recognized but not parsed yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct GalaxyTextParser;

impl StatementStrategy for GalaxyTextParser {
    fn parse(&self, path: &Path) -> Result<StatementTables> {
        tracing::debug!(file = %path.display(), "text statements are not parsed, returning empty tables");
        Ok(StatementTables::empty())
    }
}
