//! # Settings Loader
//!
//! Loads the parser settings from a JSON file. The settings carry the broker and
//! product identifiers a statement belongs to, the display values stamped on every
//! record table, and the logging setup used by the binaries.
//!
//! Every field has a default, so an empty `{}` (or no file at all, via
//! [`load_settings_with_fallback`]) gives a working configuration.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! // Load settings from a specific path
//! let settings = settings_loader::load_settings("config/galaxy.json")?;
//!
//! // Load from default location
//! let settings = settings_loader::load_default_settings()?;
//!
//! // Optional path, falling back to settings.json and then to defaults
//! let path = Some(PathBuf::from("settings.json"));
//! let settings = settings_loader::load_settings_with_fallback(path.as_ref())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use logger::LogConfig;
use serde::Deserialize;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Broker key used by the dispatch layer, e.g. `yhzq`.
    pub broker: String,
    /// Product key the statement belongs to.
    pub product: String,
    /// Broker name written into `BROKER_NAME`.
    pub broker_name: String,
    /// Currency tag written into `CURRENCY` and `CLOSE_PRICE_CURRENCY`.
    pub currency: String,
    pub log: LogConfig,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            broker: "yhzq".to_string(),
            product: "product15".to_string(),
            broker_name: "银河证券".to_string(),
            currency: "RMB".to_string(),
            log: LogConfig::default(),
        }
    }
}

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<ParserSettings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: ParserSettings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    Ok(settings)
}

/// Loads settings from the default location (settings.json in the current directory)
pub fn load_default_settings() -> Result<ParserSettings> {
    load_settings(DEFAULT_SETTINGS_FILE)
}

/// Loads settings from an optional path, returning None if no path is provided
pub fn load_optional_settings(path: Option<&PathBuf>) -> Result<Option<ParserSettings>> {
    match path {
        Some(settings_path) => Ok(Some(load_settings(settings_path)?)),
        None => Ok(None),
    }
}

/// Resolution order: the given path, then settings.json in the current directory,
/// then built-in defaults. A file that exists but does not parse is an error.
pub fn load_settings_with_fallback(path: Option<&PathBuf>) -> Result<ParserSettings> {
    if let Some(settings_path) = path {
        if settings_file_exists(settings_path) {
            return load_settings(settings_path);
        }
    }

    if default_settings_exist() {
        return load_default_settings();
    }

    Ok(ParserSettings::default())
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().is_file()
}

/// Checks if the default settings file (settings.json) exists
pub fn default_settings_exist() -> bool {
    settings_file_exists(DEFAULT_SETTINGS_FILE)
}
