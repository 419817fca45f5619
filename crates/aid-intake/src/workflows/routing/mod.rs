//! Rule table lookups used to route a case to an organization and case area.

mod decision;
mod loader;

pub use decision::{CaseRouting, RoutingSheets};

use loader::Sheet;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Entry used when a sheet has no row for the requested key.
pub const FALLBACK_KEY: &str = "Andet";

#[derive(Debug)]
pub enum RuleTableError {
    Io { path: PathBuf, source: std::io::Error },
    Csv { sheet: String, source: csv::Error },
    Workbook { path: PathBuf, source: calamine::Error },
}

impl std::fmt::Display for RuleTableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleTableError::Io { path, source } => {
                write!(f, "failed to read rule table '{}': {}", path.display(), source)
            }
            RuleTableError::Csv { sheet, source } => {
                write!(f, "invalid CSV data in rule sheet '{}': {}", sheet, source)
            }
            RuleTableError::Workbook { path, source } => write!(
                f,
                "failed to load rule workbook '{}': {}",
                path.display(),
                source
            ),
        }
    }
}

impl std::error::Error for RuleTableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RuleTableError::Io { source, .. } => Some(source),
            RuleTableError::Csv { source, .. } => Some(source),
            RuleTableError::Workbook { source, .. } => Some(source),
        }
    }
}

/// A lookup miss on both the exact key and the fallback entry.
///
/// This is a business failure: the submission goes to manual handling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no entry for '{key}' and no 'Andet' fallback in rule sheet '{sheet}'")]
pub struct RoutingError {
    pub sheet: String,
    pub key: String,
}

/// Key/value sheets loaded once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    sheets: HashMap<String, Sheet>,
}

impl RuleTable {
    /// Loads a workbook, or a directory holding one CSV file per sheet.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RuleTableError> {
        let path = path.as_ref();
        let sheets = if path.is_dir() {
            loader::read_csv_dir(path)?
        } else if loader::is_workbook(path) {
            loader::read_workbook(path)?
        } else {
            let name = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default()
                .to_string();
            let file = std::fs::File::open(path).map_err(|source| RuleTableError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            vec![(name.clone(), loader::read_csv_sheet(&name, file)?)]
        };

        let table = Self::from_sheets(sheets);
        info!(
            source = %path.display(),
            sheets = table.sheets.len(),
            "rule table loaded"
        );
        Ok(table)
    }

    /// Builds a table from already materialized sheets.
    pub fn from_sheets<I, S, E, K, V>(sheets: I) -> Self
    where
        I: IntoIterator<Item = (S, E)>,
        S: Into<String>,
        E: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let sheets = sheets
            .into_iter()
            .map(|(name, entries)| {
                let entries = entries
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect();
                (name.into(), entries)
            })
            .collect();
        Self { sheets }
    }

    /// Adds or replaces one sheet read from CSV. Intended for startup only.
    pub fn with_csv_sheet<R: Read>(mut self, sheet: &str, reader: R) -> Result<Self, RuleTableError> {
        let entries = loader::read_csv_sheet(sheet, reader)?;
        self.sheets.insert(sheet.to_string(), entries);
        Ok(self)
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(String::as_str)
    }

    pub fn sheet_len(&self, sheet: &str) -> Option<usize> {
        self.sheets.get(sheet).map(HashMap::len)
    }

    /// Resolves `key` in `sheet`, falling back to the [`FALLBACK_KEY`] entry.
    pub fn lookup(&self, sheet: &str, key: &str) -> Result<&str, RoutingError> {
        let unresolved = || RoutingError {
            sheet: sheet.to_string(),
            key: key.to_string(),
        };
        let entries = self.sheets.get(sheet).ok_or_else(unresolved)?;

        if let Some(value) = entries.get(key) {
            return Ok(value.as_str());
        }

        let fallback = entries.get(FALLBACK_KEY).ok_or_else(unresolved)?;
        debug!(sheet, key, fallback = %fallback, "rule lookup fell back");
        Ok(fallback.as_str())
    }
}
