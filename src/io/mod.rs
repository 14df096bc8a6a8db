//! Tabular input from delimited text files and spreadsheets.

mod delimited;
mod spreadsheet;

pub use delimited::read_delimited;
pub use spreadsheet::read_sheet;

use crate::data::{KeyedTable, StrainAliases};
use crate::error::{Result, ScreenError};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Location of a table and how to find its header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSource {
    /// File path (spreadsheet or delimited text).
    pub path: PathBuf,
    /// Sheet name for spreadsheets; the first sheet when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    /// 0-based row holding the column header.
    #[serde(default)]
    pub header_row: usize,
    /// Field delimiter for text files; inferred from the extension when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<char>,
}

impl TableSource {
    /// Source with the header on the first row.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            sheet: None,
            header_row: 0,
            delimiter: None,
        }
    }

    /// Select a sheet.
    pub fn sheet(mut self, sheet: &str) -> Self {
        self.sheet = Some(sheet.to_string());
        self
    }

    /// Set the header row.
    pub fn header_row(mut self, row: usize) -> Self {
        self.header_row = row;
        self
    }

    /// Check whether the file is read as a spreadsheet.
    pub fn is_spreadsheet(&self) -> bool {
        extension(&self.path)
            .map(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }

    fn text_delimiter(&self) -> Result<u8> {
        let delimiter = match self.delimiter {
            Some(d) => d,
            None if extension(&self.path).as_deref() == Some("csv") => ',',
            None => '\t',
        };
        u8::try_from(delimiter).map_err(|_| {
            ScreenError::InvalidParameter(format!("Delimiter '{}' is not a single byte", delimiter))
        })
    }

    /// Read the source into a grid of string cells, starting at the header row.
    pub fn read_grid(&self) -> Result<Vec<Vec<String>>> {
        if self.is_spreadsheet() {
            read_sheet(&self.path, self.sheet.as_deref(), self.header_row)
        } else {
            read_delimited(&self.path, self.text_delimiter()?, self.header_row)
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Load a metabolite × strain table.
pub fn load_table(source: &TableSource) -> Result<KeyedTable> {
    let table = KeyedTable::from_grid(&source.read_grid()?)?;
    info!(
        "Loaded {} metabolites x {} strains from {:?}",
        table.n_rows(),
        table.n_cols(),
        source.path
    );
    Ok(table)
}

/// Load an alias table with named alias and canonical-id columns.
pub fn load_aliases(
    source: &TableSource,
    alias_column: &str,
    canonical_column: &str,
) -> Result<StrainAliases> {
    let aliases = StrainAliases::from_grid(&source.read_grid()?, alias_column, canonical_column)?;
    info!("Loaded {} strain aliases from {:?}", aliases.len(), source.path);
    Ok(aliases)
}
