//! Error types for the metabolite-screen library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum ScreenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet read error: {0}")]
    SpreadsheetRead(#[from] calamine::Error),

    #[error("Spreadsheet write error: {0}")]
    SpreadsheetWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Plot rendering error: {0}")]
    Plot(String),

    #[error("Strain '{0}' not found")]
    MissingStrain(String),

    #[error("Metabolite '{0}' not found")]
    MissingMetabolite(String),

    #[error("Duplicate {axis} key '{key}'")]
    DuplicateKey { axis: &'static str, key: String },

    #[error("Ratio and p-value tables are not aligned: {0}")]
    KeyMismatch(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid value '{value}' at row {row}, column {col}")]
    InvalidValue {
        value: String,
        row: usize,
        col: usize,
    },

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Sheet '{0}' not found in workbook")]
    MissingSheet(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScreenError {
    /// True for failures caused by a strain or metabolite key that is not present.
    pub fn is_key_lookup(&self) -> bool {
        matches!(self, Self::MissingStrain(_) | Self::MissingMetabolite(_))
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, ScreenError>;
