use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the sales dashboard pipeline.
///
/// An empty filter result is deliberately absent here: it is reported as a
/// regular outcome by the filter engine, not as a failure.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// One or more required columns are missing after header normalization.
    #[error("Missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    /// A retained record holds a quantity or unit price that is not numeric.
    #[error("Cannot convert {column} value {value:?} on row {row} to a number")]
    TypeConversion {
        row: usize,
        column: String,
        value: String,
    },

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input file extension is not a supported tabular format.
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// The input contained no header row at all.
    #[error("Input {0} contains no header row")]
    EmptyInput(String),

    /// A delimited text document could not be parsed or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A spreadsheet could not be opened or decoded.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// The report workbook could not be assembled.
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// The pipeline was asked to run before any table was loaded.
    #[error("No sales table loaded")]
    NoTableLoaded,

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be produced.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;
