//! Source decoding for uploaded sales files.
//!
//! Turns the bytes of a CSV or spreadsheet file into a [`RawTable`] of typed
//! cells. No schema knowledge lives here; see [`crate::normalizer`].

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use dashboard_core::models::{RawCell, RawTable};
use dashboard_core::{DashboardError, Result};
use sha2::{Digest, Sha256};
use tracing::debug;

// ── InputSource ───────────────────────────────────────────────────────────────

/// Container format of an input file, detected from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Spreadsheet,
}

impl SourceFormat {
    /// Detect the format from a file name. Returns `None` for unknown
    /// extensions.
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())?;
        match ext.as_str() {
            "csv" | "txt" | "tsv" => Some(SourceFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Some(SourceFormat::Spreadsheet),
            _ => None,
        }
    }
}

/// An uploaded file: its display name and full contents.
#[derive(Debug, Clone)]
pub struct InputSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputSource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| DashboardError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn format(&self) -> Result<SourceFormat> {
        SourceFormat::from_name(&self.name)
            .ok_or_else(|| DashboardError::UnsupportedFormat(self.name.clone()))
    }

    /// SHA-256 of the contents, hex encoded. Identifies the input for caching.
    pub fn content_hash(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decode `source` into a raw table according to its detected format.
pub fn read_raw_table(source: &InputSource) -> Result<RawTable> {
    let table = match source.format()? {
        SourceFormat::Csv => read_csv(&source.bytes, &source.name)?,
        SourceFormat::Spreadsheet => read_spreadsheet(&source.bytes, &source.name)?,
    };
    debug!(
        "Read {} rows x {} columns from {}",
        table.rows.len(),
        table.columns.len(),
        source.name
    );
    Ok(table)
}

/// Decode delimited text. The delimiter is sniffed from the header line.
pub fn read_csv(bytes: &[u8], name: &str) -> Result<RawTable> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let delimiter = sniff_delimiter(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() || columns.iter().all(|c| c.trim().is_empty()) {
        return Err(DashboardError::EmptyInput(name.to_string()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row: Vec<RawCell> = record.iter().map(RawCell::from_text).collect();
        row.resize(columns.len(), RawCell::Empty);
        rows.push(row);
    }

    Ok(RawTable::new(columns, rows))
}

/// Decode the first worksheet of a spreadsheet; its first row is the header.
pub fn read_spreadsheet(bytes: &[u8], name: &str) -> Result<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| DashboardError::Spreadsheet(format!("{}: {}", name, e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DashboardError::EmptyInput(name.to_string()))?
        .map_err(|e| DashboardError::Spreadsheet(format!("{}: {}", name, e)))?;

    let mut rows_iter = range.rows();
    let header = rows_iter
        .next()
        .ok_or_else(|| DashboardError::EmptyInput(name.to_string()))?;
    let columns: Vec<String> = header.iter().map(|c| convert_cell(c).to_label()).collect();

    let rows = rows_iter
        .map(|r| {
            let mut row: Vec<RawCell> = r.iter().map(convert_cell).collect();
            row.resize(columns.len(), RawCell::Empty);
            row
        })
        .collect();

    Ok(RawTable::new(columns, rows))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Pick the most frequent of `,` `;` and tab in the first line; `,` wins ties.
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|&b| b == b'\n').next().unwrap_or(&[]);
    let count = |d: u8| first_line.iter().filter(|&&b| b == d).count();

    let mut best = b',';
    let mut best_count = count(b',');
    for candidate in [b';', b'\t'] {
        let n = count(candidate);
        if n > best_count {
            best = candidate;
            best_count = n;
        }
    }
    best
}

fn convert_cell(cell: &Data) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::String(s) => RawCell::from_text(s),
        Data::Float(f) => RawCell::Number(*f),
        Data::Int(i) => RawCell::Number(*i as f64),
        Data::Bool(b) => RawCell::Text(b.to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_datetime() {
            Some(dt) => RawCell::Date(dt.date()),
            None => RawCell::Text(cell.to_string()),
        },
        Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(e) => RawCell::Text(format!("{:?}", e)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
