//! Ingestion pipeline: raw table → normalized records → sales table.
//!
//! Uploaded files and the demo generator share [`ingest`], so both go
//! through identical schema checks and revenue derivation.

use std::time::Instant;

use dashboard_core::models::{RawTable, SalesTable};
use dashboard_core::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::demo::{demo_raw_table, DemoConfig};
use crate::normalizer::normalize;
use crate::reader::{read_raw_table, InputSource};
use crate::revenue::add_revenue;

// ── Public types ──────────────────────────────────────────────────────────────

/// Counters collected while ingesting one input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestStats {
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub records: usize,
    pub elapsed_seconds: f64,
}

/// A ready sales table with the stats of the run that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingested {
    pub table: SalesTable,
    pub stats: IngestStats,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Normalize `raw` and derive revenue.
pub fn ingest(raw: &RawTable) -> Result<Ingested> {
    let start = Instant::now();

    let normalized = normalize(raw)?;
    let rows_dropped = normalized.dropped_rows;
    let table = add_revenue(normalized)?;

    let stats = IngestStats {
        rows_read: raw.rows.len(),
        rows_dropped,
        records: table.len(),
        elapsed_seconds: start.elapsed().as_secs_f64(),
    };
    info!(
        "Ingested {} records from {} rows in {:.3}s",
        stats.records, stats.rows_read, stats.elapsed_seconds
    );

    Ok(Ingested { table, stats })
}

/// Read `source` (CSV or spreadsheet) and ingest it.
pub fn ingest_source(source: &InputSource) -> Result<Ingested> {
    let raw = read_raw_table(source)?;
    ingest(&raw)
}

/// Generate the demo table for `config` and ingest it.
pub fn ingest_demo(config: &DemoConfig) -> Result<Ingested> {
    ingest(&demo_raw_table(config))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
