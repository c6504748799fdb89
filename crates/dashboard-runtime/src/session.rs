//! The dashboard session: one loaded table plus the loader cache.
//!
//! Each interaction calls [`DashboardSession::run`] with the current filter
//! values; the whole filter and aggregation pass is recomputed from the
//! loaded table every time.

use std::sync::Arc;

use dashboard_core::models::SalesTable;
use dashboard_core::{DashboardError, Result};
use dashboard_data::demo::DemoConfig;
use dashboard_data::filter::{select, FilterOutcome, FilterSpec};
use dashboard_data::pipeline::{ingest_demo, ingest_source, IngestStats, Ingested};
use dashboard_data::reader::InputSource;

use crate::loader_cache::{CacheKey, LoaderCache};
use crate::report::DashboardReport;

// ── Public types ──────────────────────────────────────────────────────────────

/// Result of one dashboard pass.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// The filters matched no record; nothing was aggregated.
    NoData,
    Ready(Box<DashboardReport>),
}

impl PipelineOutcome {
    pub fn report(&self) -> Option<&DashboardReport> {
        match self {
            PipelineOutcome::Ready(report) => Some(report),
            PipelineOutcome::NoData => None,
        }
    }
}

/// The table currently shown, with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub key: CacheKey,
    /// File name, or `"demo"`.
    pub label: String,
    data: Arc<Ingested>,
}

impl LoadedTable {
    pub fn table(&self) -> &SalesTable {
        &self.data.table
    }

    pub fn stats(&self) -> &IngestStats {
        &self.data.stats
    }
}

// ── DashboardSession ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct DashboardSession {
    cache: LoaderCache,
    current: Option<LoadedTable>,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest an uploaded file and make it the current table.
    ///
    /// On failure the previously loaded table (if any) stays current.
    pub fn load_source(&mut self, source: &InputSource) -> Result<&LoadedTable> {
        let key = CacheKey::for_source(source);
        let data = self
            .cache
            .get_or_load(key.clone(), || ingest_source(source))?;
        tracing::info!(
            source = %source.name,
            records = data.table.len(),
            "loaded sales table"
        );
        Ok(self.activate(key, source.name.clone(), data))
    }

    /// Generate (or reuse) the demo table and make it current.
    pub fn load_demo(&mut self, config: &DemoConfig) -> Result<&LoadedTable> {
        let key = CacheKey::for_demo(config);
        let data = self.cache.get_or_load(key.clone(), || ingest_demo(config))?;
        tracing::info!(
            seed = config.seed,
            records = data.table.len(),
            "loaded demo table"
        );
        Ok(self.activate(key, "demo".to_string(), data))
    }

    pub fn current(&self) -> Option<&LoadedTable> {
        self.current.as_ref()
    }

    pub fn table(&self) -> Option<&SalesTable> {
        self.current.as_ref().map(LoadedTable::table)
    }

    /// Filter covering the loaded table's full date range with no
    /// categorical restriction. `None` when nothing (or an empty table) is
    /// loaded.
    pub fn default_filters(&self) -> Option<FilterSpec> {
        self.table().and_then(FilterSpec::covering)
    }

    /// Filter the loaded table and compute every view on the subset.
    pub fn run(&self, filters: &FilterSpec, top_n: usize) -> Result<PipelineOutcome> {
        let table = self.table().ok_or(DashboardError::NoTableLoaded)?;

        match select(table, filters) {
            FilterOutcome::NoData => {
                tracing::debug!("no records match the current filters");
                Ok(PipelineOutcome::NoData)
            }
            FilterOutcome::Data(subset) => Ok(PipelineOutcome::Ready(Box::new(
                DashboardReport::build(filters.clone(), subset, top_n),
            ))),
        }
    }

    pub fn cache(&self) -> &LoaderCache {
        &self.cache
    }

    fn activate(&mut self, key: CacheKey, label: String, data: Arc<Ingested>) -> &LoadedTable {
        self.current.insert(LoadedTable { key, label, data })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
