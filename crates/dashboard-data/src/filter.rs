//! Date-range and categorical filtering of a sales table.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use dashboard_core::models::{SalesRecord, SalesTable};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ── FilterSpec ────────────────────────────────────────────────────────────────

/// Resolved filter values supplied by the front end.
///
/// Empty `countries` / `categories` sets mean "no restriction".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub date_min: NaiveDate,
    pub date_max: NaiveDate,
    pub countries: BTreeSet<String>,
    pub categories: BTreeSet<String>,
}

impl FilterSpec {
    pub fn new(date_min: NaiveDate, date_max: NaiveDate) -> Self {
        Self {
            date_min,
            date_max,
            countries: BTreeSet::new(),
            categories: BTreeSet::new(),
        }
    }

    /// Filter spanning the full date range of `table` with no categorical
    /// restriction. `None` for an empty table.
    pub fn covering(table: &SalesTable) -> Option<Self> {
        let (min, max) = table.date_bounds()?;
        Some(Self::new(min, max))
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// `true` when `record` passes every active predicate.
    pub fn matches(&self, record: &SalesRecord) -> bool {
        self.date_min <= record.date
            && record.date <= self.date_max
            && (self.countries.is_empty() || self.countries.contains(&record.country))
            && (self.categories.is_empty() || self.categories.contains(&record.category))
    }
}

// ── FilterOutcome ─────────────────────────────────────────────────────────────

/// Result of [`select`]: a non-empty subset, or the "no data for filters"
/// state that callers must handle before aggregating.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    Data(SalesTable),
    NoData,
}

impl FilterOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, FilterOutcome::NoData)
    }

    pub fn into_table(self) -> Option<SalesTable> {
        match self {
            FilterOutcome::Data(table) => Some(table),
            FilterOutcome::NoData => None,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Build the subset of `table` matching `spec`. Swapped date bounds yield an
/// empty subset. The source table is left untouched.
pub fn filter(table: &SalesTable, spec: &FilterSpec) -> SalesTable {
    if spec.date_min > spec.date_max {
        debug!(
            "Date bounds swapped ({} > {}); empty subset",
            spec.date_min, spec.date_max
        );
        return SalesTable::default();
    }

    let records: Vec<SalesRecord> = table
        .records()
        .iter()
        .filter(|r| spec.matches(r))
        .cloned()
        .collect();

    debug!("Filter kept {} of {} records", records.len(), table.len());
    SalesTable::new(records)
}

/// Like [`filter`], but reports an empty subset as [`FilterOutcome::NoData`].
pub fn select(table: &SalesTable, spec: &FilterSpec) -> FilterOutcome {
    let subset = filter(table, spec);
    if subset.is_empty() {
        FilterOutcome::NoData
    } else {
        FilterOutcome::Data(subset)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
