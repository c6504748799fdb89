//! Session-scoped memoization of ingested tables.
//!
//! Each input is parsed once per session and identified by its content hash
//! (uploads) or its generator parameters (demo). Entries are never evicted;
//! a failed load leaves the cache untouched so the next attempt runs again.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashboard_core::Result;
use dashboard_data::demo::DemoConfig;
use dashboard_data::pipeline::Ingested;
use dashboard_data::reader::InputSource;

// ── CacheKey ──────────────────────────────────────────────────────────────────

/// Identity of an input for memoization purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// SHA-256 hex digest of an uploaded file's bytes.
    Content(String),
    Demo { seed: u64, rows: usize },
}

impl CacheKey {
    pub fn for_source(source: &InputSource) -> Self {
        CacheKey::Content(source.content_hash())
    }

    pub fn for_demo(config: &DemoConfig) -> Self {
        CacheKey::Demo {
            seed: config.seed,
            rows: config.rows,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Content(hash) => write!(f, "content:{}", &hash[..hash.len().min(12)]),
            CacheKey::Demo { seed, rows } => write!(f, "demo:{seed}:{rows}"),
        }
    }
}

// ── LoaderCache ───────────────────────────────────────────────────────────────

/// Memoizes ingestion results by [`CacheKey`].
///
/// # Example
/// ```
/// use dashboard_runtime::loader_cache::{CacheKey, LoaderCache};
/// use dashboard_data::demo::DemoConfig;
/// use dashboard_data::pipeline::ingest_demo;
///
/// let mut cache = LoaderCache::new();
/// let config = DemoConfig::new(1, 50);
/// let key = CacheKey::for_demo(&config);
/// let first = cache.get_or_load(key.clone(), || ingest_demo(&config)).unwrap();
/// let second = cache.get_or_load(key, || ingest_demo(&config)).unwrap();
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// assert_eq!(cache.hits(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LoaderCache {
    entries: HashMap<CacheKey, Arc<Ingested>>,
    hits: u64,
    misses: u64,
}

impl LoaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the cached table for `key`, running `loader` on a miss.
    ///
    /// Loader errors propagate unchanged and nothing is stored for `key`.
    pub fn get_or_load<F>(&mut self, key: CacheKey, loader: F) -> Result<Arc<Ingested>>
    where
        F: FnOnce() -> Result<Ingested>,
    {
        if let Some(entry) = self.entries.get(&key) {
            self.hits += 1;
            tracing::debug!(key = %key, "loader cache hit");
            return Ok(Arc::clone(entry));
        }

        self.misses += 1;
        tracing::debug!(key = %key, "loader cache miss");
        let loaded = Arc::new(loader()?);
        self.entries.insert(key, Arc::clone(&loaded));
        Ok(loaded)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        tracing::debug!("loader cache cleared");
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
