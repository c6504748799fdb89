//! Session layer for the sales dashboard.
//!
//! Owns the loader cache and the currently loaded table, and runs the
//! filter and aggregation pass that feeds every page.

pub mod loader_cache;
pub mod report;
pub mod session;

pub use dashboard_core as core;
pub use dashboard_data as data;
