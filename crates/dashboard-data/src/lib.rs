//! Data layer for the sales dashboard.
//!
//! Decodes uploaded CSV and spreadsheet files, validates them against the
//! sales schema, derives revenue, filters, aggregates and exports. The demo
//! generator feeds the same pipeline.

pub mod aggregator;
pub mod demo;
pub mod exporter;
pub mod filter;
pub mod normalizer;
pub mod pipeline;
pub mod reader;
pub mod revenue;

pub use dashboard_core as core;
