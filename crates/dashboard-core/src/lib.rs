//! Shared types for the sales dashboard: record models, the error taxonomy,
//! command-line settings, calendar helpers and display formatting.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{DashboardError, Result};
