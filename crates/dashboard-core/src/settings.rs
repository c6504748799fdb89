use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use crate::time_utils::parse_iso_date_arg;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Sales analytics dashboard: KPIs, rankings, cohorts and exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sales-dashboard",
    about = "Sales analytics dashboard: KPIs, rankings, cohorts and exports",
    version
)]
pub struct Settings {
    /// Sales file to load (CSV or spreadsheet)
    #[arg(long, env = "SALES_DASHBOARD_INPUT")]
    pub input: Option<PathBuf>,

    /// Use the synthetic demo dataset even when an input file is given
    #[arg(long)]
    pub demo: bool,

    /// Seed of the demo dataset generator
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Number of rows in the demo dataset
    #[arg(long, default_value = "6000")]
    pub demo_rows: usize,

    /// Currency symbol used for display
    #[arg(long, default_value = "€", value_parser = ["€", "$", "£"])]
    pub currency: String,

    /// Number of entries in top-N rankings (5-20)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(5..=20))]
    pub top_n: u32,

    /// Lower date bound, inclusive (YYYY-MM-DD); defaults to the earliest record
    #[arg(long, value_parser = parse_iso_date_arg)]
    pub date_min: Option<NaiveDate>,

    /// Upper date bound, inclusive (YYYY-MM-DD); defaults to the latest record
    #[arg(long, value_parser = parse_iso_date_arg)]
    pub date_max: Option<NaiveDate>,

    /// Keep only these countries (repeatable)
    #[arg(long = "country")]
    pub countries: Vec<String>,

    /// Keep only these categories (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Page to display
    #[arg(long, default_value = "home", value_parser = ["home", "dashboard", "analysis", "export"])]
    pub page: String,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Directory receiving exported files
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse process arguments and apply derived values.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    /// `true` when the demo dataset should be loaded instead of a file.
    pub fn use_demo(&self) -> bool {
        self.demo || self.input.is_none()
    }

    pub fn top_n(&self) -> usize {
        self.top_n as usize
    }

    pub fn wants_json(&self) -> bool {
        self.format == "json"
    }

    /// `--debug` overrides the log level.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
