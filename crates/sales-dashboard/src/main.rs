mod bootstrap;
mod pages;

use std::path::PathBuf;

use anyhow::{Context, Result};
use dashboard_core::settings::Settings;
use dashboard_data::demo::DemoConfig;
use dashboard_data::exporter::{export_flat, export_workbook};
use dashboard_data::filter::FilterSpec;
use dashboard_data::reader::InputSource;
use dashboard_runtime::report::DashboardReport;
use dashboard_runtime::session::{DashboardSession, PipelineOutcome};

use crate::pages::{Page, PageContext, NO_DATA_MESSAGE};

const FLAT_EXPORT_NAME: &str = "sales_filtered.csv";
const WORKBOOK_EXPORT_NAME: &str = "dashboard_report.xlsx";

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Sales Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Page: {}, Format: {}, Top N: {}",
        settings.page,
        settings.format,
        settings.top_n
    );

    let page = Page::from_name(&settings.page)
        .with_context(|| format!("Unknown page: {}", settings.page))?;

    let mut session = DashboardSession::new();
    if settings.use_demo() {
        session.load_demo(&DemoConfig::new(settings.seed, settings.demo_rows))?;
    } else if let Some(path) = &settings.input {
        let source = InputSource::from_path(path)?;
        session
            .load_source(&source)
            .with_context(|| format!("Error while loading {}", path.display()))?;
    }

    let Some(defaults) = session.default_filters() else {
        print_no_data(&settings)?;
        return Ok(());
    };
    let filters = filters_from_settings(&settings, defaults);

    let report = match session.run(&filters, settings.top_n())? {
        PipelineOutcome::NoData => {
            print_no_data(&settings)?;
            return Ok(());
        }
        PipelineOutcome::Ready(report) => report,
    };

    let exported = if page == Page::Export {
        write_exports(&report, &settings.export_dir)?
    } else {
        Vec::new()
    };

    let loaded = session.current().context("No sales table loaded")?;
    let ctx = PageContext {
        source: &loaded.label,
        stats: loaded.stats(),
        currency: &settings.currency,
        exported: &exported,
    };

    let output = if settings.wants_json() {
        pages::render_json(page, &report, &ctx)?
    } else {
        pages::render_text(page, &report, &ctx)
    };
    println!("{output}");

    Ok(())
}

/// Start from the table-wide defaults and apply the command-line overrides.
fn filters_from_settings(settings: &Settings, defaults: FilterSpec) -> FilterSpec {
    FilterSpec::new(
        settings.date_min.unwrap_or(defaults.date_min),
        settings.date_max.unwrap_or(defaults.date_max),
    )
    .with_countries(settings.countries.iter().cloned())
    .with_categories(settings.categories.iter().cloned())
}

fn write_exports(report: &DashboardReport, dir: &std::path::Path) -> Result<Vec<PathBuf>> {
    let flat = export_flat(&report.subset)?;
    let workbook = export_workbook(&report.subset)?;
    Ok(vec![
        bootstrap::write_export(dir, FLAT_EXPORT_NAME, &flat)?,
        bootstrap::write_export(dir, WORKBOOK_EXPORT_NAME, &workbook)?,
    ])
}

fn print_no_data(settings: &Settings) -> Result<()> {
    tracing::warn!("{}", NO_DATA_MESSAGE);
    if settings.wants_json() {
        println!("{}", pages::no_data_json()?);
    } else {
        println!("{NO_DATA_MESSAGE}");
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
