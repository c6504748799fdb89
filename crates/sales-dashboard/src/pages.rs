//! Page rendering for the terminal front end.
//!
//! Each page reads from one [`DashboardReport`]; text output uses the
//! display formatting helpers, JSON output serializes the same views.

use std::fmt::Write as _;
use std::path::PathBuf;

use dashboard_core::formatting::{format_count, format_money, format_number, percentage};
use dashboard_data::aggregator::{CohortMatrix, ParetoPoint, RankedRevenue, RevenuePoint};
use dashboard_data::filter::FilterSpec;
use dashboard_data::pipeline::IngestStats;
use dashboard_runtime::report::DashboardReport;
use serde_json::{json, Value};

/// Rows of the detailed table shown on the dashboard page.
const DETAIL_ROWS: usize = 20;

/// Cumulative revenue share highlighted on the Pareto view.
const PARETO_THRESHOLD: f64 = 0.8;

pub const NO_DATA_MESSAGE: &str = "No data for these filters.";

// ── Page ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Dashboard,
    Analysis,
    Export,
}

impl Page {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "home" => Some(Page::Home),
            "dashboard" => Some(Page::Dashboard),
            "analysis" => Some(Page::Analysis),
            "export" => Some(Page::Export),
            _ => None,
        }
    }
}

/// Everything a page shows besides the report itself.
pub struct PageContext<'a> {
    pub source: &'a str,
    pub stats: &'a IngestStats,
    pub currency: &'a str,
    /// Files written by the export page.
    pub exported: &'a [PathBuf],
}

// ── Text output ───────────────────────────────────────────────────────────────

pub fn render_text(page: Page, report: &DashboardReport, ctx: &PageContext<'_>) -> String {
    let mut out = String::new();
    match page {
        Page::Home => home_text(&mut out, report, ctx),
        Page::Dashboard => dashboard_text(&mut out, report, ctx),
        Page::Analysis => analysis_text(&mut out, report, ctx),
        Page::Export => export_text(&mut out, report, ctx),
    }
    out
}

fn home_text(out: &mut String, report: &DashboardReport, ctx: &PageContext<'_>) {
    heading(out, "Sales dashboard");
    let _ = writeln!(
        out,
        "Source: {} ({} records, {} rows dropped for invalid dates)",
        ctx.source,
        format_count(ctx.stats.records),
        format_count(ctx.stats.rows_dropped)
    );
    filters_line(out, &report.filters);
    out.push('\n');

    let kpis = &report.kpis;
    table(
        out,
        "Key figures",
        &[
            ("Revenue".to_string(), format_money(kpis.total_revenue, ctx.currency)),
            ("Orders".to_string(), format_count(kpis.order_count)),
            ("Average basket".to_string(), format_money(kpis.avg_order_value, ctx.currency)),
            ("Unique clients".to_string(), format_count(kpis.unique_clients)),
        ],
    );
}

fn dashboard_text(out: &mut String, report: &DashboardReport, ctx: &PageContext<'_>) {
    heading(out, "Dashboard");
    filters_line(out, &report.filters);
    out.push('\n');

    revenue_series(out, "Weekly revenue", &report.weekly_trend, ctx.currency, "%Y-%m-%d");
    ranking(
        out,
        &format!("Top {} products", report.top_n),
        &report.top_products,
        ctx.currency,
    );
    ranking(
        out,
        &format!("Top {} countries", report.top_n),
        &report.top_countries,
        ctx.currency,
    );

    let total = report.kpis.total_revenue;
    let split: Vec<(String, String)> = report
        .category_split
        .iter()
        .map(|c| {
            (
                c.label.clone(),
                format!(
                    "{}  ({} %)",
                    format_money(c.revenue, ctx.currency),
                    format_number(percentage(c.revenue, total, 1), 1)
                ),
            )
        })
        .collect();
    table(out, "Revenue by category", &split);

    let orders: Vec<(String, String)> = report
        .weekly_orders
        .iter()
        .map(|p| (p.period_start.format("%Y-%m-%d").to_string(), format_count(p.orders)))
        .collect();
    table(out, "Orders per week", &orders);

    detail_table(out, report, ctx.currency);
}

fn analysis_text(out: &mut String, report: &DashboardReport, ctx: &PageContext<'_>) {
    heading(out, "Detailed analysis");
    filters_line(out, &report.filters);
    out.push('\n');

    cohort_table(out, &report.cohorts);
    pareto_summary(out, &report.pareto, ctx.currency);
    revenue_series(out, "Monthly seasonality", &report.seasonality, ctx.currency, "%Y-%m");
}

fn export_text(out: &mut String, report: &DashboardReport, ctx: &PageContext<'_>) {
    heading(out, "Exports");
    filters_line(out, &report.filters);
    let _ = writeln!(out, "{} records exported", format_count(report.subset.len()));
    for path in ctx.exported {
        let _ = writeln!(out, "  {}", path.display());
    }
}

// ── Text sections ─────────────────────────────────────────────────────────────

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
}

fn filters_line(out: &mut String, filters: &FilterSpec) {
    let list = |set: &std::collections::BTreeSet<String>| {
        if set.is_empty() {
            "all".to_string()
        } else {
            set.iter().cloned().collect::<Vec<_>>().join(", ")
        }
    };
    let _ = writeln!(
        out,
        "Period: {} to {} | Countries: {} | Categories: {}",
        filters.date_min,
        filters.date_max,
        list(&filters.countries),
        list(&filters.categories)
    );
}

/// Two-column table with the label column padded to its widest entry.
fn table(out: &mut String, title: &str, rows: &[(String, String)]) {
    let _ = writeln!(out, "{title}");
    let width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    for (label, value) in rows {
        let pad = width - label.chars().count();
        let _ = writeln!(out, "  {}{}  {}", label, " ".repeat(pad), value);
    }
    out.push('\n');
}

fn revenue_series(
    out: &mut String,
    title: &str,
    points: &[RevenuePoint],
    currency: &str,
    date_format: &str,
) {
    let rows: Vec<(String, String)> = points
        .iter()
        .map(|p| {
            (
                p.period_start.format(date_format).to_string(),
                format_money(p.revenue, currency),
            )
        })
        .collect();
    table(out, title, &rows);
}

fn ranking(out: &mut String, title: &str, entries: &[RankedRevenue], currency: &str) {
    let rows: Vec<(String, String)> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (format!("{:>2}. {}", i + 1, e.label), format_money(e.revenue, currency)))
        .collect();
    table(out, title, &rows);
}

fn detail_table(out: &mut String, report: &DashboardReport, currency: &str) {
    let mut records: Vec<_> = report.subset.records().iter().collect();
    records.sort_by(|a, b| b.date.cmp(&a.date));

    let _ = writeln!(out, "Latest records");
    for r in records.iter().take(DETAIL_ROWS) {
        let _ = writeln!(
            out,
            "  {}  {:<10} {:<12} {:<12} {:<14} {:>4} x {:>12} = {:>14}",
            r.date.format("%Y-%m-%d"),
            r.order_id,
            r.client,
            r.country,
            r.product,
            format_number(r.quantity, 0),
            format_money(r.unit_price, currency),
            format_money(r.revenue(), currency)
        );
    }
    if records.len() > DETAIL_ROWS {
        let _ = writeln!(out, "  … and {} more", format_count(records.len() - DETAIL_ROWS));
    }
    out.push('\n');
}

fn cohort_table(out: &mut String, cohorts: &CohortMatrix) {
    let _ = writeln!(out, "Active clients by months since acquisition");
    let mut header = format!("  {:<8}", "cohort");
    for offset in &cohorts.offsets {
        let _ = write!(header, " {:>5}", format!("+{offset}"));
    }
    let _ = writeln!(out, "{header}");

    for (cohort, row) in cohorts.cohorts.iter().zip(&cohorts.counts) {
        let _ = write!(out, "  {:<8}", cohort.format("%Y-%m").to_string());
        for count in row {
            let _ = write!(out, " {:>5}", count);
        }
        out.push('\n');
    }
    out.push('\n');
}

fn pareto_summary(out: &mut String, pareto: &[ParetoPoint], currency: &str) {
    let _ = writeln!(out, "Pareto (cumulative revenue by client)");
    if pareto.is_empty() {
        let _ = writeln!(out, "  No revenue in the selection\n");
        return;
    }

    if let Some(point) = pareto
        .iter()
        .find(|p| p.cumulative_fraction >= PARETO_THRESHOLD)
    {
        let clients = point.rank + 1;
        let _ = writeln!(
            out,
            "  {} of {} clients ({} %) make {} % of revenue",
            format_count(clients),
            format_count(pareto.len()),
            format_number(percentage(clients as f64, pareto.len() as f64, 1), 1),
            format_number(PARETO_THRESHOLD * 100.0, 0)
        );
    }
    for p in pareto.iter().take(DETAIL_ROWS) {
        let _ = writeln!(
            out,
            "  {:>3}. {:<14} {:>14}  {:>6} %",
            p.rank + 1,
            p.client,
            format_money(p.revenue, currency),
            format_number(p.cumulative_fraction * 100.0, 1)
        );
    }
    out.push('\n');
}

// ── JSON output ───────────────────────────────────────────────────────────────

pub fn render_json(
    page: Page,
    report: &DashboardReport,
    ctx: &PageContext<'_>,
) -> serde_json::Result<String> {
    let value = match page {
        Page::Home => json!({
            "page": "home",
            "source": ctx.source,
            "ingest": ctx.stats,
            "filters": report.filters,
            "kpis": report.kpis,
        }),
        Page::Dashboard => json!({
            "page": "dashboard",
            "filters": report.filters,
            "kpis": report.kpis,
            "weekly_trend": report.weekly_trend,
            "top_products": report.top_products,
            "top_countries": report.top_countries,
            "category_split": report.category_split,
            "weekly_orders": report.weekly_orders,
            "records": report.subset.records(),
        }),
        Page::Analysis => json!({
            "page": "analysis",
            "filters": report.filters,
            "cohorts": report.cohorts,
            "pareto": report.pareto,
            "seasonality": report.seasonality,
        }),
        Page::Export => json!({
            "page": "export",
            "filters": report.filters,
            "records": report.subset.len(),
            "files": ctx.exported,
        }),
    };
    serde_json::to_string_pretty(&value)
}

pub fn no_data_json() -> serde_json::Result<String> {
    let value: Value = json!({ "status": "no_data", "message": NO_DATA_MESSAGE });
    serde_json::to_string_pretty(&value)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
