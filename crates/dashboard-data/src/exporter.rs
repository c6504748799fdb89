//! Flat-file and workbook exports of a filtered subset.

use chrono::NaiveDate;
use dashboard_core::models::{format_plain_number, SalesRecord, SalesTable, SALES_COLUMNS};
use dashboard_core::{DashboardError, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tracing::info;

use crate::aggregator::{Dimension, SalesAggregator};

pub const DATA_SHEET: &str = "Data";
pub const TOP_PRODUCTS_SHEET: &str = "Top Products";
pub const WEEKLY_TREND_SHEET: &str = "Weekly Trend";

/// Number of products listed on the top-products sheet.
pub const WORKBOOK_TOP_PRODUCTS: usize = 20;

const DATE_CELL_FORMAT: &str = "yyyy-mm-dd";

// ── Public API ────────────────────────────────────────────────────────────────

/// Serialize `subset` as UTF-8 CSV, newest records first.
pub fn export_flat(subset: &SalesTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(SALES_COLUMNS)?;
    for r in newest_first(subset) {
        writer.write_record(record_fields(r))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| DashboardError::Io(e.into_error()))?;

    info!("Exported {} records to CSV ({} bytes)", subset.len(), bytes.len());
    Ok(bytes)
}

/// Build the report workbook: full data, top products and weekly trend,
/// each derived from `subset` on its own.
pub fn export_workbook(subset: &SalesTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    workbook.push_worksheet(data_sheet(subset).map_err(workbook_error)?);
    workbook.push_worksheet(top_products_sheet(subset).map_err(workbook_error)?);
    workbook.push_worksheet(weekly_trend_sheet(subset).map_err(workbook_error)?);
    let bytes = workbook.save_to_buffer().map_err(workbook_error)?;

    info!("Exported report workbook ({} bytes)", bytes.len());
    Ok(bytes)
}

// ── Sheets ────────────────────────────────────────────────────────────────────

fn data_sheet(subset: &SalesTable) -> std::result::Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(DATA_SHEET)?;
    write_header(&mut sheet, &SALES_COLUMNS)?;
    let date_format = date_format();

    for (i, r) in newest_first(subset).into_iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_date_with_format(row, 0, r.date, &date_format)?;
        sheet.write_string(row, 1, &r.order_id)?;
        sheet.write_string(row, 2, &r.client)?;
        sheet.write_string(row, 3, &r.country)?;
        sheet.write_string(row, 4, &r.product)?;
        sheet.write_string(row, 5, &r.category)?;
        sheet.write_number(row, 6, r.quantity)?;
        sheet.write_number(row, 7, r.unit_price)?;
        sheet.write_number(row, 8, r.revenue())?;
    }
    Ok(sheet)
}

fn top_products_sheet(subset: &SalesTable) -> std::result::Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(TOP_PRODUCTS_SHEET)?;
    write_header(&mut sheet, &["product", "revenue"])?;

    let top = SalesAggregator::top_n(subset, Dimension::Product, WORKBOOK_TOP_PRODUCTS);
    for (i, entry) in top.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &entry.label)?;
        sheet.write_number(row, 1, entry.revenue)?;
    }
    Ok(sheet)
}

fn weekly_trend_sheet(subset: &SalesTable) -> std::result::Result<Worksheet, XlsxError> {
    let mut sheet = Worksheet::new();
    sheet.set_name(WEEKLY_TREND_SHEET)?;
    write_header(&mut sheet, &["week_start", "revenue"])?;
    let date_format = date_format();

    for (i, point) in SalesAggregator::weekly_trend(subset).iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_date_with_format(row, 0, point.period_start, &date_format)?;
        sheet.write_number(row, 1, point.revenue)?;
    }
    Ok(sheet)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn date_format() -> Format {
    Format::new().set_num_format(DATE_CELL_FORMAT)
}

fn write_header(sheet: &mut Worksheet, columns: &[&str]) -> std::result::Result<(), XlsxError> {
    for (col, name) in columns.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    Ok(())
}

/// Records sorted by date descending; equal dates keep table order.
fn newest_first(subset: &SalesTable) -> Vec<&SalesRecord> {
    let mut records: Vec<&SalesRecord> = subset.records().iter().collect();
    records.sort_by(|a, b| b.date.cmp(&a.date));
    records
}

fn record_fields(r: &SalesRecord) -> [String; 9] {
    [
        iso_date(r.date),
        r.order_id.clone(),
        r.client.clone(),
        r.country.clone(),
        r.product.clone(),
        r.category.clone(),
        format_plain_number(r.quantity),
        format_plain_number(r.unit_price),
        format_plain_number(r.revenue()),
    ]
}

fn workbook_error(e: XlsxError) -> DashboardError {
    DashboardError::Workbook(e.to_string())
}

fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
