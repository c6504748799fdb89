use dashboard_core::models::{RawCell, SalesRecord, SalesTable};
use dashboard_core::{DashboardError, Result};
use tracing::debug;

use crate::normalizer::NormalizedTable;

/// Coerce quantity and unit price to numbers and build the sales table with
/// `revenue = quantity * unit_price`.
///
/// The first retained record holding a non-numeric operand aborts the whole
/// conversion with [`DashboardError::TypeConversion`]. Blank operands count
/// as non-numeric; they are not skipped as missing values.
pub fn add_revenue(table: NormalizedTable) -> Result<SalesTable> {
    let mut records = Vec::with_capacity(table.records.len());

    for r in table.records {
        let quantity = coerce_number(&r.quantity, "quantity", r.source_row)?;
        let unit_price = coerce_number(&r.unit_price, "unit_price", r.source_row)?;
        records.push(SalesRecord::new(
            r.date, r.order_id, r.client, r.country, r.product, r.category, quantity, unit_price,
        ));
    }

    debug!("Derived revenue for {} records", records.len());
    Ok(SalesTable::new(records))
}

fn coerce_number(cell: &RawCell, column: &str, row: usize) -> Result<f64> {
    let value = match cell {
        RawCell::Number(n) => Some(*n),
        RawCell::Text(s) => parse_decimal(s),
        RawCell::Empty | RawCell::Date(_) => None,
    };

    value
        .filter(|v| v.is_finite())
        .ok_or_else(|| DashboardError::TypeConversion {
            row,
            column: column.to_string(),
            value: cell.to_label(),
        })
}

/// Parse a decimal number, accepting a decimal comma when no dot is present.
fn parse_decimal(s: &str) -> Option<f64> {
    let s = s.trim();
    s.parse::<f64>().ok().or_else(|| {
        if s.contains('.') {
            None
        } else {
            s.replacen(',', ".", 1).parse::<f64>().ok()
        }
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
