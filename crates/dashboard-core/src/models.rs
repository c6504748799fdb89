use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Category assigned to records whose source has no category information.
pub const CATEGORY_SENTINEL: &str = "NA";

/// Canonical column order of a sales table, derived revenue last.
pub const SALES_COLUMNS: [&str; 9] = [
    "date",
    "order_id",
    "client",
    "country",
    "product",
    "category",
    "quantity",
    "unit_price",
    "revenue",
];

// ── Raw input ─────────────────────────────────────────────────────────────────

/// A single untyped cell as decoded from a CSV or spreadsheet source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl RawCell {
    /// Build a cell from a text field, mapping blank strings to [`RawCell::Empty`].
    pub fn from_text(s: &str) -> Self {
        if s.trim().is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(s.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawCell::Empty)
    }

    /// Render the cell as a label: text is trimmed, whole numbers lose their
    /// fractional part, dates use ISO format.
    pub fn to_label(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Text(s) => s.trim().to_string(),
            RawCell::Number(n) => format_plain_number(*n),
            RawCell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Format a number without a trailing `.0` when it is whole.
pub fn format_plain_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// A header row plus data rows, exactly as read from the source.
///
/// Rows may be shorter than the header; missing trailing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<RawCell>>) -> Self {
        Self { columns, rows }
    }

    /// Cell at `(row, col)`; out-of-range columns are treated as empty.
    pub fn cell(&self, row: usize, col: usize) -> &RawCell {
        static EMPTY: RawCell = RawCell::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }
}

// ── Sales records ─────────────────────────────────────────────────────────────

/// One row of the working sales table.
///
/// `revenue` is always derived from `quantity * unit_price` and can only be
/// set through [`SalesRecord::new`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub order_id: String,
    pub client: String,
    pub country: String,
    pub product: String,
    pub category: String,
    pub quantity: f64,
    pub unit_price: f64,
    revenue: f64,
}

impl SalesRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        order_id: impl Into<String>,
        client: impl Into<String>,
        country: impl Into<String>,
        product: impl Into<String>,
        category: impl Into<String>,
        quantity: f64,
        unit_price: f64,
    ) -> Self {
        Self {
            date,
            order_id: order_id.into(),
            client: client.into(),
            country: country.into(),
            product: product.into(),
            category: category.into(),
            quantity,
            unit_price,
            revenue: quantity * unit_price,
        }
    }

    pub fn revenue(&self) -> f64 {
        self.revenue
    }
}

/// Immutable in-memory sales table. Filtering builds a new table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest record dates, or `None` for an empty table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Distinct countries, sorted.
    pub fn countries(&self) -> Vec<String> {
        distinct_sorted(self.records.iter().map(|r| r.country.as_str()))
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        distinct_sorted(self.records.iter().map(|r| r.category.as_str()))
    }

    /// Project the table back to a raw table with canonical headers
    /// (including the derived revenue column).
    pub fn to_raw(&self) -> RawTable {
        let columns = SALES_COLUMNS.iter().map(|c| c.to_string()).collect();
        let rows = self
            .records
            .iter()
            .map(|r| {
                vec![
                    RawCell::Date(r.date),
                    RawCell::Text(r.order_id.clone()),
                    RawCell::Text(r.client.clone()),
                    RawCell::Text(r.country.clone()),
                    RawCell::Text(r.product.clone()),
                    RawCell::Text(r.category.clone()),
                    RawCell::Number(r.quantity),
                    RawCell::Number(r.unit_price),
                    RawCell::Number(r.revenue),
                ]
            })
            .collect();
        RawTable::new(columns, rows)
    }
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
