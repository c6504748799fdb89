//! Schema validation and coercion of raw tables.
//!
//! Header names are matched case-insensitively after trimming, with the
//! French headers of the legacy upload template accepted as aliases.

use chrono::NaiveDate;
use dashboard_core::models::{RawCell, RawTable, CATEGORY_SENTINEL};
use dashboard_core::time_utils::parse_calendar_date;
use dashboard_core::{DashboardError, Result};
use tracing::debug;

/// Required columns in check order, each with its accepted aliases.
const REQUIRED_COLUMNS: [(&str, &[&str]); 7] = [
    ("date", &[]),
    ("order_id", &["commande_id"]),
    ("client", &[]),
    ("country", &["pays"]),
    ("product", &["produit"]),
    ("quantity", &["quantite"]),
    ("unit_price", &["prix_unitaire"]),
];

const CATEGORY_COLUMN: (&str, &[&str]) = ("category", &["categorie"]);

// ── Normalized types ──────────────────────────────────────────────────────────

/// A record with a validated date and canonical labels. Quantity and unit
/// price are still raw; [`crate::revenue::add_revenue`] coerces them.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// 1-based data row number in the source (header excluded).
    pub source_row: usize,
    pub date: NaiveDate,
    pub order_id: String,
    pub client: String,
    pub country: String,
    pub product: String,
    pub category: String,
    pub quantity: RawCell,
    pub unit_price: RawCell,
}

/// Output of [`normalize`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTable {
    pub records: Vec<NormalizedRecord>,
    /// Rows removed because their date was empty or unparseable.
    pub dropped_rows: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Validate `raw` against the sales schema and coerce dates and labels.
///
/// Fails with [`DashboardError::Schema`] listing every missing required
/// column. Rows whose date cannot be parsed are dropped without error.
/// Columns outside the schema (including any pre-computed revenue) are
/// ignored.
pub fn normalize(raw: &RawTable) -> Result<NormalizedTable> {
    let headers: Vec<String> = raw
        .columns
        .iter()
        .map(|c| c.trim().to_lowercase())
        .collect();

    let mut indices = [0usize; REQUIRED_COLUMNS.len()];
    let mut missing = Vec::new();
    for (slot, (name, aliases)) in REQUIRED_COLUMNS.iter().enumerate() {
        match find_column(&headers, name, aliases) {
            Some(idx) => indices[slot] = idx,
            None => missing.push(name.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(DashboardError::Schema { missing });
    }
    let [date_idx, order_idx, client_idx, country_idx, product_idx, qty_idx, price_idx] = indices;
    let category_idx = find_column(&headers, CATEGORY_COLUMN.0, CATEGORY_COLUMN.1);

    let mut records = Vec::with_capacity(raw.rows.len());
    let mut dropped_rows = 0usize;

    for row in 0..raw.rows.len() {
        let Some(date) = cell_to_date(raw.cell(row, date_idx)) else {
            dropped_rows += 1;
            continue;
        };

        let category = category_idx
            .map(|idx| raw.cell(row, idx).to_label())
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| CATEGORY_SENTINEL.to_string());

        records.push(NormalizedRecord {
            source_row: row + 1,
            date,
            order_id: raw.cell(row, order_idx).to_label(),
            client: raw.cell(row, client_idx).to_label(),
            country: raw.cell(row, country_idx).to_label(),
            product: raw.cell(row, product_idx).to_label(),
            category,
            quantity: raw.cell(row, qty_idx).clone(),
            unit_price: raw.cell(row, price_idx).clone(),
        });
    }

    debug!(
        "Normalized {} rows ({} dropped for invalid dates)",
        records.len(),
        dropped_rows
    );

    Ok(NormalizedTable {
        records,
        dropped_rows,
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Index of the first header equal to `name` or, failing that, to an alias.
fn find_column(headers: &[String], name: &str, aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|h| h == name).or_else(|| {
        aliases
            .iter()
            .find_map(|alias| headers.iter().position(|h| h == alias))
    })
}

fn cell_to_date(cell: &RawCell) -> Option<NaiveDate> {
    match cell {
        RawCell::Date(d) => Some(*d),
        RawCell::Text(s) => parse_calendar_date(s),
        RawCell::Empty | RawCell::Number(_) => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawCell {
        RawCell::Text(s.to_string())
    }

    fn raw(columns: &[&str], rows: Vec<Vec<RawCell>>) -> RawTable {
        RawTable::new(columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    fn french_row(date: &str) -> Vec<RawCell> {
        vec![
            text(date),
            text("C-1"),
            text("Client 001"),
            text("France"),
            text("Clavier"),
            text("2"),
            text("10"),
        ]
    }

    const FRENCH: [&str; 7] = [
        "Date",
        " Commande_ID ",
        "client",
        "PAYS",
        "produit",
        "quantite",
        "prix_unitaire",
    ];

    // ── schema ────────────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_accepts_french_aliases_and_messy_headers() {
        let table = normalize(&raw(&FRENCH, vec![french_row("2024-01-01")])).unwrap();
        assert_eq!(table.records.len(), 1);
        let r = &table.records[0];
        assert_eq!(r.order_id, "C-1");
        assert_eq!(r.country, "France");
        assert_eq!(r.product, "Clavier");
        assert_eq!(r.quantity, text("2"));
    }

    #[test]
    fn test_normalize_missing_quantity_is_schema_error() {
        let columns = ["date", "order_id", "client", "country", "product", "unit_price"];
        let err = normalize(&raw(&columns, vec![])).unwrap_err();
        match err {
            DashboardError::Schema { missing } => assert_eq!(missing, vec!["quantity"]),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_normalize_lists_all_missing_in_check_order() {
        let err = normalize(&raw(&["client", "product"], vec![])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required columns: date, order_id, country, quantity, unit_price"
        );
    }

    #[test]
    fn test_canonical_name_preferred_over_alias() {
        let columns = [
            "date", "order_id", "commande_id", "client", "country", "product", "quantity",
            "unit_price",
        ];
        let row = vec![
            text("2024-01-01"),
            text("EN"),
            text("FR"),
            text("A"),
            text("FR"),
            text("P"),
            text("1"),
            text("1"),
        ];
        let table = normalize(&raw(&columns, vec![row])).unwrap();
        assert_eq!(table.records[0].order_id, "EN");
    }

    // ── dates ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_unparseable_dates_are_dropped_silently() {
        let rows = vec![
            french_row("2024-01-01"),
            french_row("not a date"),
            french_row(""),
            french_row("08/01/2024"),
        ];
        let table = normalize(&raw(&FRENCH, rows)).unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.dropped_rows, 2);
        assert_eq!(table.records[1].source_row, 4);
        assert_eq!(
            table.records[1].date,
            NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
        );
    }

    #[test]
    fn test_spreadsheet_date_cells_pass_through() {
        let mut row = french_row("");
        let d = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        row[0] = RawCell::Date(d);
        let table = normalize(&raw(&FRENCH, vec![row])).unwrap();
        assert_eq!(table.records[0].date, d);
    }

    // ── category ──────────────────────────────────────────────────────────────

    #[test]
    fn test_missing_category_column_uses_sentinel() {
        let table = normalize(&raw(&FRENCH, vec![french_row("2024-01-01")])).unwrap();
        assert_eq!(table.records[0].category, "NA");
    }

    #[test]
    fn test_category_alias_and_empty_cell() {
        let mut columns = FRENCH.to_vec();
        columns.push("Categorie");
        let mut first = french_row("2024-01-01");
        first.push(text("Périphériques"));
        let mut second = french_row("2024-01-02");
        second.push(RawCell::Empty);

        let table = normalize(&raw(&columns, vec![first, second])).unwrap();
        assert_eq!(table.records[0].category, "Périphériques");
        assert_eq!(table.records[1].category, "NA");
    }

    // ── labels ────────────────────────────────────────────────────────────────

    #[test]
    fn test_numeric_identifiers_render_without_fraction() {
        let mut row = french_row("2024-01-01");
        row[1] = RawCell::Number(100042.0);
        let table = normalize(&raw(&FRENCH, vec![row])).unwrap();
        assert_eq!(table.records[0].order_id, "100042");
    }

    // ── idempotence ───────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_of_projected_table_is_identical() {
        use crate::revenue::add_revenue;

        let rows = vec![
            french_row("2024-01-01"),
            french_row("31/01/2024"),
            french_row("2024-02-03T10:15:00"),
        ];
        let first = add_revenue(normalize(&raw(&FRENCH, rows)).unwrap()).unwrap();
        let again = normalize(&first.to_raw()).unwrap();
        assert_eq!(again.dropped_rows, 0);
        assert_eq!(add_revenue(again).unwrap(), first);
    }

    proptest::proptest! {
        #[test]
        fn normalize_is_idempotent(
            rows in proptest::collection::vec(
                (0i64..400, "[A-Za-z0-9 ]{0,8}", "[A-Za-z]{1,6}", 1u32..10, 0u32..50_000),
                0..40,
            )
        ) {
            use crate::revenue::add_revenue;

            let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            let raw_rows: Vec<Vec<RawCell>> = rows
                .iter()
                .enumerate()
                .map(|(i, (offset, client, country, qty, cents))| {
                    vec![
                        RawCell::Date(base + chrono::Duration::days(*offset)),
                        RawCell::Text(format!("O{i}")),
                        RawCell::from_text(client),
                        RawCell::Text(country.clone()),
                        RawCell::Text("P".to_string()),
                        RawCell::Number(f64::from(*qty)),
                        RawCell::Number(f64::from(*cents) / 100.0),
                    ]
                })
                .collect();
            let columns = [
                "date", "order_id", "client", "country", "product", "quantity", "unit_price",
            ];

            let first = add_revenue(normalize(&raw(&columns, raw_rows)).unwrap()).unwrap();
            let second = add_revenue(normalize(&first.to_raw()).unwrap()).unwrap();
            proptest::prop_assert_eq!(second, first);
        }
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = raw(&FRENCH, vec![french_row("bad"), french_row("2024-01-01")]);
        let before = input.clone();
        let _ = normalize(&input).unwrap();
        assert_eq!(input, before);
    }
}
