//! Seeded synthetic sales data used when no file is supplied.

use chrono::{Duration, NaiveDate};
use dashboard_core::models::{RawCell, RawTable};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

const COUNTRIES: [(&str, f64); 6] = [
    ("France", 0.45),
    ("Belgium", 0.08),
    ("Switzerland", 0.08),
    ("Spain", 0.15),
    ("Germany", 0.14),
    ("Italy", 0.10),
];

const PRODUCTS: [(&str, &str); 8] = [
    ("Keyboard", "Peripherals"),
    ("Mouse", "Peripherals"),
    ("Headset", "Audio"),
    ("Monitor 24\"", "Monitors"),
    ("Monitor 27\"", "Monitors"),
    ("USB-C Dock", "Accessories"),
    ("Webcam", "Video"),
    ("SSD 1TB", "Storage"),
];

const UNIT_PRICES: [f64; 8] = [19.9, 29.9, 49.0, 79.0, 149.0, 199.0, 249.0, 299.0];

const CLIENT_COUNT: u32 = 259;
const FIRST_ORDER_ID: usize = 100_000;

const COLUMNS: [&str; 8] = [
    "date",
    "order_id",
    "client",
    "country",
    "product",
    "category",
    "quantity",
    "unit_price",
];

/// Shape of the generated dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    pub seed: u64,
    pub rows: usize,
    pub start: NaiveDate,
    pub span_days: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            rows: 6000,
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN),
            span_days: 420,
        }
    }
}

impl DemoConfig {
    pub fn new(seed: u64, rows: usize) -> Self {
        Self {
            seed,
            rows,
            ..Self::default()
        }
    }
}

/// Generate the demo table. Identical configs yield identical tables.
///
/// The output carries raw cells only; it goes through the same normalize
/// and revenue steps as an uploaded file.
pub fn demo_raw_table(config: &DemoConfig) -> RawTable {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let span = config.span_days.max(1);

    let rows = (0..config.rows)
        .map(|i| {
            let date = config.start + Duration::days(i64::from(rng.random_range(0..span)));
            let client = rng.random_range(1..=CLIENT_COUNT);
            let country = weighted_country(&mut rng);
            let (product, category) = PRODUCTS[rng.random_range(0..PRODUCTS.len())];
            let quantity = rng.random_range(1..=5u32);
            let unit_price = UNIT_PRICES[rng.random_range(0..UNIT_PRICES.len())];

            vec![
                RawCell::Date(date),
                RawCell::Text(format!("C-{}", FIRST_ORDER_ID + i)),
                RawCell::Text(format!("Client {client:03}")),
                RawCell::Text(country.to_string()),
                RawCell::Text(product.to_string()),
                RawCell::Text(category.to_string()),
                RawCell::Number(f64::from(quantity)),
                RawCell::Number(unit_price),
            ]
        })
        .collect();

    debug!(
        "Generated {} demo rows (seed {})",
        config.rows, config.seed
    );
    RawTable::new(COLUMNS.iter().map(|c| c.to_string()).collect(), rows)
}

fn weighted_country(rng: &mut StdRng) -> &'static str {
    let roll: f64 = rng.random();
    let mut cumulative = 0.0;
    for (name, weight) in COUNTRIES {
        cumulative += weight;
        if roll < cumulative {
            return name;
        }
    }
    COUNTRIES[COUNTRIES.len() - 1].0
}

// ── Tests ─────────────────────────────────────────────────────────────────────
