//! Grouped views over a filtered sales subset.
//!
//! Every function is pure and returns an empty structure (or zeroed scalars)
//! for an empty subset.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{Duration, NaiveDate};
use dashboard_core::models::{SalesRecord, SalesTable};
use dashboard_core::time_utils::{month_from_index, month_index, month_start, week_start};
use serde::{Deserialize, Serialize};

// ── View types ────────────────────────────────────────────────────────────────

/// Headline figures for the filtered subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_revenue: f64,
    /// Distinct order identifiers.
    pub order_count: usize,
    pub unique_clients: usize,
    /// `total_revenue / order_count`, or `0` without orders.
    pub avg_order_value: f64,
}

/// Revenue summed over one period, labelled by the period's first day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub period_start: NaiveDate,
    pub revenue: f64,
}

/// Distinct order count over one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCountPoint {
    pub period_start: NaiveDate,
    pub orders: usize,
}

/// A label and its summed revenue, as used by rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRevenue {
    pub label: String,
    pub revenue: f64,
}

/// Grouping dimension for [`SalesAggregator::top_n`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Product,
    Country,
}

impl Dimension {
    fn key(self, record: &SalesRecord) -> &str {
        match self {
            Dimension::Product => &record.product,
            Dimension::Country => &record.country,
        }
    }
}

/// One step of the Pareto curve. `rank` is 0-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoPoint {
    pub rank: usize,
    pub client: String,
    pub revenue: f64,
    pub cumulative_fraction: f64,
}

/// Active clients per acquisition month and month offset.
///
/// `cohorts` (month starts) and `offsets` are ascending; `counts[i][j]` is
/// the cell for `cohorts[i]` and `offsets[j]`. Offsets only include values
/// observed in at least one cohort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortMatrix {
    pub cohorts: Vec<NaiveDate>,
    pub offsets: Vec<u32>,
    pub counts: Vec<Vec<usize>>,
}

impl CohortMatrix {
    /// Active client count for the cohort starting `cohort` at `offset`
    /// months after acquisition. Absent cells read as `0`.
    pub fn get(&self, cohort: NaiveDate, offset: u32) -> usize {
        let Some(i) = self.cohorts.iter().position(|c| *c == month_start(cohort)) else {
            return 0;
        };
        let Some(j) = self.offsets.iter().position(|o| *o == offset) else {
            return 0;
        };
        self.counts[i][j]
    }

    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }
}

// ── SalesAggregator ───────────────────────────────────────────────────────────

/// Stateless helper computing the dashboard views.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Total revenue, distinct orders, distinct clients and average basket.
    pub fn kpi_summary(subset: &SalesTable) -> KpiSummary {
        let records = subset.records();
        let total_revenue: f64 = records.iter().map(SalesRecord::revenue).sum();
        let order_count = records
            .iter()
            .map(|r| r.order_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        let unique_clients = records
            .iter()
            .map(|r| r.client.as_str())
            .collect::<HashSet<_>>()
            .len();
        let avg_order_value = if order_count > 0 {
            total_revenue / order_count as f64
        } else {
            0.0
        };

        KpiSummary {
            total_revenue,
            order_count,
            unique_clients,
            avg_order_value,
        }
    }

    /// Revenue per calendar week (Monday start), ascending. Weeks without
    /// sales between the first and last active week appear with `0`.
    pub fn weekly_trend(subset: &SalesTable) -> Vec<RevenuePoint> {
        let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for r in subset.records() {
            *sums.entry(week_start(r.date)).or_insert(0.0) += r.revenue();
        }
        fill_weeks(&sums)
            .into_iter()
            .map(|(period_start, revenue)| RevenuePoint {
                period_start,
                revenue,
            })
            .collect()
    }

    /// Distinct orders per calendar week, with the same gap filling as
    /// [`SalesAggregator::weekly_trend`].
    pub fn weekly_order_counts(subset: &SalesTable) -> Vec<OrderCountPoint> {
        let mut orders: BTreeMap<NaiveDate, HashSet<&str>> = BTreeMap::new();
        for r in subset.records() {
            orders
                .entry(week_start(r.date))
                .or_default()
                .insert(r.order_id.as_str());
        }
        let counts: BTreeMap<NaiveDate, usize> =
            orders.into_iter().map(|(week, ids)| (week, ids.len())).collect();
        fill_weeks(&counts)
            .into_iter()
            .map(|(period_start, orders)| OrderCountPoint {
                period_start,
                orders,
            })
            .collect()
    }

    /// The `n` largest groups of `dimension` by revenue, descending. Equal
    /// revenues are ordered by label.
    pub fn top_n(subset: &SalesTable, dimension: Dimension, n: usize) -> Vec<RankedRevenue> {
        let mut ranked = revenue_by(subset, |r| dimension.key(r));
        sort_descending(&mut ranked);
        ranked.truncate(n);
        ranked
    }

    /// Revenue per category, descending.
    pub fn category_split(subset: &SalesTable) -> Vec<RankedRevenue> {
        let mut ranked = revenue_by(subset, |r| r.category.as_str());
        sort_descending(&mut ranked);
        ranked
    }

    /// Cohort pivot: for each acquisition month (month of the client's first
    /// record in `subset`), the number of distinct active clients per month
    /// offset.
    pub fn cohort_pivot(subset: &SalesTable) -> CohortMatrix {
        let records = subset.records();

        let mut acquisition: HashMap<&str, i32> = HashMap::new();
        for r in records {
            let idx = month_index(r.date);
            acquisition
                .entry(r.client.as_str())
                .and_modify(|first| *first = (*first).min(idx))
                .or_insert(idx);
        }

        let mut active: BTreeMap<(i32, u32), HashSet<&str>> = BTreeMap::new();
        for r in records {
            let cohort = acquisition[r.client.as_str()];
            let offset = (month_index(r.date) - cohort) as u32;
            active
                .entry((cohort, offset))
                .or_default()
                .insert(r.client.as_str());
        }

        let cohort_indices: BTreeSet<i32> = active.keys().map(|(c, _)| *c).collect();
        let offsets: Vec<u32> = active
            .keys()
            .map(|(_, o)| *o)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let counts = cohort_indices
            .iter()
            .map(|c| {
                offsets
                    .iter()
                    .map(|o| active.get(&(*c, *o)).map_or(0, HashSet::len))
                    .collect()
            })
            .collect();
        let cohorts = cohort_indices
            .iter()
            .filter_map(|c| month_from_index(*c))
            .collect();

        CohortMatrix {
            cohorts,
            offsets,
            counts,
        }
    }

    /// Clients ranked by descending revenue with the cumulative share of total
    /// revenue. Empty when total revenue is zero or not finite.
    pub fn pareto_curve(subset: &SalesTable) -> Vec<ParetoPoint> {
        let mut clients = revenue_by(subset, |r| r.client.as_str());
        let total: f64 = clients.iter().map(|c| c.revenue).sum();
        if total == 0.0 || !total.is_finite() {
            return Vec::new();
        }
        sort_descending(&mut clients);

        let mut cumulative = 0.0;
        clients
            .into_iter()
            .enumerate()
            .map(|(rank, c)| {
                cumulative += c.revenue;
                ParetoPoint {
                    rank,
                    client: c.label,
                    revenue: c.revenue,
                    cumulative_fraction: cumulative / total,
                }
            })
            .collect()
    }

    /// Revenue per calendar month present in `subset`, ascending.
    pub fn monthly_seasonality(subset: &SalesTable) -> Vec<RevenuePoint> {
        let mut sums: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for r in subset.records() {
            *sums.entry(month_start(r.date)).or_insert(0.0) += r.revenue();
        }
        sums.into_iter()
            .map(|(period_start, revenue)| RevenuePoint {
                period_start,
                revenue,
            })
            .collect()
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Sum revenue per key, in ascending key order.
fn revenue_by<'a>(
    subset: &'a SalesTable,
    key_fn: impl Fn(&'a SalesRecord) -> &'a str,
) -> Vec<RankedRevenue> {
    let mut groups: BTreeMap<&str, f64> = BTreeMap::new();
    for r in subset.records() {
        *groups.entry(key_fn(r)).or_insert(0.0) += r.revenue();
    }
    groups
        .into_iter()
        .map(|(label, revenue)| RankedRevenue {
            label: label.to_string(),
            revenue,
        })
        .collect()
}

/// Stable descending sort by revenue.
fn sort_descending(groups: &mut [RankedRevenue]) {
    groups.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
}

/// Expand sparse weekly values to every week between the first and last key.
fn fill_weeks<T: Copy + Default>(values: &BTreeMap<NaiveDate, T>) -> Vec<(NaiveDate, T)> {
    let (Some(first), Some(last)) = (values.keys().next(), values.keys().next_back()) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut week = *first;
    while week <= *last {
        out.push((week, values.get(&week).copied().unwrap_or_default()));
        week += Duration::days(7);
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[allow(clippy::too_many_arguments)]
    fn rec(
        d: NaiveDate,
        order: &str,
        client: &str,
        country: &str,
        product: &str,
        category: &str,
        qty: f64,
        price: f64,
    ) -> SalesRecord {
        SalesRecord::new(d, order, client, country, product, category, qty, price)
    }

    fn two_orders() -> SalesTable {
        SalesTable::new(vec![
            rec(date(2024, 1, 1), "O1", "A", "FR", "Keyboard", "Periph", 2.0, 10.0),
            rec(date(2024, 1, 8), "O2", "A", "FR", "Keyboard", "Periph", 1.0, 10.0),
        ])
    }

    fn shop() -> SalesTable {
        SalesTable::new(vec![
            rec(date(2024, 1, 2), "O1", "A", "France", "Mouse", "Periph", 2.0, 10.0),
            rec(date(2024, 1, 2), "O1", "A", "France", "Webcam", "Video", 1.0, 50.0),
            rec(date(2024, 1, 20), "O2", "B", "Spain", "Headset", "Audio", 1.0, 80.0),
            rec(date(2024, 2, 5), "O3", "A", "France", "Mouse", "Periph", 1.0, 10.0),
            rec(date(2024, 2, 9), "O4", "C", "Italy", "Webcam", "Video", 1.0, 50.0),
            rec(date(2024, 3, 14), "O5", "B", "Spain", "Mouse", "Periph", 4.0, 10.0),
        ])
    }

    // ── kpi_summary ──────────────────────────────────────────────────────────

    #[test]
    fn test_kpi_summary_two_orders() {
        let kpis = SalesAggregator::kpi_summary(&two_orders());
        assert_eq!(
            kpis,
            KpiSummary {
                total_revenue: 30.0,
                order_count: 2,
                unique_clients: 1,
                avg_order_value: 15.0,
            }
        );
    }

    #[test]
    fn test_kpi_summary_counts_distinct_orders() {
        let kpis = SalesAggregator::kpi_summary(&shop());
        assert_eq!(kpis.order_count, 5);
        assert_eq!(kpis.unique_clients, 3);
        assert!((kpis.total_revenue - 250.0).abs() < 1e-9);
        assert!((kpis.avg_order_value - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_kpi_summary_empty_is_zeroed() {
        assert_eq!(
            SalesAggregator::kpi_summary(&SalesTable::default()),
            KpiSummary::default()
        );
    }

    // ── weekly_trend / weekly_order_counts ───────────────────────────────────

    #[test]
    fn test_weekly_trend_groups_by_monday() {
        let trend = SalesAggregator::weekly_trend(&two_orders());
        assert_eq!(
            trend,
            vec![
                RevenuePoint {
                    period_start: date(2024, 1, 1),
                    revenue: 20.0
                },
                RevenuePoint {
                    period_start: date(2024, 1, 8),
                    revenue: 10.0
                },
            ]
        );
    }

    #[test]
    fn test_weekly_trend_fills_empty_weeks_with_zero() {
        let table = SalesTable::new(vec![
            rec(date(2024, 1, 3), "O1", "A", "FR", "P", "C", 1.0, 5.0),
            rec(date(2024, 1, 24), "O2", "A", "FR", "P", "C", 1.0, 7.0),
        ]);
        let trend = SalesAggregator::weekly_trend(&table);
        let weeks: Vec<NaiveDate> = trend.iter().map(|p| p.period_start).collect();
        assert_eq!(
            weeks,
            vec![
                date(2024, 1, 1),
                date(2024, 1, 8),
                date(2024, 1, 15),
                date(2024, 1, 22)
            ]
        );
        assert_eq!(trend[1].revenue, 0.0);
        assert_eq!(trend[3].revenue, 7.0);
    }

    #[test]
    fn test_weekly_order_counts_distinct_per_week() {
        let counts = SalesAggregator::weekly_order_counts(&shop());
        // 2024-01-02 falls in the week of 2024-01-01 with a single order O1
        // spread over two lines.
        assert_eq!(counts[0].period_start, date(2024, 1, 1));
        assert_eq!(counts[0].orders, 1);
        let total: usize = counts.iter().map(|c| c.orders).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_weekly_views_empty() {
        assert!(SalesAggregator::weekly_trend(&SalesTable::default()).is_empty());
        assert!(SalesAggregator::weekly_order_counts(&SalesTable::default()).is_empty());
    }

    // ── top_n / category_split ───────────────────────────────────────────────

    #[test]
    fn test_top_n_products_descending() {
        let top = SalesAggregator::top_n(&shop(), Dimension::Product, 2);
        let labels: Vec<&str> = top.iter().map(|t| t.label.as_str()).collect();
        // Webcam 100, Headset 80, Mouse 70.
        assert_eq!(labels, vec!["Webcam", "Headset"]);
        assert_eq!(top[0].revenue, 100.0);
    }

    #[test]
    fn test_top_n_ties_break_by_label() {
        let table = SalesTable::new(vec![
            rec(date(2024, 1, 1), "O1", "A", "FR", "Zeta", "C", 1.0, 10.0),
            rec(date(2024, 1, 1), "O2", "A", "FR", "Alpha", "C", 1.0, 10.0),
            rec(date(2024, 1, 1), "O3", "A", "FR", "Mid", "C", 1.0, 10.0),
        ]);
        let top = SalesAggregator::top_n(&table, Dimension::Product, 5);
        let labels: Vec<&str> = top.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn test_top_n_countries() {
        let top = SalesAggregator::top_n(&shop(), Dimension::Country, 10);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].label, "Spain");
        assert_eq!(top[0].revenue, 120.0);
    }

    #[test]
    fn test_category_split_sorted_descending() {
        let split = SalesAggregator::category_split(&shop());
        let labels: Vec<&str> = split.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Video", "Audio", "Periph"]);
        let total: f64 = split.iter().map(|s| s.revenue).sum();
        assert!((total - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_rankings_empty() {
        assert!(SalesAggregator::top_n(&SalesTable::default(), Dimension::Product, 10).is_empty());
        assert!(SalesAggregator::category_split(&SalesTable::default()).is_empty());
    }

    // ── cohort_pivot ─────────────────────────────────────────────────────────

    #[test]
    fn test_cohort_pivot_counts_active_clients() {
        let pivot = SalesAggregator::cohort_pivot(&shop());
        // A and B acquired in January, C in February.
        assert_eq!(pivot.cohorts, vec![date(2024, 1, 1), date(2024, 2, 1)]);
        assert_eq!(pivot.offsets, vec![0, 1, 2]);
        assert_eq!(pivot.get(date(2024, 1, 1), 0), 2);
        assert_eq!(pivot.get(date(2024, 1, 1), 1), 1); // A in February
        assert_eq!(pivot.get(date(2024, 1, 1), 2), 1); // B in March
        assert_eq!(pivot.get(date(2024, 2, 1), 0), 1);
        assert_eq!(pivot.get(date(2024, 2, 1), 1), 0);
        assert_eq!(pivot.counts[1], vec![1, 0, 0]);
    }

    #[test]
    fn test_cohort_acquisition_uses_filtered_subset() {
        // Client A first bought in January, but only March data is visible.
        let table = SalesTable::new(vec![rec(
            date(2024, 3, 3),
            "O9",
            "A",
            "FR",
            "P",
            "C",
            1.0,
            1.0,
        )]);
        let pivot = SalesAggregator::cohort_pivot(&table);
        assert_eq!(pivot.cohorts, vec![date(2024, 3, 1)]);
        assert_eq!(pivot.offsets, vec![0]);
    }

    #[test]
    fn test_cohort_pivot_missing_cohort_reads_zero() {
        let pivot = SalesAggregator::cohort_pivot(&shop());
        assert_eq!(pivot.get(date(2023, 12, 1), 0), 0);
        assert_eq!(pivot.get(date(2024, 1, 1), 7), 0);
    }

    #[test]
    fn test_cohort_pivot_empty() {
        assert!(SalesAggregator::cohort_pivot(&SalesTable::default()).is_empty());
    }

    // ── pareto_curve ─────────────────────────────────────────────────────────

    #[test]
    fn test_pareto_curve_cumulative_share() {
        let curve = SalesAggregator::pareto_curve(&shop());
        // B 120, A 80, C 50 of 250.
        let clients: Vec<&str> = curve.iter().map(|p| p.client.as_str()).collect();
        assert_eq!(clients, vec!["B", "A", "C"]);
        assert_eq!(curve[0].rank, 0);
        assert!((curve[0].cumulative_fraction - 0.48).abs() < 1e-9);
        assert!((curve[1].cumulative_fraction - 0.80).abs() < 1e-9);
        assert!((curve[2].cumulative_fraction - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pareto_curve_zero_revenue_is_empty() {
        let table = SalesTable::new(vec![rec(
            date(2024, 1, 1),
            "O1",
            "A",
            "FR",
            "P",
            "C",
            0.0,
            10.0,
        )]);
        assert!(SalesAggregator::pareto_curve(&table).is_empty());
        assert!(SalesAggregator::pareto_curve(&SalesTable::default()).is_empty());
    }

    #[test]
    fn test_pareto_curve_ties_ranked_by_client() {
        let table = SalesTable::new(vec![
            rec(date(2024, 1, 1), "O1", "Zoe", "FR", "P", "C", 1.0, 30.0),
            rec(date(2024, 1, 2), "O2", "Max", "FR", "P", "C", 1.0, 50.0),
            rec(date(2024, 1, 3), "O3", "Ana", "FR", "P", "C", 1.0, 30.0),
        ]);
        let curve = SalesAggregator::pareto_curve(&table);
        let clients: Vec<&str> = curve.iter().map(|p| p.client.as_str()).collect();
        assert_eq!(clients, vec!["Max", "Ana", "Zoe"]);
        assert!((curve[1].cumulative_fraction - 80.0 / 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_pareto_curve_overflowing_total_is_empty() {
        let table = SalesTable::new(vec![
            rec(date(2024, 1, 1), "O1", "A", "FR", "P", "C", 1e308, 10.0),
            rec(date(2024, 1, 2), "O2", "B", "FR", "P", "C", 1.0, 10.0),
        ]);
        assert!(SalesAggregator::pareto_curve(&table).is_empty());
    }

    // ── monthly_seasonality ──────────────────────────────────────────────────

    #[test]
    fn test_monthly_seasonality_only_present_months() {
        let table = SalesTable::new(vec![
            rec(date(2024, 3, 30), "O1", "A", "FR", "P", "C", 1.0, 5.0),
            rec(date(2024, 1, 2), "O2", "A", "FR", "P", "C", 1.0, 7.0),
            rec(date(2024, 1, 31), "O3", "A", "FR", "P", "C", 1.0, 3.0),
        ]);
        let months = SalesAggregator::monthly_seasonality(&table);
        assert_eq!(
            months,
            vec![
                RevenuePoint {
                    period_start: date(2024, 1, 1),
                    revenue: 10.0
                },
                RevenuePoint {
                    period_start: date(2024, 3, 1),
                    revenue: 5.0
                },
            ]
        );
    }

    // ── properties ───────────────────────────────────────────────────────────

    const PRODUCTS: [&str; 5] = ["Mouse", "Webcam", "Headset", "Dock", "SSD"];

    fn table_strategy() -> impl Strategy<Value = SalesTable> {
        proptest::collection::vec(
            (0i64..200, 0usize..12, 0usize..8, 0usize..5, 0u32..6, 0u32..300),
            0..80,
        )
        .prop_map(|rows| {
            let base = date(2024, 1, 1);
            SalesTable::new(
                rows.into_iter()
                    .map(|(offset, order, client, product, qty, price)| {
                        SalesRecord::new(
                            base + Duration::days(offset),
                            format!("O{order}"),
                            format!("Client {client}"),
                            "FR",
                            PRODUCTS[product],
                            "C",
                            f64::from(qty),
                            f64::from(price),
                        )
                    })
                    .collect(),
            )
        })
    }

    proptest! {
        #[test]
        fn kpi_average_times_orders_matches_total(table in table_strategy()) {
            let kpis = SalesAggregator::kpi_summary(&table);
            if kpis.order_count > 0 {
                let rebuilt = kpis.avg_order_value * kpis.order_count as f64;
                prop_assert!((rebuilt - kpis.total_revenue).abs() <= 1e-6 * kpis.total_revenue.max(1.0));
            } else {
                prop_assert_eq!(kpis.avg_order_value, 0.0);
            }
        }

        #[test]
        fn pareto_is_monotone_and_ends_at_one(table in table_strategy()) {
            let curve = SalesAggregator::pareto_curve(&table);
            let total = SalesAggregator::kpi_summary(&table).total_revenue;
            if total > 0.0 {
                for pair in curve.windows(2) {
                    prop_assert!(pair[1].cumulative_fraction >= pair[0].cumulative_fraction);
                }
                let last = curve.last().map(|p| p.cumulative_fraction).unwrap_or_default();
                prop_assert!((last - 1.0).abs() < 1e-9);
            } else {
                prop_assert!(curve.is_empty());
            }
        }

        #[test]
        fn top_n_is_bounded_sorted_and_known(table in table_strategy(), n in 1usize..8) {
            let top = SalesAggregator::top_n(&table, Dimension::Product, n);
            prop_assert!(top.len() <= n);
            for pair in top.windows(2) {
                prop_assert!(pair[0].revenue >= pair[1].revenue);
                if pair[0].revenue == pair[1].revenue {
                    prop_assert!(pair[0].label < pair[1].label);
                }
            }
            let present: HashSet<&str> =
                table.records().iter().map(|r| r.product.as_str()).collect();
            for entry in &top {
                prop_assert!(present.contains(entry.label.as_str()));
            }
        }

        #[test]
        fn weekly_trend_preserves_total(table in table_strategy()) {
            let total: f64 = SalesAggregator::weekly_trend(&table).iter().map(|p| p.revenue).sum();
            let expected = SalesAggregator::kpi_summary(&table).total_revenue;
            prop_assert!((total - expected).abs() <= 1e-6 * expected.max(1.0));
        }
    }
}
