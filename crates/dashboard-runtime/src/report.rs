//! Every dashboard view computed over one filtered subset.

use dashboard_core::models::SalesTable;
use dashboard_data::aggregator::{
    CohortMatrix, Dimension, KpiSummary, OrderCountPoint, ParetoPoint, RankedRevenue,
    RevenuePoint, SalesAggregator,
};
use dashboard_data::filter::FilterSpec;
use serde::Serialize;

/// The data contract between the session and the presentation layer.
///
/// All views derive from `subset`, which is the same table handed to the
/// exporters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub filters: FilterSpec,
    pub top_n: usize,
    pub subset: SalesTable,
    pub kpis: KpiSummary,
    pub weekly_trend: Vec<RevenuePoint>,
    pub top_products: Vec<RankedRevenue>,
    pub top_countries: Vec<RankedRevenue>,
    pub category_split: Vec<RankedRevenue>,
    pub weekly_orders: Vec<OrderCountPoint>,
    pub cohorts: CohortMatrix,
    pub pareto: Vec<ParetoPoint>,
    pub seasonality: Vec<RevenuePoint>,
}

impl DashboardReport {
    pub fn build(filters: FilterSpec, subset: SalesTable, top_n: usize) -> Self {
        Self {
            kpis: SalesAggregator::kpi_summary(&subset),
            weekly_trend: SalesAggregator::weekly_trend(&subset),
            top_products: SalesAggregator::top_n(&subset, Dimension::Product, top_n),
            top_countries: SalesAggregator::top_n(&subset, Dimension::Country, top_n),
            category_split: SalesAggregator::category_split(&subset),
            weekly_orders: SalesAggregator::weekly_order_counts(&subset),
            cohorts: SalesAggregator::cohort_pivot(&subset),
            pareto: SalesAggregator::pareto_curve(&subset),
            seasonality: SalesAggregator::monthly_seasonality(&subset),
            filters,
            top_n,
            subset,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
