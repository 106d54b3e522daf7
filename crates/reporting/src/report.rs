use aging::AgingReport;
use chrono::NaiveDate;
use core_types::PaymentMethod;
use forecaster::{DailyRevenue, Forecast};
use incentives::SalesKpi;
use rust_decimal::Decimal;
use segmenter::SegmentRevenue;
use serde::{Deserialize, Serialize};

/// The dashboard's headline scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_revenue: Decimal,
    pub transaction_count: usize,
    /// total_revenue / transaction_count, 0 for an empty period.
    pub average_order_value: Decimal,
    pub total_payments_received: Decimal,
    pub opening_receivable_total: Decimal,
}

/// Net revenue attributed to one street.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetRevenue {
    pub street: String,
    pub revenue: Decimal,
}

/// One rep's sales volume, independent of targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepPerformance {
    pub rep: String,
    pub net: Decimal,
    pub quantity: Decimal,
}

/// One product's sales volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPerformance {
    pub product: String,
    pub quantity: Decimal,
    pub gross: Decimal,
}

/// Total collected per payment method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodTotal {
    pub method: PaymentMethod,
    pub total: Decimal,
}

/// Opening receivables summed by their author-entered aging category.
/// Categories appear in the fixed legacy order, zero-filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyAgingRow {
    pub category: String,
    pub outstanding: Decimal,
}

/// One customer's purchase behaviour over the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerLoyalty {
    pub customer: String,
    pub orders: usize,
    pub net: Decimal,
    pub days_since_last_order: i64,
}

/// The complete output of one reporting run: plain data, no dependency on
/// any presentation object. This is the in-process boundary handed to the
/// external report renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub as_of: NaiveDate,
    pub kpis: KpiSummary,
    /// Actual daily revenue, ascending by date.
    pub daily_actuals: Vec<DailyRevenue>,
    /// Trend label, fit and the 30-day extrapolation.
    pub forecast: Forecast,
    /// Per-segment revenue, descending.
    pub segments: Vec<SegmentRevenue>,
    pub recommendation: String,
    /// Streets with the highest revenue, descending.
    pub top_streets: Vec<StreetRevenue>,
    /// Per-rep target/achievement/bonus table, in target-sheet order.
    pub team: Vec<SalesKpi>,
    pub aging: AgingReport,
    /// Per-rep volume, revenue descending.
    pub rep_performance: Vec<RepPerformance>,
    /// Best-selling products by gross revenue, descending.
    pub top_products: Vec<ProductPerformance>,
    pub payment_methods: Vec<PaymentMethodTotal>,
    pub legacy_opening_aging: Vec<LegacyAgingRow>,
    /// Per-customer frequency/value/recency, ascending by customer name.
    pub loyalty: Vec<CustomerLoyalty>,
}
