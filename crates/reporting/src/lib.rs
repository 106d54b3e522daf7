//! Assembles the full analysis report from the typed record collections.
//!
//! This is a pure function over the normalized snapshot: every section is
//! recomputed from scratch for the given `as_of` date, and identical inputs
//! always produce an identical report.

use aggregation::{group_count, group_sum, group_sum_many, sum_by};
use chrono::NaiveDate;
use core_types::{OpeningBalanceRecord, PaymentRecord, SaleRecord};
use forecaster::DailyRevenue;
use normalizer::NormalizedData;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::info;

pub mod report;

pub use report::{
    AnalysisReport, CustomerLoyalty, KpiSummary, LegacyAgingRow, PaymentMethodTotal,
    ProductPerformance, RepPerformance, StreetRevenue,
};

/// The author-entered aging categories of the opening-balance sheet, in the
/// fixed order the legacy summary presents them.
const LEGACY_AGING_CATEGORIES: [&str; 9] = [
    "-30 Hari", "-25 Hari", "-15 Hari", "0 Hari", "5 Hari", "7 Hari", "30 Hari", "32 Hari",
    "45 Hari",
];

/// Builds the complete report for one batch as of the given date.
pub fn build_report(data: &NormalizedData, as_of: NaiveDate, top_n: usize) -> AnalysisReport {
    info!(sales = data.sales.len(), %as_of, "building analysis report");

    let kpis = kpi_summary(&data.sales, &data.payments, &data.opening_balances);

    let daily_actuals = daily_revenue(&data.sales);
    let forecast = forecaster::fit_daily_trend(&daily_actuals);

    let segments = segmenter::segment_revenue(&data.sales);
    let recommendation = segmenter::recommendation(&segments, kpis.total_revenue);
    let top_streets = segmenter::street_revenue(&data.sales, top_n)
        .into_iter()
        .map(|(street, revenue)| StreetRevenue { street, revenue })
        .collect();

    let team = incentives::evaluate(&data.sales, &data.targets);
    let aging = aging::build(&data.sales, &data.opening_balances, &data.payments, as_of);

    AnalysisReport {
        as_of,
        kpis,
        daily_actuals,
        forecast,
        segments,
        recommendation,
        top_streets,
        team,
        aging,
        rep_performance: rep_performance(&data.sales),
        top_products: top_products(&data.sales, top_n),
        payment_methods: payment_methods(&data.payments),
        legacy_opening_aging: legacy_opening_aging(&data.opening_balances),
        loyalty: customer_loyalty(&data.sales, as_of),
    }
}

fn kpi_summary(
    sales: &[SaleRecord],
    payments: &[PaymentRecord],
    opening_balances: &[OpeningBalanceRecord],
) -> KpiSummary {
    let total_revenue = sum_by(sales, |s| s.net);
    let transaction_count = sales.len();
    let average_order_value = if transaction_count == 0 {
        Decimal::ZERO
    } else {
        total_revenue / Decimal::from(transaction_count as u64)
    };

    KpiSummary {
        total_revenue,
        transaction_count,
        average_order_value,
        total_payments_received: sum_by(payments, |p| p.amount),
        opening_receivable_total: sum_by(opening_balances, |ob| ob.outstanding),
    }
}

/// Net revenue per calendar day, ascending by date.
fn daily_revenue(sales: &[SaleRecord]) -> Vec<DailyRevenue> {
    let mut daily: Vec<DailyRevenue> = group_sum(sales, |s| s.date, |s| s.net)
        .into_iter()
        .map(|(date, net)| DailyRevenue { date, net })
        .collect();
    daily.sort_by_key(|d| d.date);
    daily
}

/// Per-rep volume, revenue descending.
fn rep_performance(sales: &[SaleRecord]) -> Vec<RepPerformance> {
    let mut rows: Vec<RepPerformance> =
        group_sum_many(sales, |s| s.rep.clone(), |s| [s.net, Decimal::from(s.quantity)])
            .into_iter()
            .map(|(rep, [net, quantity])| RepPerformance { rep, net, quantity })
            .collect();
    rows.sort_by(|a, b| b.net.cmp(&a.net));
    rows
}

/// The `top_n` products by gross revenue, descending.
fn top_products(sales: &[SaleRecord], top_n: usize) -> Vec<ProductPerformance> {
    let mut rows: Vec<ProductPerformance> =
        group_sum_many(sales, |s| s.product.clone(), |s| [Decimal::from(s.quantity), s.gross])
            .into_iter()
            .map(|(product, [quantity, gross])| ProductPerformance { product, quantity, gross })
            .collect();
    rows.sort_by(|a, b| b.gross.cmp(&a.gross));
    rows.truncate(top_n);
    rows
}

fn payment_methods(payments: &[PaymentRecord]) -> Vec<PaymentMethodTotal> {
    group_sum(payments, |p| p.method, |p| p.amount)
        .into_iter()
        .map(|(method, total)| PaymentMethodTotal { method, total })
        .collect()
}

/// Opening balances by author-entered category, fixed order, zero-filled.
/// This is the legacy view; the aging engine's computed buckets live in
/// [`AnalysisReport::aging`] and the two are deliberately not reconciled.
fn legacy_opening_aging(opening_balances: &[OpeningBalanceRecord]) -> Vec<LegacyAgingRow> {
    let sums: HashMap<String, Decimal> =
        group_sum(opening_balances, |ob| ob.aging_category.clone(), |ob| ob.outstanding)
            .into_iter()
            .collect();

    LEGACY_AGING_CATEGORIES
        .iter()
        .map(|category| LegacyAgingRow {
            category: category.to_string(),
            outstanding: sums.get(*category).copied().unwrap_or(Decimal::ZERO),
        })
        .collect()
}

/// Per-customer frequency, value and recency, ascending by customer name.
fn customer_loyalty(sales: &[SaleRecord], as_of: NaiveDate) -> Vec<CustomerLoyalty> {
    let orders: HashMap<String, usize> =
        group_count(sales, |s| s.customer.clone()).into_iter().collect();

    let mut last_order: HashMap<&str, NaiveDate> = HashMap::new();
    for sale in sales {
        last_order
            .entry(&sale.customer)
            .and_modify(|d| *d = (*d).max(sale.date))
            .or_insert(sale.date);
    }

    let mut rows: Vec<CustomerLoyalty> = group_sum(sales, |s| s.customer.clone(), |s| s.net)
        .into_iter()
        .map(|(customer, net)| {
            let days_since_last_order = last_order
                .get(customer.as_str())
                .map(|last| as_of.signed_duration_since(*last).num_days())
                .unwrap_or(0);
            CustomerLoyalty {
                orders: orders.get(&customer).copied().unwrap_or(0),
                customer,
                net,
                days_since_last_order,
            }
        })
        .collect();
    rows.sort_by(|a, b| a.customer.cmp(&b.customer));
    rows
}
