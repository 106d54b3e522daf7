//! Accounts-receivable aging.
//!
//! Builds one unified open-items ledger from the opening balances and the
//! period's invoices, nets all payments per invoice, drops immaterial
//! remainders and classifies what is left into age buckets.

use aggregation::group_sum;
use chrono::NaiveDate;
use core_types::{AgeBucket, OpeningBalanceRecord, PaymentRecord, SaleRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Remaining balances at or below this many currency units are immaterial
/// and excluded from the ledger entirely.
pub const MATERIALITY_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

/// How many open items the ranked table keeps.
pub const TOP_ITEMS: usize = 10;

/// One open receivable line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArLine {
    pub invoice_id: String,
    pub date: NaiveDate,
    pub customer: String,
    pub rep: String,
    /// Originally billed amount (opening outstanding or invoice net).
    pub billed: Decimal,
    /// Sum of all payments recorded against the invoice id.
    pub paid: Decimal,
    /// billed - paid; always above the materiality threshold.
    pub remaining: Decimal,
    /// Whole days between invoice date and the evaluation date. Negative
    /// for future-dated invoices.
    pub age_days: i64,
    pub bucket: AgeBucket,
}

/// One row of the per-rep aging pivot, amounts in fixed bucket order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgingPivotRow {
    pub rep: String,
    pub buckets: [Decimal; 4],
    pub total: Decimal,
}

/// The aging engine's full output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgingReport {
    /// Per-rep pivot, reps in ascending name order.
    pub pivot: Vec<AgingPivotRow>,
    /// Grand total per bucket across all reps, fixed bucket order.
    pub bucket_totals: [Decimal; 4],
    /// The open items with the largest remaining balance, descending;
    /// equal balances keep original ledger order.
    pub top_open_items: Vec<ArLine>,
    /// The complete open-items ledger, in billing-source order.
    pub open_items: Vec<ArLine>,
}

impl AgingReport {
    /// Sum of all open balances.
    pub fn total_outstanding(&self) -> Decimal {
        self.bucket_totals.iter().copied().sum()
    }
}

/// Builds the aging report as of `as_of`.
///
/// The ledger unions opening-balance lines (first) with the period's
/// invoices (second), matching payments by invoice id across the whole
/// payments table. Sales lines are billed at their net amount.
pub fn build(
    sales: &[SaleRecord],
    opening_balances: &[OpeningBalanceRecord],
    payments: &[PaymentRecord],
    as_of: NaiveDate,
) -> AgingReport {
    let paid_per_invoice: HashMap<String, Decimal> =
        group_sum(payments, |p| p.invoice_id.clone(), |p| p.amount).into_iter().collect();

    let billed = opening_balances
        .iter()
        .map(|ob| (ob.invoice_id.clone(), ob.invoice_date, ob.customer.clone(), ob.rep.clone(), ob.outstanding))
        .chain(sales.iter().map(|s| {
            (s.invoice_id.clone(), s.date, s.customer.clone(), s.rep.clone(), s.net)
        }));

    let mut open_items = Vec::new();
    for (invoice_id, date, customer, rep, billed_amount) in billed {
        let paid = paid_per_invoice.get(&invoice_id).copied().unwrap_or(Decimal::ZERO);
        let remaining = billed_amount - paid;
        if remaining <= MATERIALITY_THRESHOLD {
            continue;
        }
        let age_days = as_of.signed_duration_since(date).num_days();
        open_items.push(ArLine {
            invoice_id,
            date,
            customer,
            rep,
            billed: billed_amount,
            paid,
            remaining,
            age_days,
            bucket: AgeBucket::for_age(age_days),
        });
    }

    debug!(open_items = open_items.len(), %as_of, "built open-items ledger");

    let pivot = build_pivot(&open_items);

    let mut bucket_totals = [Decimal::ZERO; 4];
    for line in &open_items {
        bucket_totals[line.bucket.index()] += line.remaining;
    }

    // Stable sort: ties keep original ledger order.
    let mut top_open_items = open_items.clone();
    top_open_items.sort_by(|a, b| b.remaining.cmp(&a.remaining));
    top_open_items.truncate(TOP_ITEMS);

    AgingReport { pivot, bucket_totals, top_open_items, open_items }
}

/// Per-rep bucket sums with a row total, reps sorted ascending by name.
fn build_pivot(open_items: &[ArLine]) -> Vec<AgingPivotRow> {
    let mut rows: Vec<AgingPivotRow> = Vec::new();
    for line in open_items {
        let slot = match rows.iter().position(|r| r.rep == line.rep) {
            Some(slot) => slot,
            None => {
                rows.push(AgingPivotRow {
                    rep: line.rep.clone(),
                    buckets: [Decimal::ZERO; 4],
                    total: Decimal::ZERO,
                });
                rows.len() - 1
            }
        };
        rows[slot].buckets[line.bucket.index()] += line.remaining;
        rows[slot].total += line.remaining;
    }
    rows.sort_by(|a, b| a.rep.cmp(&b.rep));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn opening(invoice: &str, inv_date: NaiveDate, rep: &str, outstanding: Decimal) -> OpeningBalanceRecord {
        OpeningBalanceRecord {
            invoice_date: inv_date,
            invoice_id: invoice.to_string(),
            customer: "Toko Makmur".to_string(),
            rep: rep.to_string(),
            outstanding,
            aging_category: "30 Hari".to_string(),
        }
    }

    fn sale(invoice: &str, inv_date: NaiveDate, rep: &str, net: Decimal) -> SaleRecord {
        SaleRecord {
            date: inv_date,
            customer: "Warung Sederhana".to_string(),
            address: "Jl. Mataram No. 5, Semarang".to_string(),
            rep: rep.to_string(),
            invoice_id: invoice.to_string(),
            payment_terms: "30 Hari".to_string(),
            product: "BSM 450 ml".to_string(),
            quantity: 1,
            unit_price: net,
            gross: net,
            discount: Decimal::ZERO,
            return_amount: Decimal::ZERO,
            net,
        }
    }

    fn payment(invoice: &str, amount: Decimal) -> PaymentRecord {
        PaymentRecord {
            date: date(2025, 7, 20),
            customer: "Toko Makmur".to_string(),
            rep: "Andi".to_string(),
            invoice_id: invoice.to_string(),
            amount,
            method: core_types::PaymentMethod::Transfer,
        }
    }

    #[test]
    fn forty_day_old_unpaid_opening_balance_lands_in_32_to_60() {
        let as_of = date(2025, 7, 31);
        let report = build(
            &[],
            &[opening("OLD-1", date(2025, 6, 21), "Andi", dec!(500000))],
            &[],
            as_of,
        );
        assert_eq!(report.open_items.len(), 1);
        let line = &report.open_items[0];
        assert_eq!(line.remaining, dec!(500000));
        assert_eq!(line.age_days, 40);
        assert_eq!(line.bucket, AgeBucket::Days32To60);
    }

    #[test]
    fn partial_payments_net_across_the_whole_payments_table() {
        let as_of = date(2025, 7, 31);
        let report = build(
            &[sale("INV-1", date(2025, 7, 10), "Andi", dec!(300000))],
            &[],
            &[payment("INV-1", dec!(150000)), payment("INV-1", dec!(150000))],
            as_of,
        );
        // Fully paid: remaining 0, below materiality, excluded entirely.
        assert!(report.open_items.is_empty());
        assert_eq!(report.total_outstanding(), Decimal::ZERO);
    }

    #[test]
    fn immaterial_remainders_are_dropped_not_zeroed() {
        let as_of = date(2025, 7, 31);
        let report = build(
            &[sale("INV-1", date(2025, 7, 10), "Andi", dec!(150100))],
            &[],
            &[payment("INV-1", dec!(150000))],
            as_of,
        );
        // Remaining exactly 100 is at the threshold and still excluded.
        assert!(report.open_items.is_empty());

        let report = build(
            &[sale("INV-2", date(2025, 7, 10), "Andi", dec!(150101))],
            &[],
            &[payment("INV-2", dec!(150000))],
            as_of,
        );
        assert_eq!(report.open_items.len(), 1);
        assert_eq!(report.open_items[0].remaining, dec!(101));
    }

    #[test]
    fn future_dated_invoices_are_not_yet_due() {
        let as_of = date(2025, 7, 1);
        let report = build(
            &[sale("INV-1", date(2025, 7, 15), "Andi", dec!(200000))],
            &[],
            &[],
            as_of,
        );
        assert_eq!(report.open_items[0].age_days, -14);
        assert_eq!(report.open_items[0].bucket, AgeBucket::NotYetDue);
    }

    #[test]
    fn bucket_sums_add_up_to_ledger_total() {
        let as_of = date(2025, 7, 31);
        let report = build(
            &[
                sale("INV-1", date(2025, 7, 30), "Andi", dec!(100000)),
                sale("INV-2", date(2025, 7, 10), "Budi", dec!(200000)),
                sale("INV-3", date(2025, 6, 10), "Andi", dec!(300000)),
                sale("INV-4", date(2025, 4, 1), "Budi", dec!(400000)),
            ],
            &[opening("OLD-1", date(2025, 8, 5), "Andi", dec!(50000))],
            &[],
            as_of,
        );
        let ledger_total: Decimal = report.open_items.iter().map(|l| l.remaining).sum();
        assert_eq!(report.total_outstanding(), ledger_total);

        // Every line falls in exactly one bucket.
        let pivot_total: Decimal = report.pivot.iter().map(|r| r.total).sum();
        assert_eq!(pivot_total, ledger_total);
    }

    #[test]
    fn pivot_rows_are_sorted_by_rep_and_totalled() {
        let as_of = date(2025, 7, 31);
        let report = build(
            &[
                sale("INV-1", date(2025, 7, 10), "Budi", dec!(200000)),
                sale("INV-2", date(2025, 7, 10), "Andi", dec!(100000)),
                sale("INV-3", date(2025, 6, 1), "Budi", dec!(300000)),
            ],
            &[],
            &[],
            as_of,
        );
        let reps: Vec<&str> = report.pivot.iter().map(|r| r.rep.as_str()).collect();
        assert_eq!(reps, vec!["Andi", "Budi"]);
        let budi = &report.pivot[1];
        assert_eq!(budi.buckets[AgeBucket::Days1To31.index()], dec!(200000));
        assert_eq!(budi.buckets[AgeBucket::Days32To60.index()], dec!(300000));
        assert_eq!(budi.total, dec!(500000));
    }

    #[test]
    fn top_items_rank_descending_with_stable_ties() {
        let as_of = date(2025, 7, 31);
        let sales: Vec<SaleRecord> = (0..12)
            .map(|i| {
                let amount = if i == 5 { dec!(900000) } else { dec!(500000) };
                sale(&format!("INV-{i}"), date(2025, 7, 10), "Andi", amount)
            })
            .collect();
        let report = build(&sales, &[], &[], as_of);

        assert_eq!(report.top_open_items.len(), TOP_ITEMS);
        assert_eq!(report.top_open_items[0].invoice_id, "INV-5");
        // Ties keep input order after the largest item.
        assert_eq!(report.top_open_items[1].invoice_id, "INV-0");
        assert_eq!(report.top_open_items[2].invoice_id, "INV-1");
    }

    #[test]
    fn opening_lines_precede_sales_lines_in_the_ledger() {
        let as_of = date(2025, 7, 31);
        let report = build(
            &[sale("INV-NEW", date(2025, 7, 10), "Andi", dec!(200000))],
            &[opening("INV-OLD", date(2025, 5, 1), "Andi", dec!(100000))],
            &[],
            as_of,
        );
        assert_eq!(report.open_items[0].invoice_id, "INV-OLD");
        assert_eq!(report.open_items[1].invoice_id, "INV-NEW");
    }
}
