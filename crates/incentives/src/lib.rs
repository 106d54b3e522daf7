//! Target-vs-actual evaluation and tiered bonus payout per sales rep.
//!
//! The key universe comes from the Targets table, never from Sales: a rep
//! (or a (rep, product) pair) with a target but zero recorded sales still
//! appears in the output with realized 0. Actuals are looked up with a zero
//! default rather than joined, so absent combinations are never dropped.

use aggregation::group_sum;
use core_types::{BonusTier, SaleRecord, TargetRecord};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// The ordered bonus threshold table, evaluated top-down; first match wins.
const BONUS_TIERS: [(Decimal, BonusTier); 3] = [
    (dec!(1.00), BonusTier::Top),
    (dec!(0.85), BonusTier::Mid),
    (dec!(0.70), BonusTier::Base),
];

/// Looks up the bonus tier for an achievement ratio.
pub fn tier_for(achievement: Decimal) -> BonusTier {
    for (threshold, tier) in BONUS_TIERS {
        if achievement >= threshold {
            return tier;
        }
    }
    BonusTier::None
}

/// One sales rep's KPI row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesKpi {
    pub rep: String,
    /// Total target value across the rep's products.
    pub target_value: Decimal,
    /// Total realized net revenue.
    pub realized: Decimal,
    /// realized / target, 0 when the target is 0.
    pub achievement: Decimal,
    pub tier: BonusTier,
    /// tier rate applied to realized revenue.
    pub bonus: Decimal,
    /// Mean of discount / gross over the rep's sale lines, 0 for a rep
    /// without sales; a zero-gross line contributes a 0 ratio.
    pub avg_discount_ratio: Decimal,
}

/// Evaluates every rep present in Targets, in first-seen target order.
pub fn evaluate(sales: &[SaleRecord], targets: &[TargetRecord]) -> Vec<SalesKpi> {
    let target_per_rep = group_sum(targets, |t| t.rep.clone(), |t| t.target_value);

    let realized_per_rep: HashMap<String, Decimal> =
        group_sum(sales, |s| s.rep.clone(), |s| s.net).into_iter().collect();

    let discount_ratios: HashMap<String, Decimal> = average_discount_ratios(sales);

    target_per_rep
        .into_iter()
        .map(|(rep, target_value)| {
            let realized = realized_per_rep.get(&rep).copied().unwrap_or(Decimal::ZERO);
            let achievement = if target_value.is_zero() {
                Decimal::ZERO
            } else {
                realized / target_value
            };
            let tier = tier_for(achievement);
            let bonus = realized * tier.rate();
            let avg_discount_ratio =
                discount_ratios.get(&rep).copied().unwrap_or(Decimal::ZERO);

            debug!(rep = %rep, %achievement, tier = tier.label(), "evaluated sales rep");

            SalesKpi { rep, target_value, realized, achievement, tier, bonus, avg_discount_ratio }
        })
        .collect()
}

/// Mean per rep of the per-line discount ratio discount / gross.
fn average_discount_ratios(sales: &[SaleRecord]) -> HashMap<String, Decimal> {
    let mut sums: HashMap<String, (Decimal, u32)> = HashMap::new();
    for sale in sales {
        let ratio = if sale.gross.is_zero() {
            Decimal::ZERO
        } else {
            sale.discount / sale.gross
        };
        let entry = sums.entry(sale.rep.clone()).or_insert((Decimal::ZERO, 0));
        entry.0 += ratio;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(rep, (sum, count))| (rep, sum / Decimal::from(count)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sale(rep: &str, gross: Decimal, discount: Decimal) -> SaleRecord {
        let net = gross - discount;
        SaleRecord {
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            customer: "Toko Makmur".to_string(),
            address: "Jl. Pemuda No. 1, Semarang".to_string(),
            rep: rep.to_string(),
            invoice_id: "INV/SMG/2025/07/1001".to_string(),
            payment_terms: "30 Hari".to_string(),
            product: "BSM 450 ml".to_string(),
            quantity: 1,
            unit_price: gross,
            gross,
            discount,
            return_amount: Decimal::ZERO,
            net,
        }
    }

    fn target(rep: &str, product: &str, value: Decimal) -> TargetRecord {
        TargetRecord {
            rep: rep.to_string(),
            product: product.to_string(),
            target_quantity: 10,
            target_value: value,
        }
    }

    #[test]
    fn tier_thresholds_are_first_match_top_down() {
        assert_eq!(tier_for(dec!(1.20)), BonusTier::Top);
        assert_eq!(tier_for(dec!(1.00)), BonusTier::Top);
        assert_eq!(tier_for(dec!(0.99)), BonusTier::Mid);
        assert_eq!(tier_for(dec!(0.85)), BonusTier::Mid);
        assert_eq!(tier_for(dec!(0.70)), BonusTier::Base);
        assert_eq!(tier_for(dec!(0.69)), BonusTier::None);
        assert_eq!(tier_for(Decimal::ZERO), BonusTier::None);
    }

    #[test]
    fn tier_is_monotonic_in_achievement() {
        let rates: Vec<Decimal> =
            [dec!(1.00), dec!(0.85), dec!(0.70)].iter().map(|a| tier_for(*a).rate()).collect();
        assert!(rates[0] >= rates[1]);
        assert!(rates[1] >= rates[2]);
    }

    #[test]
    fn half_achievement_earns_no_bonus() {
        let sales = vec![sale("Andi", dec!(1000000), Decimal::ZERO)];
        let targets = vec![target("Andi", "Produk X", dec!(2000000))];

        let kpis = evaluate(&sales, &targets);
        assert_eq!(kpis.len(), 1);
        assert_eq!(kpis[0].achievement, dec!(0.5));
        assert_eq!(kpis[0].tier, BonusTier::None);
        assert_eq!(kpis[0].bonus, Decimal::ZERO);
    }

    #[test]
    fn target_value_sums_across_products() {
        let sales = vec![sale("Andi", dec!(900), Decimal::ZERO)];
        let targets = vec![
            target("Andi", "Produk X", dec!(600)),
            target("Andi", "Produk Y", dec!(400)),
        ];

        let kpis = evaluate(&sales, &targets);
        assert_eq!(kpis[0].target_value, dec!(1000));
        assert_eq!(kpis[0].achievement, dec!(0.9));
        assert_eq!(kpis[0].tier, BonusTier::Mid);
        assert_eq!(kpis[0].bonus, dec!(900) * dec!(0.015));
    }

    #[test]
    fn rep_without_sales_still_appears() {
        let targets = vec![target("Citra", "Produk X", dec!(500000))];
        let kpis = evaluate(&[], &targets);
        assert_eq!(kpis.len(), 1);
        assert_eq!(kpis[0].rep, "Citra");
        assert_eq!(kpis[0].realized, Decimal::ZERO);
        assert_eq!(kpis[0].achievement, Decimal::ZERO);
        assert_eq!(kpis[0].tier, BonusTier::None);
        assert_eq!(kpis[0].avg_discount_ratio, Decimal::ZERO);
    }

    #[test]
    fn zero_target_yields_zero_achievement_not_a_fault() {
        let sales = vec![sale("Andi", dec!(100), Decimal::ZERO)];
        let targets = vec![target("Andi", "Produk X", Decimal::ZERO)];
        let kpis = evaluate(&sales, &targets);
        assert_eq!(kpis[0].achievement, Decimal::ZERO);
        assert_eq!(kpis[0].tier, BonusTier::None);
    }

    #[test]
    fn discount_ratio_averages_over_lines_and_guards_zero_gross() {
        let sales = vec![
            sale("Andi", dec!(100), dec!(10)), // ratio 0.10
            sale("Andi", dec!(200), dec!(60)), // ratio 0.30
            sale("Andi", Decimal::ZERO, Decimal::ZERO), // ratio 0
        ];
        let targets = vec![target("Andi", "Produk X", dec!(1000))];
        let kpis = evaluate(&sales, &targets);
        // Mean of 0.10, 0.30, 0.
        let expected = (dec!(0.10) + dec!(0.30)) / dec!(3);
        assert_eq!(kpis[0].avg_discount_ratio, expected);
    }

    #[test]
    fn output_order_follows_first_seen_target_order() {
        let targets = vec![
            target("Budi", "Produk X", dec!(100)),
            target("Andi", "Produk X", dec!(100)),
            target("Budi", "Produk Y", dec!(100)),
        ];
        let kpis = evaluate(&[], &targets);
        let reps: Vec<&str> = kpis.iter().map(|k| k.rep.as_str()).collect();
        assert_eq!(reps, vec!["Budi", "Andi"]);
    }
}
