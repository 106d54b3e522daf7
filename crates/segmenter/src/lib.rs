//! Market segmentation of customers by trading-name keywords, plus the
//! street-level revenue breakdown derived from customer addresses.

use aggregation::group_sum;
use core_types::{SaleRecord, Segment};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The ordered classification rules. Evaluated top-down on the lowercased
/// customer name; the FIRST rule whose any keyword is contained in the name
/// wins, so "Warung Bakso Pak Budi" is Kuliner - Bakso, not Retail - Warung.
/// Matching is plain substring containment, not word-bounded.
const RULES: &[(&[&str], Segment)] = &[
    (&["bakso"], Segment::KulinerBakso),
    (&["sate"], Segment::KulinerSate),
    (&["soto"], Segment::KulinerSoto),
    (&["mie"], Segment::KulinerMie),
    (&["warung"], Segment::RetailWarung),
    (&["toko"], Segment::RetailToko),
    (&["ud", "cv", "agen"], Segment::WholesaleAgen),
    (&["catering", "rumah makan", "resto"], Segment::Horeka),
];

/// Classifies a customer name into its market segment.
pub fn classify(customer_name: &str) -> Segment {
    let name = customer_name.to_lowercase();
    for (keywords, segment) in RULES {
        if keywords.iter().any(|kw| name.contains(kw)) {
            return *segment;
        }
    }
    Segment::Lainnya
}

/// Extracts the street name from a customer address: the part before "No."
/// when present, otherwise the part before the first comma, trimmed.
/// A blank result becomes "Unknown".
pub fn extract_street(address: &str) -> String {
    let street = match address.split_once("No.") {
        Some((before, _)) => before.trim(),
        None => address.split(',').next().unwrap_or("").trim(),
    };
    if street.is_empty() {
        "Unknown".to_string()
    } else {
        street.to_string()
    }
}

/// Net revenue attributed to one market segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRevenue {
    pub segment: Segment,
    pub revenue: Decimal,
}

/// Sums net revenue per segment, highest first. Equal revenues keep the
/// first-seen order of their segments (stable sort).
pub fn segment_revenue(sales: &[SaleRecord]) -> Vec<SegmentRevenue> {
    let mut segments: Vec<SegmentRevenue> = group_sum(sales, |s| classify(&s.customer), |s| s.net)
        .into_iter()
        .map(|(segment, revenue)| SegmentRevenue { segment, revenue })
        .collect();
    segments.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    segments
}

/// Builds the textual recommendation surfaced on the dashboard: the top
/// segment by revenue and its share of total revenue.
pub fn recommendation(segments: &[SegmentRevenue], total_revenue: Decimal) -> String {
    let Some(top) = segments.first() else {
        return String::new();
    };
    let share = if total_revenue.is_zero() {
        Decimal::ZERO
    } else {
        (top.revenue / total_revenue * Decimal::from(100)).round_dp(1)
    };
    format!(
        "REKOMENDASI:\n\
         1. Fokus akuisisi pelanggan tipe '{}' ({}%).\n\
         2. Perkuat penetrasi di jalan dengan omzet tertinggi.",
        top.segment.label(),
        share
    )
}

/// Sums net revenue per street and keeps the `top_n` largest.
pub fn street_revenue(sales: &[SaleRecord], top_n: usize) -> Vec<(String, Decimal)> {
    let mut streets = group_sum(sales, |s| extract_street(&s.address), |s| s.net);
    streets.sort_by(|a, b| b.1.cmp(&a.1));
    streets.truncate(top_n);
    streets
}
