use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a payment was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Transfer,
    Cash,
}

impl PaymentMethod {
    /// The label used in the source data and in rendered reports.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Transfer => "TRANSFER",
            PaymentMethod::Cash => "TUNAI",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TRANSFER" => Ok(PaymentMethod::Transfer),
            // The source data writes "TUNAI"; accept the English form too.
            "TUNAI" | "CASH" => Ok(PaymentMethod::Cash),
            other => Err(CoreError::UnknownPaymentMethod(other.to_string())),
        }
    }
}

/// The market segment a customer belongs to, derived from its trading name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    KulinerBakso,
    KulinerSate,
    KulinerSoto,
    KulinerMie,
    RetailWarung,
    RetailToko,
    WholesaleAgen,
    Horeka,
    Lainnya,
}

impl Segment {
    pub fn label(&self) -> &'static str {
        match self {
            Segment::KulinerBakso => "Kuliner - Bakso",
            Segment::KulinerSate => "Kuliner - Sate",
            Segment::KulinerSoto => "Kuliner - Soto",
            Segment::KulinerMie => "Kuliner - Mie",
            Segment::RetailWarung => "Retail - Warung",
            Segment::RetailToko => "Retail - Toko",
            Segment::WholesaleAgen => "Wholesale/Agen",
            Segment::Horeka => "Horeka",
            Segment::Lainnya => "Lainnya",
        }
    }
}

/// An invoice's age classification, computed from the evaluation date.
///
/// The four buckets are an ordered, non-overlapping, exhaustive partition
/// of the whole integer age range, negative ages included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBucket {
    /// Age <= 0 days: the invoice is not yet due.
    NotYetDue,
    /// 1 to 31 days.
    Days1To31,
    /// 32 to 60 days.
    Days32To60,
    /// More than 60 days: delinquent.
    Over60,
}

impl AgeBucket {
    /// All buckets in fixed report-column order.
    pub const ALL: [AgeBucket; 4] = [
        AgeBucket::NotYetDue,
        AgeBucket::Days1To31,
        AgeBucket::Days32To60,
        AgeBucket::Over60,
    ];

    /// Classifies an invoice age in whole days into its bucket.
    pub fn for_age(age_days: i64) -> Self {
        match age_days {
            d if d <= 0 => AgeBucket::NotYetDue,
            1..=31 => AgeBucket::Days1To31,
            32..=60 => AgeBucket::Days32To60,
            _ => AgeBucket::Over60,
        }
    }

    /// Position of this bucket in the fixed column order.
    pub fn index(&self) -> usize {
        match self {
            AgeBucket::NotYetDue => 0,
            AgeBucket::Days1To31 => 1,
            AgeBucket::Days32To60 => 2,
            AgeBucket::Over60 => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeBucket::NotYetDue => "-30 Hari - 0 Hari (Belum JT)",
            AgeBucket::Days1To31 => "1 Hari - 31 Hari",
            AgeBucket::Days32To60 => "32 Hari - 60 Hari",
            AgeBucket::Over60 => "> 60 Hari (Macet)",
        }
    }
}

/// Direction of the fitted daily revenue trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Rising,
    FallingOrFlat,
    /// Fewer than two distinct days of revenue: no fit was attempted.
    Neutral,
}

impl TrendDirection {
    pub fn label(&self) -> &'static str {
        match self {
            TrendDirection::Rising => "POSITIF (NAIK)",
            TrendDirection::FallingOrFlat => "NEGATIF (TURUN)",
            TrendDirection::Neutral => "Netral",
        }
    }
}

/// The bonus tier a sales rep lands in, from the tiered achievement table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusTier {
    /// Achievement >= 100%: bonus is 2.5% of realized revenue.
    Top,
    /// Achievement >= 85%.
    Mid,
    /// Achievement >= 70%.
    Base,
    /// Below every threshold: no bonus.
    None,
}

impl BonusTier {
    /// The bonus rate applied to the rep's realized revenue.
    pub fn rate(&self) -> Decimal {
        match self {
            BonusTier::Top => Decimal::new(25, 3),  // 2.5%
            BonusTier::Mid => Decimal::new(15, 3),  // 1.5%
            BonusTier::Base => Decimal::new(5, 3),  // 0.5%
            BonusTier::None => Decimal::ZERO,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BonusTier::Top => "2.5%",
            BonusTier::Mid => "1.5%",
            BonusTier::Base => "0.5%",
            BonusTier::None => "0%",
        }
    }
}
