use crate::enums::PaymentMethod;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single validated sales invoice line.
///
/// Invariants (enforced by the normalizer, relied upon everywhere else):
/// quantity and prices are non-negative, `gross = quantity * unit_price`
/// and `net = gross - discount - return_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub date: NaiveDate,
    pub customer: String,
    pub address: String,
    pub rep: String,
    pub invoice_id: String,
    /// Terms-of-payment code, e.g. "30 Hari".
    pub payment_terms: String,
    pub product: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub gross: Decimal,
    pub discount: Decimal,
    pub return_amount: Decimal,
    pub net: Decimal,
}

/// A single validated incoming payment, possibly partial, against an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub date: NaiveDate,
    pub customer: String,
    pub rep: String,
    pub invoice_id: String,
    pub amount: Decimal,
    pub method: PaymentMethod,
}

/// An outstanding receivable carried over from before the reporting period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningBalanceRecord {
    pub invoice_date: NaiveDate,
    pub invoice_id: String,
    pub customer: String,
    pub rep: String,
    pub outstanding: Decimal,
    /// Aging category assigned by hand at data entry. Used only for the
    /// legacy opening-balance summary; the aging engine computes its own
    /// bucket from the invoice date and never reads this label.
    pub aging_category: String,
}

/// A sales target for one (rep, product) pair.
///
/// Targets exist for every pair the target sheet enumerates, including
/// products the rep never sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRecord {
    pub rep: String,
    pub product: String,
    pub target_quantity: u32,
    pub target_value: Decimal,
}
