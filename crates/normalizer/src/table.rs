use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One loosely typed cell as it arrives from the loader.
///
/// Dates travel as ISO-8601 text; the normalizer parses them. Zero is a
/// valid number, not a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    Null,
    Number(Decimal),
    Text(String),
}

impl RawCell {
    pub fn is_null(&self) -> bool {
        matches!(self, RawCell::Null)
    }
}

/// A named-column grid of raw cells, one per source worksheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub sheet: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    /// Index of a column by its header name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// One column of the two-level target pivot: a sales rep paired with a
/// metric header ("Target Qty" or "Target Value").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetColumn {
    pub rep: String,
    pub metric: String,
}

/// One product row of the target pivot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRow {
    pub product: String,
    pub cells: Vec<RawCell>,
}

/// The raw Targets sheet: product rows under rep-then-metric columns, with
/// a trailing GRAND TOTAL row the normalizer strips before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTargetSheet {
    pub sheet: String,
    pub columns: Vec<TargetColumn>,
    pub rows: Vec<TargetRow>,
}

/// The four raw tables of one reporting batch, exactly as loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDataset {
    pub sales: RawTable,
    pub payments: RawTable,
    pub opening_balances: RawTable,
    pub targets: RawTargetSheet,
}
