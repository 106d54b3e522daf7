//! Turns the four raw worksheets into validated, typed record collections.
//!
//! Validation is all-or-nothing: the first missing column, malformed cell or
//! broken record invariant aborts the run with a [`NormalizeError`] naming
//! the sheet and field. Empty tables are only warned about; downstream
//! aggregates degrade to empty or zero output.

use chrono::NaiveDate;
use core_types::{OpeningBalanceRecord, PaymentRecord, SaleRecord, TargetRecord};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::warn;

pub mod error;
pub mod table;

pub use error::NormalizeError;
pub use table::{RawCell, RawDataset, RawTable, RawTargetSheet, TargetColumn, TargetRow};

/// Header of the metric column holding target quantities.
const TARGET_QTY: &str = "Target Qty";
/// Header of the metric column holding target revenue values.
const TARGET_VALUE: &str = "Target Value";
/// Summary row appended to the target pivot; stripped before use.
const GRAND_TOTAL: &str = "GRAND TOTAL";

/// Typed snapshot of one reporting batch, ready for the analysis engines.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedData {
    pub sales: Vec<SaleRecord>,
    pub payments: Vec<PaymentRecord>,
    pub opening_balances: Vec<OpeningBalanceRecord>,
    pub targets: Vec<TargetRecord>,
    /// Non-fatal findings (empty tables). Already logged as warnings.
    pub warnings: Vec<String>,
}

/// Validates and types all four raw tables.
pub fn normalize(raw: &RawDataset) -> Result<NormalizedData, NormalizeError> {
    let sales = normalize_sales(&raw.sales)?;
    let payments = normalize_payments(&raw.payments)?;
    let opening_balances = normalize_opening_balances(&raw.opening_balances)?;
    let targets = normalize_targets(&raw.targets)?;

    let mut warnings = Vec::new();
    for (sheet, len) in [
        (&raw.sales.sheet, sales.len()),
        (&raw.payments.sheet, payments.len()),
        (&raw.opening_balances.sheet, opening_balances.len()),
        (&raw.targets.sheet, targets.len()),
    ] {
        if len == 0 {
            let message = format!("Sheet '{sheet}' contains no rows");
            warn!(sheet = %sheet, "empty input table");
            warnings.push(message);
        }
    }

    Ok(NormalizedData { sales, payments, opening_balances, targets, warnings })
}

fn normalize_sales(table: &RawTable) -> Result<Vec<SaleRecord>, NormalizeError> {
    let reader = SheetReader::new(table);
    let col_date = reader.column("Tanggal")?;
    let col_customer = reader.column("Nama Pelanggan")?;
    let col_address = reader.column("Alamat")?;
    let col_rep = reader.column("Nama Sales")?;
    let col_invoice = reader.column("No. Faktur")?;
    let col_terms = reader.column("TOP")?;
    let col_product = reader.column("Nama Barang")?;
    let col_qty = reader.column("Qty")?;
    let col_price = reader.column("Harga Satuan")?;
    let col_gross = reader.column("Total")?;
    let col_discount = reader.column("Diskon")?;
    let col_return = reader.column("Retur")?;
    let col_net = reader.column("Netto")?;

    let mut records = Vec::with_capacity(table.rows.len());
    for row in 0..table.rows.len() {
        let quantity = reader.quantity(row, col_qty)?;
        let unit_price = reader.money(row, col_price)?;
        let gross = reader.money(row, col_gross)?;
        let discount = reader.money(row, col_discount)?;
        let return_amount = reader.money(row, col_return)?;
        let net = reader.signed_money(row, col_net)?;

        if gross != unit_price * Decimal::from(quantity) {
            return Err(NormalizeError::InconsistentRow {
                sheet: table.sheet.clone(),
                row,
                detail: format!(
                    "Total {gross} does not equal Qty {quantity} x Harga Satuan {unit_price}"
                ),
            });
        }
        if net != gross - discount - return_amount {
            return Err(NormalizeError::InconsistentRow {
                sheet: table.sheet.clone(),
                row,
                detail: format!(
                    "Netto {net} does not equal Total {gross} - Diskon {discount} - Retur {return_amount}"
                ),
            });
        }

        records.push(SaleRecord {
            date: reader.date(row, col_date)?,
            customer: reader.text(row, col_customer)?,
            address: reader.text(row, col_address)?,
            rep: reader.text(row, col_rep)?,
            invoice_id: reader.text(row, col_invoice)?,
            payment_terms: reader.text(row, col_terms)?,
            product: reader.text(row, col_product)?,
            quantity,
            unit_price,
            gross,
            discount,
            return_amount,
            net,
        });
    }
    Ok(records)
}

fn normalize_payments(table: &RawTable) -> Result<Vec<PaymentRecord>, NormalizeError> {
    let reader = SheetReader::new(table);
    let col_date = reader.column("Tanggal Bayar")?;
    let col_customer = reader.column("Nama Pelanggan")?;
    let col_rep = reader.column("Nama Sales")?;
    let col_invoice = reader.column("No. Faktur")?;
    let col_amount = reader.column("Jumlah Bayar")?;
    let col_method = reader.column("Metode")?;

    let mut records = Vec::with_capacity(table.rows.len());
    for row in 0..table.rows.len() {
        let amount = reader.money(row, col_amount)?;
        if amount.is_zero() {
            return Err(reader.invalid(row, col_amount, "a positive payment amount"));
        }
        let method_text = reader.text(row, col_method)?;
        let method = method_text
            .parse()
            .map_err(|_| reader.invalid(row, col_method, "payment method TRANSFER or TUNAI"))?;

        records.push(PaymentRecord {
            date: reader.date(row, col_date)?,
            customer: reader.text(row, col_customer)?,
            rep: reader.text(row, col_rep)?,
            invoice_id: reader.text(row, col_invoice)?,
            amount,
            method,
        });
    }
    Ok(records)
}

fn normalize_opening_balances(
    table: &RawTable,
) -> Result<Vec<OpeningBalanceRecord>, NormalizeError> {
    let reader = SheetReader::new(table);
    let col_date = reader.column("Tanggal Faktur")?;
    let col_invoice = reader.column("No. Faktur Lama")?;
    let col_customer = reader.column("Nama Pelanggan")?;
    let col_rep = reader.column("Nama Sales")?;
    let col_outstanding = reader.column("Sisa Piutang")?;
    let col_category = reader.column("Kategori Umur Piutang")?;

    let mut records = Vec::with_capacity(table.rows.len());
    for row in 0..table.rows.len() {
        records.push(OpeningBalanceRecord {
            invoice_date: reader.date(row, col_date)?,
            invoice_id: reader.text(row, col_invoice)?,
            customer: reader.text(row, col_customer)?,
            rep: reader.text(row, col_rep)?,
            outstanding: reader.money(row, col_outstanding)?,
            aging_category: reader.text(row, col_category)?,
        });
    }
    Ok(records)
}

/// Unpivots the rep-then-metric target sheet into one record per
/// (rep, product) pair, dropping the GRAND TOTAL summary row.
fn normalize_targets(sheet: &RawTargetSheet) -> Result<Vec<TargetRecord>, NormalizeError> {
    // Reps in first-seen column order, each needing both metric columns.
    let mut reps: Vec<(&str, Option<usize>, Option<usize>)> = Vec::new();
    for (idx, column) in sheet.columns.iter().enumerate() {
        let slot = match reps.iter().position(|(rep, _, _)| *rep == column.rep) {
            Some(slot) => slot,
            None => {
                reps.push((column.rep.as_str(), None, None));
                reps.len() - 1
            }
        };
        match column.metric.as_str() {
            TARGET_QTY => reps[slot].1 = Some(idx),
            TARGET_VALUE => reps[slot].2 = Some(idx),
            _ => {}
        }
    }

    let mut records = Vec::new();
    for (rep, qty_col, value_col) in &reps {
        let qty_col = qty_col.ok_or_else(|| NormalizeError::MissingColumn {
            sheet: sheet.sheet.clone(),
            column: format!("{rep} / {TARGET_QTY}"),
        })?;
        let value_col = value_col.ok_or_else(|| NormalizeError::MissingColumn {
            sheet: sheet.sheet.clone(),
            column: format!("{rep} / {TARGET_VALUE}"),
        })?;

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            if row.product.trim().eq_ignore_ascii_case(GRAND_TOTAL) {
                continue;
            }
            let target_quantity =
                target_quantity_cell(sheet, row, row_idx, qty_col, rep)?;
            let target_value = target_money_cell(sheet, row, row_idx, value_col, rep)?;
            records.push(TargetRecord {
                rep: (*rep).to_string(),
                product: row.product.clone(),
                target_quantity,
                target_value,
            });
        }
    }
    Ok(records)
}

fn target_quantity_cell(
    sheet: &RawTargetSheet,
    row: &TargetRow,
    row_idx: usize,
    col: usize,
    rep: &str,
) -> Result<u32, NormalizeError> {
    match row.cells.get(col) {
        Some(RawCell::Number(n)) if n.fract().is_zero() && !n.is_sign_negative() => {
            n.to_u32().ok_or_else(|| target_invalid(sheet, row_idx, rep, TARGET_QTY))
        }
        _ => Err(target_invalid(sheet, row_idx, rep, TARGET_QTY)),
    }
}

fn target_money_cell(
    sheet: &RawTargetSheet,
    row: &TargetRow,
    row_idx: usize,
    col: usize,
    rep: &str,
) -> Result<Decimal, NormalizeError> {
    match row.cells.get(col) {
        Some(RawCell::Number(n)) if !n.is_sign_negative() => Ok(*n),
        _ => Err(target_invalid(sheet, row_idx, rep, TARGET_VALUE)),
    }
}

fn target_invalid(
    sheet: &RawTargetSheet,
    row: usize,
    rep: &str,
    metric: &str,
) -> NormalizeError {
    NormalizeError::InvalidCell {
        sheet: sheet.sheet.clone(),
        column: format!("{rep} / {metric}"),
        row,
        expected: "a non-negative number".to_string(),
    }
}

/// Column resolution and typed cell access for one raw table.
struct SheetReader<'a> {
    table: &'a RawTable,
}

impl<'a> SheetReader<'a> {
    fn new(table: &'a RawTable) -> Self {
        Self { table }
    }

    fn column(&self, name: &str) -> Result<usize, NormalizeError> {
        self.table.column_index(name).ok_or_else(|| NormalizeError::MissingColumn {
            sheet: self.table.sheet.clone(),
            column: name.to_string(),
        })
    }

    fn cell(&self, row: usize, col: usize) -> &RawCell {
        self.table
            .rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&RawCell::Null)
    }

    fn invalid(&self, row: usize, col: usize, expected: &str) -> NormalizeError {
        NormalizeError::InvalidCell {
            sheet: self.table.sheet.clone(),
            column: self.table.columns[col].clone(),
            row,
            expected: expected.to_string(),
        }
    }

    fn text(&self, row: usize, col: usize) -> Result<String, NormalizeError> {
        match self.cell(row, col) {
            RawCell::Text(s) if !s.trim().is_empty() => Ok(s.clone()),
            _ => Err(self.invalid(row, col, "non-empty text")),
        }
    }

    fn date(&self, row: usize, col: usize) -> Result<NaiveDate, NormalizeError> {
        match self.cell(row, col) {
            RawCell::Text(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|_| self.invalid(row, col, "a date in YYYY-MM-DD form")),
            _ => Err(self.invalid(row, col, "a date in YYYY-MM-DD form")),
        }
    }

    /// A non-negative amount. Zero is valid, not missing.
    fn money(&self, row: usize, col: usize) -> Result<Decimal, NormalizeError> {
        match self.cell(row, col) {
            RawCell::Number(n) if !n.is_sign_negative() => Ok(*n),
            _ => Err(self.invalid(row, col, "a non-negative amount")),
        }
    }

    /// An amount that may be negative (the net of a heavily returned line).
    fn signed_money(&self, row: usize, col: usize) -> Result<Decimal, NormalizeError> {
        match self.cell(row, col) {
            RawCell::Number(n) => Ok(*n),
            _ => Err(self.invalid(row, col, "an amount")),
        }
    }

    fn quantity(&self, row: usize, col: usize) -> Result<u32, NormalizeError> {
        match self.cell(row, col) {
            RawCell::Number(n) if n.fract().is_zero() && !n.is_sign_negative() => {
                n.to_u32().ok_or_else(|| self.invalid(row, col, "a non-negative whole quantity"))
            }
            _ => Err(self.invalid(row, col, "a non-negative whole quantity")),
        }
    }
}

#[cfg(test)]
mod tests;
