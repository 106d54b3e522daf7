use super::*;
use core_types::PaymentMethod;
use rust_decimal_macros::dec;

fn txt(s: &str) -> RawCell {
    RawCell::Text(s.to_string())
}

fn num(n: Decimal) -> RawCell {
    RawCell::Number(n)
}

const SALES_COLUMNS: [&str; 13] = [
    "Tanggal", "Nama Pelanggan", "Alamat", "Nama Sales", "No. Faktur", "TOP", "Nama Barang",
    "Qty", "Harga Satuan", "Total", "Diskon", "Retur", "Netto",
];

fn sales_row(qty: Decimal, price: Decimal, gross: Decimal, discount: Decimal, net: Decimal) -> Vec<RawCell> {
    vec![
        txt("2025-07-14"),
        txt("Warung Bakso Pak Budi"),
        txt("Jl. Pandanaran No. 12, Semarang"),
        txt("Andi"),
        txt("INV/SMG/2025/07/1001"),
        txt("30 Hari"),
        txt("BSM 450 ml"),
        num(qty),
        num(price),
        num(gross),
        num(discount),
        num(Decimal::ZERO),
        num(net),
    ]
}

fn sales_table(rows: Vec<Vec<RawCell>>) -> RawTable {
    RawTable {
        sheet: "Penjualan".to_string(),
        columns: SALES_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows,
    }
}

fn payments_table(rows: Vec<Vec<RawCell>>) -> RawTable {
    RawTable {
        sheet: "Pembayaran".to_string(),
        columns: ["Tanggal Bayar", "Nama Pelanggan", "Nama Sales", "No. Faktur", "Jumlah Bayar", "Metode"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        rows,
    }
}

fn opening_table(rows: Vec<Vec<RawCell>>) -> RawTable {
    RawTable {
        sheet: "Saldo Awal".to_string(),
        columns: [
            "Tanggal Faktur", "No. Faktur Lama", "Nama Pelanggan", "Nama Sales", "Sisa Piutang",
            "Kategori Umur Piutang",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
        rows,
    }
}

fn target_sheet(rows: Vec<TargetRow>) -> RawTargetSheet {
    RawTargetSheet {
        sheet: "Target Sales".to_string(),
        columns: vec![
            TargetColumn { rep: "Andi".to_string(), metric: "Target Qty".to_string() },
            TargetColumn { rep: "Andi".to_string(), metric: "Target Value".to_string() },
        ],
        rows,
    }
}

fn dataset(
    sales: RawTable,
    payments: RawTable,
    opening: RawTable,
    targets: RawTargetSheet,
) -> RawDataset {
    RawDataset { sales, payments, opening_balances: opening, targets }
}

fn empty_dataset() -> RawDataset {
    dataset(
        sales_table(vec![]),
        payments_table(vec![]),
        opening_table(vec![]),
        target_sheet(vec![]),
    )
}

#[test]
fn valid_sales_row_normalizes() {
    let mut raw = empty_dataset();
    raw.sales.rows.push(sales_row(dec!(10), dec!(15000), dec!(150000), dec!(5000), dec!(145000)));

    let data = normalize(&raw).unwrap();
    assert_eq!(data.sales.len(), 1);
    let sale = &data.sales[0];
    assert_eq!(sale.quantity, 10);
    assert_eq!(sale.net, dec!(145000));
    assert_eq!(sale.gross, sale.unit_price * Decimal::from(sale.quantity));
    assert_eq!(sale.net, sale.gross - sale.discount - sale.return_amount);
}

#[test]
fn missing_column_names_sheet_and_column() {
    let mut raw = empty_dataset();
    raw.sales.columns.retain(|c| c != "Netto");

    let err = normalize(&raw).unwrap_err();
    match err {
        NormalizeError::MissingColumn { sheet, column } => {
            assert_eq!(sheet, "Penjualan");
            assert_eq!(column, "Netto");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn inconsistent_net_is_rejected() {
    let mut raw = empty_dataset();
    raw.sales.rows.push(sales_row(dec!(10), dec!(15000), dec!(150000), dec!(5000), dec!(150000)));

    let err = normalize(&raw).unwrap_err();
    assert!(matches!(err, NormalizeError::InconsistentRow { .. }));
}

#[test]
fn negative_quantity_is_rejected() {
    let mut raw = empty_dataset();
    raw.sales.rows.push(sales_row(dec!(-1), dec!(15000), dec!(-15000), dec!(0), dec!(-15000)));

    let err = normalize(&raw).unwrap_err();
    match err {
        NormalizeError::InvalidCell { column, .. } => assert_eq!(column, "Qty"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn zero_discount_is_a_valid_value() {
    let mut raw = empty_dataset();
    raw.sales.rows.push(sales_row(dec!(2), dec!(6300), dec!(12600), dec!(0), dec!(12600)));
    assert!(normalize(&raw).is_ok());
}

#[test]
fn payment_method_is_parsed_and_zero_amounts_rejected() {
    let mut raw = empty_dataset();
    raw.payments.rows.push(vec![
        txt("2025-07-20"),
        txt("Warung Bakso Pak Budi"),
        txt("Andi"),
        txt("INV/SMG/2025/07/1001"),
        num(dec!(145000)),
        txt("TUNAI"),
    ]);
    let data = normalize(&raw).unwrap();
    assert_eq!(data.payments[0].method, PaymentMethod::Cash);

    raw.payments.rows[0][4] = num(Decimal::ZERO);
    let err = normalize(&raw).unwrap_err();
    match err {
        NormalizeError::InvalidCell { column, .. } => assert_eq!(column, "Jumlah Bayar"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn opening_balance_keeps_author_entered_category() {
    let mut raw = empty_dataset();
    raw.opening_balances.rows.push(vec![
        txt("2025-05-20"),
        txt("INV/SMG/2025/05/412"),
        txt("Toko Makmur"),
        txt("Budi"),
        num(dec!(500000)),
        txt("32 Hari"),
    ]);
    let data = normalize(&raw).unwrap();
    assert_eq!(data.opening_balances[0].aging_category, "32 Hari");
    assert_eq!(data.opening_balances[0].outstanding, dec!(500000));
}

#[test]
fn grand_total_row_is_stripped_from_targets() {
    let mut raw = empty_dataset();
    raw.targets = target_sheet(vec![
        TargetRow {
            product: "BSM 450 ml".to_string(),
            cells: vec![num(dec!(100)), num(dec!(1500000))],
        },
        TargetRow {
            product: "GRAND TOTAL".to_string(),
            cells: vec![num(dec!(100)), num(dec!(1500000))],
        },
    ]);

    let data = normalize(&raw).unwrap();
    assert_eq!(data.targets.len(), 1);
    assert_eq!(data.targets[0].rep, "Andi");
    assert_eq!(data.targets[0].product, "BSM 450 ml");
    assert_eq!(data.targets[0].target_quantity, 100);
    assert_eq!(data.targets[0].target_value, dec!(1500000));
}

#[test]
fn target_rep_missing_value_column_is_fatal() {
    let mut raw = empty_dataset();
    raw.targets.columns.pop(); // drop Andi / Target Value
    raw.targets.rows.push(TargetRow {
        product: "BSM 450 ml".to_string(),
        cells: vec![num(dec!(100))],
    });

    let err = normalize(&raw).unwrap_err();
    match err {
        NormalizeError::MissingColumn { column, .. } => {
            assert_eq!(column, "Andi / Target Value");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_tables_warn_but_do_not_fail() {
    let data = normalize(&empty_dataset()).unwrap();
    assert_eq!(data.warnings.len(), 4);
    assert!(data.warnings[0].contains("Penjualan"));
}

#[test]
fn raw_cells_deserialize_from_json_scalars() {
    let cells: Vec<RawCell> = serde_json::from_str(r#"["2025-07-14", 15000, null]"#).unwrap();
    assert_eq!(cells[0], RawCell::Text("2025-07-14".to_string()));
    assert_eq!(cells[1], RawCell::Number(dec!(15000)));
    assert!(cells[2].is_null());
}
