use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use normalizer::RawDataset;
use reporting::AnalysisReport;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// The main entry point for the omzet reporting application.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => {
            if let Err(e) = handle_analyze(args) {
                eprintln!("Error during analysis: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Batch sales analytics: KPIs, forecast, segmentation, incentives and
/// receivables aging from one workbook dump.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis over a JSON workbook dump.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Path to the JSON file holding the four raw tables.
    #[arg(long)]
    input: PathBuf,

    /// Evaluation date for receivable ages (format: YYYY-MM-DD).
    /// Defaults to the omzet.toml value, then to today.
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Emit the full report as JSON instead of terminal tables.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

fn handle_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let settings = configuration::load_settings()?;

    let raw_text = std::fs::read_to_string(&args.input)?;
    let raw: RawDataset = serde_json::from_str(&raw_text)?;

    let data = normalizer::normalize(&raw)?;
    let as_of = args
        .as_of
        .or(settings.as_of)
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    info!(input = %args.input.display(), %as_of, "running analysis");
    let report = reporting::build_report(&data, as_of, settings.top_n);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_report(&report);
    }
    Ok(())
}

// ==============================================================================
// Terminal Rendering
// ==============================================================================

fn money(value: Decimal) -> String {
    format!("Rp {}", value.round_dp(0))
}

fn percent(ratio: Decimal) -> String {
    format!("{}%", (ratio * Decimal::from(100)).round_dp(1))
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(header.to_vec());
    table
}

fn render_report(report: &AnalysisReport) {
    println!("\n=== KPI DASHBOARD (as of {}) ===", report.as_of);
    let mut kpis = new_table(&["Metric", "Value"]);
    kpis.add_row(vec!["Total Omzet".to_string(), money(report.kpis.total_revenue)]);
    kpis.add_row(vec!["Total Transaksi".to_string(), report.kpis.transaction_count.to_string()]);
    kpis.add_row(vec!["Rata-rata Order".to_string(), money(report.kpis.average_order_value)]);
    kpis.add_row(vec![
        "Total Pembayaran Masuk".to_string(),
        money(report.kpis.total_payments_received),
    ]);
    kpis.add_row(vec![
        "Total Sisa Piutang Awal".to_string(),
        money(report.kpis.opening_receivable_total),
    ]);
    println!("{kpis}");

    println!("\n=== TREND & FORECAST ===");
    println!("Trend: {}", report.forecast.direction.label());
    if !report.forecast.points.is_empty() {
        let mut table = new_table(&["Tanggal", "Prediksi"]);
        for point in report.forecast.points.iter().take(7) {
            table.add_row(vec![point.date.to_string(), money(point.value)]);
        }
        println!("{table}");
    }

    println!("\n=== SEGMENTASI PELANGGAN ===");
    let mut segments = new_table(&["Segmen", "Omzet"]);
    for row in &report.segments {
        segments.add_row(vec![row.segment.label().to_string(), money(row.revenue)]);
    }
    println!("{segments}");
    if !report.recommendation.is_empty() {
        println!("{}", report.recommendation);
    }

    println!("\n=== TOP AREA (JALAN) ===");
    let mut streets = new_table(&["Nama Jalan", "Total Omzet"]);
    for row in &report.top_streets {
        streets.add_row(vec![row.street.clone(), money(row.revenue)]);
    }
    println!("{streets}");

    println!("\n=== EVALUASI TIM ===");
    let mut team = new_table(&[
        "Salesman", "Target", "Realisasi", "Ach %", "Rate Bonus", "Total Bonus", "Avg Diskon",
    ]);
    for kpi in &report.team {
        team.add_row(vec![
            kpi.rep.clone(),
            money(kpi.target_value),
            money(kpi.realized),
            percent(kpi.achievement),
            kpi.tier.label().to_string(),
            money(kpi.bonus),
            percent(kpi.avg_discount_ratio),
        ]);
    }
    println!("{team}");

    println!("\n=== REKAP PIUTANG PER SALES ===");
    let mut pivot = new_table(&[
        "Nama Sales",
        "Belum JT (-30 s/d 0)",
        "1 s/d 31 Hari",
        "32 s/d 60 Hari",
        "> 60 Hari (Macet)",
        "TOTAL",
    ]);
    for row in &report.aging.pivot {
        let mut cells = vec![row.rep.clone()];
        cells.extend(row.buckets.iter().map(|v| money(*v)));
        cells.push(money(row.total));
        pivot.add_row(cells);
    }
    let mut totals = vec!["TOTAL".to_string()];
    totals.extend(report.aging.bucket_totals.iter().map(|v| money(*v)));
    totals.push(money(report.aging.total_outstanding()));
    pivot.add_row(totals);
    println!("{pivot}");

    println!("\n=== TOP FAKTUR PIUTANG TERTINGGI ===");
    let mut top_items = new_table(&[
        "No Faktur", "Tanggal", "Customer", "Sales", "Sisa Piutang", "Umur (Hari)", "Kategori",
    ]);
    for line in &report.aging.top_open_items {
        top_items.add_row(vec![
            line.invoice_id.clone(),
            line.date.to_string(),
            line.customer.clone(),
            line.rep.clone(),
            money(line.remaining),
            line.age_days.to_string(),
            line.bucket.label().to_string(),
        ]);
    }
    println!("{top_items}");

    println!("\n=== PERFORMA SALESMAN ===");
    let mut reps = new_table(&["Nama Sales", "Total Omzet", "Total Qty"]);
    for row in &report.rep_performance {
        reps.add_row(vec![row.rep.clone(), money(row.net), row.quantity.to_string()]);
    }
    println!("{reps}");

    println!("\n=== TOP PRODUK TERLARIS ===");
    let mut products = new_table(&["Nama Barang", "Qty Terjual", "Nilai"]);
    for row in &report.top_products {
        products.add_row(vec![row.product.clone(), row.quantity.to_string(), money(row.gross)]);
    }
    println!("{products}");

    println!("\n=== METODE PEMBAYARAN ===");
    let mut methods = new_table(&["Metode", "Total Masuk"]);
    for row in &report.payment_methods {
        methods.add_row(vec![row.method.label().to_string(), money(row.total)]);
    }
    println!("{methods}");

    println!("\n=== UMUR PIUTANG AWAL (INPUT) ===");
    let mut legacy = new_table(&["Kategori Umur", "Total Piutang"]);
    for row in &report.legacy_opening_aging {
        legacy.add_row(vec![row.category.clone(), money(row.outstanding)]);
    }
    println!("{legacy}");

    println!("\n=== ANALISIS LOYALITAS ===");
    let mut loyalty = new_table(&["Pelanggan", "Frekuensi", "Nilai Belanja", "Hari Sejak Order"]);
    for row in &report.loyalty {
        loyalty.add_row(vec![
            row.customer.clone(),
            row.orders.to_string(),
            money(row.net),
            row.days_since_last_order.to_string(),
        ]);
    }
    println!("{loyalty}");
}
