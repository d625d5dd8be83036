use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use sales_report::config::{
    config_dir, load_config, load_sales, resolve_output_dir, CONFIG_TEMPLATE, SALES_TEMPLATE,
};
use sales_report::error::{ReportError, Result};
use sales_report::pdf::write_report_pdf;
use sales_report::{ReportDocument, ReportFilters, ReportLine, ReportSummary, SaleStatus};

const DEFAULT_REPORT_FILE: &str = "reporte_ventas.pdf";

#[derive(Parser)]
#[command(name = "sales-report")]
#[command(version, about = "Sales line-item reports with PDF export", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.sales-report or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Show configuration and sales data status
    Status,

    /// List sale line items matching the filters
    Sales {
        #[command(flatten)]
        filters: FilterArgs,

        /// Print matching rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Export matching sale line items as a PDF report
    Report {
        #[command(flatten)]
        filters: FilterArgs,

        /// Custom output file path (default: output_dir/reporte_ventas.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open generated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Only sales on or after this date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Only sales on or before this date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,

    /// Product name contains this text (case-insensitive)
    #[arg(long)]
    product: Option<String>,

    /// Exact category name (case-insensitive)
    #[arg(long)]
    category: Option<String>,

    /// Item status (pending, received, return_requested)
    #[arg(long)]
    status: Option<String>,
}

impl FilterArgs {
    fn into_filters(self) -> Result<ReportFilters> {
        Ok(ReportFilters {
            start_date: parse_date("--from", self.from.as_deref())?,
            end_date: parse_date("--to", self.to.as_deref())?,
            product_name: self.product,
            category: self.category,
            status: self
                .status
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<SaleStatus>())
                .transpose()?,
        })
    }
}

fn parse_date(flag: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    value
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ReportError::InvalidDate {
                flag,
                value: s.to_string(),
            })
        })
        .transpose()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };
    log::debug!("using config directory {}", cfg_dir.display());

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Sales { filters, json } => cmd_sales(&cfg_dir, filters, json),
        Commands::Report {
            filters,
            output,
            open,
        } => cmd_report(&cfg_dir, filters, output, open),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(ReportError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;

    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("sales.toml"), SALES_TEMPLATE)?;

    println!("Initialized sales-report config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit store details and timezone:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Record sales:                     $EDITOR {}/sales.toml",
        cfg_dir.display()
    );
    println!();
    println!("Then export a report:");
    println!("  sales-report report --from 2025-01-01 --status received");

    Ok(())
}

/// Show configuration status
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(ReportError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let config = load_config(cfg_dir)?;
    let tz = config.timezone()?;
    let sales = load_sales(cfg_dir)?;

    println!("Sales Report Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Store:            {}", config.store.name);
    println!("Report title:     {}", config.report.title);
    println!("Timezone:         {}", tz);
    println!("Sales:            {}", sales.sales.len());
    println!("Line items:       {}", sales.item_count());
    println!(
        "Output directory: {}",
        resolve_output_dir(&config.report.output_dir, cfg_dir).display()
    );

    Ok(())
}

// Table row struct for tabled
#[derive(Tabled)]
struct SaleRow {
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "PRODUCT")]
    product: String,
    #[tabled(rename = "CATEGORY")]
    category: String,
    #[tabled(rename = "QTY")]
    quantity: u32,
    #[tabled(rename = "PRICE")]
    price: String,
    #[tabled(rename = "SUBTOTAL")]
    subtotal: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

fn format_money(value: Decimal) -> String {
    format!("${:.2}", value.round_dp(2))
}

/// Load sales, apply filters, and return matching rows newest first
fn filtered_lines(
    cfg_dir: &Path,
    filters: &ReportFilters,
    tz: &chrono_tz::Tz,
) -> Result<Vec<ReportLine>> {
    let sales = load_sales(cfg_dir)?;
    let lines = filters.apply(sales.report_lines()?, tz);
    log::debug!("{} of {} line items match", lines.len(), sales.item_count());
    Ok(lines)
}

/// List sale line items
fn cmd_sales(cfg_dir: &Path, filter_args: FilterArgs, json: bool) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(ReportError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let filters = filter_args.into_filters()?;
    let config = load_config(cfg_dir)?;
    let tz = config.timezone()?;
    let lines = filtered_lines(cfg_dir, &filters, &tz)?;
    let summary = ReportSummary::from_lines(&lines)?;

    if json {
        let out = serde_json::json!({ "rows": lines, "summary": summary });
        let text = serde_json::to_string_pretty(&out)
            .map_err(|e| ReportError::Serialize(e.to_string()))?;
        println!("{text}");
        return Ok(());
    }

    if lines.is_empty() {
        println!("No sales match the given filters.");
        return Ok(());
    }

    let rows: Vec<SaleRow> = lines
        .iter()
        .map(|line| SaleRow {
            date: line
                .created_at
                .map(|ts| ts.to_local(&tz).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            product: line.product_name.clone(),
            category: line.category_name.clone().unwrap_or_default(),
            quantity: line.quantity,
            price: format_money(line.unit_price),
            subtotal: format_money(line.subtotal),
            status: line.status.label().to_string(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();
    println!("Total units: {}", summary.quantity);
    println!("Total sold:  {}", format_money(summary.total));

    Ok(())
}

/// Export a PDF report of the matching line items
fn cmd_report(
    cfg_dir: &Path,
    filter_args: FilterArgs,
    output: Option<PathBuf>,
    open: bool,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(ReportError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let filters = filter_args.into_filters()?;
    let config = load_config(cfg_dir)?;
    let tz = config.timezone()?;
    let lines = filtered_lines(cfg_dir, &filters, &tz)?;
    let summary = ReportSummary::from_lines(&lines)?;

    let pdf_path = match output {
        Some(path) => path,
        None => resolve_output_dir(&config.report.output_dir, cfg_dir).join(DEFAULT_REPORT_FILE),
    };

    let doc = ReportDocument {
        title: config.report.title.clone(),
        filters: filters.labels(),
        rows: lines,
        summary,
        timezone: tz,
    };
    write_report_pdf(&doc, &pdf_path)?;

    println!("Generated report '{}'", doc.title);
    println!("  Items:  {}", doc.rows.len());
    println!("  Units:  {}", summary.quantity);
    println!("  Total:  {}", format_money(summary.total));
    println!("  Saved:  {}", pdf_path.display());

    if open {
        open_path(&pdf_path)?;
    }

    Ok(())
}

fn open_path(pdf_path: &Path) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(pdf_path)
            .spawn()?;
    }
    Ok(())
}
