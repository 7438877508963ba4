//! Command-line parsing for the post-promotion analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the engine code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::store::DEFAULT_STORE_PATH;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "promo",
    version,
    about = "Post-promotion lift & ROI analysis over weekly syndicated sales"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate one promotion and print the metrics report.
    Analyze(AnalyzeArgs),
    /// Evaluate the same window across every retailer/product-group pair and rank the results.
    Scan(ScanArgs),
    /// List the saved analyses.
    List(StoreArgs),
    /// Remove a saved analysis by index.
    Remove(RemoveArgs),
    /// Export the saved analyses to a summary CSV.
    Export(ExportArgs),
    /// Print the effective EDLP rate schedule.
    Rates(RatesArgs),
    /// Generate a synthetic weekly sales CSV for trying the tool.
    Demo(DemoArgs),
    /// Browse the saved analyses in a terminal UI.
    Tui(StoreArgs),
}

/// Promotion window dates, shared by `analyze` and `scan`.
#[derive(Debug, Args, Clone)]
pub struct WindowArgs {
    /// Promo start date (YYYY-MM-DD).
    #[arg(long)]
    pub start: NaiveDate,

    /// Promo end date (YYYY-MM-DD), strictly after the start date.
    #[arg(long)]
    pub end: NaiveDate,
}

/// Financial inputs, shared by `analyze` and `scan`.
#[derive(Debug, Args, Clone)]
pub struct FinancialArgs {
    /// Item-level trade spend: discounts, off-invoice, scan-based allowances ($).
    #[arg(long, default_value_t = 0.0)]
    pub trade_spend: f64,

    /// Additional fees: slotting, display, co-op advertising ($).
    #[arg(long, default_value_t = 0.0)]
    pub flat_fee: f64,

    /// Gross margin percent: (net price - COGS) / net price x 100.
    #[arg(long, default_value_t = 30.0)]
    pub gross_margin: f64,

    /// Expected unit lift percent.
    #[arg(long, default_value_t = 0.0)]
    pub expected_lift: f64,

    /// Expected ROI percent.
    #[arg(long, default_value_t = 0.0)]
    pub expected_roi: f64,
}

/// Options for a single-promotion analysis.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Weekly sales CSV (GEOGRAPHY, Product Group, Week Ending, Dollars, Units).
    #[arg(long, value_name = "CSV")]
    pub data: PathBuf,

    /// Retailer (GEOGRAPHY value, exact match).
    #[arg(short = 'r', long)]
    pub retailer: String,

    /// Product group(s); repeat the flag to pool several groups.
    #[arg(short = 'g', long = "product-group", value_name = "GROUP", required = true)]
    pub product_groups: Vec<String>,

    #[command(flatten)]
    pub window: WindowArgs,

    #[command(flatten)]
    pub financials: FinancialArgs,

    /// Free-form notes stored with the analysis.
    #[arg(long, default_value = "")]
    pub notes: String,

    /// Append the result to the saved-analyses store.
    #[arg(long)]
    pub save: bool,

    /// Saved-analyses store path.
    #[arg(long, default_value = DEFAULT_STORE_PATH)]
    pub store: PathBuf,

    /// EDLP rates JSON override (`{retailer: {group: rate}}`).
    #[arg(long, value_name = "JSON")]
    pub rates: Option<PathBuf>,

    /// Render the period bar chart (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the bar chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,
}

/// Options for scanning all retailer/product-group pairs.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Weekly sales CSV (GEOGRAPHY, Product Group, Week Ending, Dollars, Units).
    #[arg(long, value_name = "CSV")]
    pub data: PathBuf,

    #[command(flatten)]
    pub window: WindowArgs,

    #[command(flatten)]
    pub financials: FinancialArgs,

    /// Show top-N winners and laggards.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// EDLP rates JSON override (`{retailer: {group: rate}}`).
    #[arg(long, value_name = "JSON")]
    pub rates: Option<PathBuf>,
}

/// Options that only need the saved-analyses store.
#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Saved-analyses store path.
    #[arg(long, default_value = DEFAULT_STORE_PATH)]
    pub store: PathBuf,
}

/// Options for removing a saved analysis.
#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Zero-based index as shown by `promo list`.
    pub index: usize,

    /// Saved-analyses store path.
    #[arg(long, default_value = DEFAULT_STORE_PATH)]
    pub store: PathBuf,
}

/// Options for exporting the saved analyses.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output CSV path.
    pub output: PathBuf,

    /// Saved-analyses store path.
    #[arg(long, default_value = DEFAULT_STORE_PATH)]
    pub store: PathBuf,
}

/// Options for printing the rate schedule.
#[derive(Debug, Args)]
pub struct RatesArgs {
    /// EDLP rates JSON override (`{retailer: {group: rate}}`).
    #[arg(long, value_name = "JSON")]
    pub rates: Option<PathBuf>,
}

/// Options for generating a demo dataset.
#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Output CSV path.
    #[arg(default_value = "sample_weekly_sales.csv")]
    pub output: PathBuf,

    /// Number of reporting weeks to generate.
    #[arg(long, default_value_t = 52)]
    pub weeks: usize,

    /// Random seed for reproducible data.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Week Ending of the first generated week (YYYY-MM-DD).
    #[arg(long, default_value = "2024-01-07")]
    pub first_week_ending: NaiveDate,
}
