//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the weekly dataset and the EDLP rate schedule
//! - runs the analysis pipeline
//! - prints reports/plots
//! - owns the saved-analyses store

use clap::Parser;

use crate::cli::{
    AnalyzeArgs, Command, DemoArgs, ExportArgs, FinancialArgs, RatesArgs, RemoveArgs, ScanArgs,
    StoreArgs,
};
use crate::domain::{FinancialInputs, RunConfig};
use crate::error::AppError;
use crate::store::AnalysisStore;
use crate::subsidy::SubsidySchedule;

pub mod pipeline;

/// Entry point for the `promo` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Scan(args) => handle_scan(args),
        Command::List(args) => handle_list(args),
        Command::Remove(args) => handle_remove(args),
        Command::Export(args) => handle_export(args),
        Command::Rates(args) => handle_rates(args),
        Command::Demo(args) => handle_demo(args),
        Command::Tui(args) => crate::tui::run(&args.store),
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let ingest = crate::io::ingest::load_weekly_data(&args.data)?;
    print!("{}", crate::report::format_ingest_summary(&ingest));

    let schedule = SubsidySchedule::resolve(args.rates.as_deref())?;
    let config = run_config_from_args(&args);
    let result = pipeline::run_analysis(&ingest.observations, &config, &schedule)?;

    println!();
    print!("{}", crate::report::format_analysis_summary(&result));

    if args.plot && !args.no_plot {
        println!();
        print!("{}", crate::plot::render_period_bars(&result, args.width, args.height));
    }

    if args.save {
        let mut store = AnalysisStore::open(&args.store)?;
        store.append(result);
        store.save()?;
        println!(
            "\nSaved to {} ({} analyses).",
            store.path().display(),
            store.len()
        );
    }

    Ok(())
}

fn handle_scan(args: ScanArgs) -> Result<(), AppError> {
    let ingest = crate::io::ingest::load_weekly_data(&args.data)?;
    print!("{}", crate::report::format_ingest_summary(&ingest));

    let schedule = SubsidySchedule::resolve(args.rates.as_deref())?;

    // The retailer/product-group fields are filled per pair during the scan.
    let template = RunConfig {
        retailer: String::new(),
        product_groups: Default::default(),
        promo_start: args.window.start,
        promo_end: args.window.end,
        financials: financials_from_args(&args.financials),
        notes: String::new(),
    };

    let pairs = ingest.retailer_group_pairs();
    let entries = pipeline::run_scan(&ingest.observations, &pairs, &template, &schedule)?;
    if entries.is_empty() {
        return Err(AppError::data(
            "No retailer/product-group pair has volume in the analysis windows.",
        ));
    }

    println!(
        "\nScanned {} pairs ({} with volume) for promo {} .. {}:\n",
        pairs.len(),
        entries.len(),
        args.window.start,
        args.window.end
    );

    let rankings = crate::report::rank_winners_laggards(&entries, args.top);
    print!("{}", crate::report::format_scan_rankings(&rankings));

    Ok(())
}

fn handle_list(args: StoreArgs) -> Result<(), AppError> {
    let store = AnalysisStore::open(&args.store)?;
    print!("{}", crate::report::format_saved_list(store.list()));
    Ok(())
}

fn handle_remove(args: RemoveArgs) -> Result<(), AppError> {
    let mut store = AnalysisStore::open(&args.store)?;
    let removed = store.remove(args.index)?;
    store.save()?;
    println!(
        "Removed [{}] {} | {} ({} analyses remain).",
        args.index,
        removed.retailer,
        removed.product_group_display(),
        store.len()
    );
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let store = AnalysisStore::open(&args.store)?;
    if store.is_empty() {
        return Err(AppError::data("No saved analyses to export."));
    }
    crate::io::export::write_summary_csv(&args.output, store.list())?;
    println!(
        "Exported {} analyses to {}.",
        store.len(),
        args.output.display()
    );
    Ok(())
}

fn handle_rates(args: RatesArgs) -> Result<(), AppError> {
    let schedule = SubsidySchedule::resolve(args.rates.as_deref())?;
    print!("{}", crate::report::format_rates(&schedule));
    Ok(())
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let spec = crate::data::SampleSpec {
        weeks: args.weeks,
        seed: args.seed,
        first_week_ending: args.first_week_ending,
    };
    let sample = crate::data::generate_weekly_sample(&spec)?;
    crate::data::write_weekly_csv(&args.output, &sample.observations)?;

    println!(
        "Wrote {} rows to {}.",
        sample.observations.len(),
        args.output.display()
    );
    println!(
        "A promo bump is injected over {} .. {}; try:\n",
        sample.promo_start, sample.promo_end
    );
    println!(
        "  promo analyze --data {} -r \"KROGER CORP - RMA\" -g \"24oz/6pk Traditional PBY\" \\\n    --start {} --end {} --trade-spend 5000 --flat-fee 1000",
        args.output.display(),
        sample.promo_start,
        sample.promo_end
    );

    Ok(())
}

pub fn run_config_from_args(args: &AnalyzeArgs) -> RunConfig {
    RunConfig {
        retailer: args.retailer.clone(),
        product_groups: args.product_groups.iter().cloned().collect(),
        promo_start: args.window.start,
        promo_end: args.window.end,
        financials: financials_from_args(&args.financials),
        notes: args.notes.clone(),
    }
}

fn financials_from_args(args: &FinancialArgs) -> FinancialInputs {
    FinancialInputs {
        trade_spend: args.trade_spend,
        flat_fee: args.flat_fee,
        gross_margin_pct: args.gross_margin,
        expected_lift_pct: args.expected_lift,
        expected_roi_pct: args.expected_roi,
    }
}
