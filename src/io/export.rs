//! Export saved analyses to a summary CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts; one row per saved analysis. Retailer names, product-group lists,
//! and notes routinely contain commas, so rows go through the `csv` writer
//! rather than hand-formatted lines.

use std::path::Path;

use crate::domain::AnalysisResult;
use crate::error::AppError;

const HEADERS: [&str; 27] = [
    "Analysis Date",
    "Retailer",
    "Product Group(s)",
    "Promo Start",
    "Promo End",
    "Promo Days",
    "Pre-Promo Sales",
    "Pre-Promo Units",
    "During Promo Sales",
    "During Promo Units",
    "During Incr Dollars",
    "During Incr Units",
    "Post-Promo Sales",
    "Post-Promo Units",
    "Post Incr Dollars",
    "Post Incr Units",
    "Gross Margin %",
    "Incremental Profit",
    "EDLP Spend",
    "Trade Spend",
    "Flat Fee",
    "Total Spend",
    "Expected Lift %",
    "Actual During Lift %",
    "Actual Post Lift %",
    "Expected ROI %",
    "Actual ROI %",
];

/// Write the saved analyses to a summary CSV file.
pub fn write_summary_csv(path: &Path, analyses: &[AnalysisResult]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::input(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    let mut headers: Vec<&str> = HEADERS.to_vec();
    headers.push("Notes");
    writer
        .write_record(&headers)
        .map_err(|e| AppError::input(format!("Failed to write export CSV header: {e}")))?;

    for a in analyses {
        let w = &a.windows;
        let m = &a.metrics;
        let f = &a.financials;
        let record = vec![
            a.analyzed_at.clone(),
            a.retailer.clone(),
            a.product_group_display(),
            w.promo_start.to_string(),
            w.promo_end.to_string(),
            w.promo_days.to_string(),
            fmt(a.pre.total_dollars),
            fmt(a.pre.total_units),
            fmt(a.during.total_dollars),
            fmt(a.during.total_units),
            fmt(a.during.total_dollars - a.pre.total_dollars),
            fmt(a.during.total_units - a.pre.total_units),
            fmt(a.post.total_dollars),
            fmt(a.post.total_units),
            fmt(a.post.total_dollars - a.pre.total_dollars),
            fmt(a.post.total_units - a.pre.total_units),
            fmt(f.gross_margin_pct),
            fmt(m.incremental_profit),
            fmt(m.edlp_spend),
            fmt(f.trade_spend),
            fmt(f.flat_fee),
            fmt(m.total_trade_spend),
            fmt(f.expected_lift_pct),
            fmt(m.during_lift_pct),
            fmt(m.post_lift_pct),
            fmt(f.expected_roi_pct),
            fmt(m.roi_pct),
            a.notes.clone(),
        ];
        writer
            .write_record(&record)
            .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to flush export CSV: {e}")))?;

    Ok(())
}

fn fmt(v: f64) -> String {
    format!("{v:.2}")
}
