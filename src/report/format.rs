//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the engine code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{AnalysisResult, Period};
use crate::io::ingest::IngestedData;
use crate::report::ScanRankings;
use crate::subsidy::SubsidySchedule;

/// Format the dataset header printed after ingest.
pub fn format_ingest_summary(ingest: &IngestedData) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Data: {} rows read, {} used, {} skipped | weeks ending {}..{} | {} retailers x {} product groups\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.row_errors.len(),
        ingest.stats.first_week_ending,
        ingest.stats.last_week_ending,
        ingest.stats.n_retailers,
        ingest.stats.n_product_groups,
    ));
    for err in ingest.row_errors.iter().take(5) {
        out.push_str(&format!("  (line {}) {}\n", err.line, err.message));
    }
    if ingest.row_errors.len() > 5 {
        out.push_str(&format!(
            "  ... and {} more skipped rows\n",
            ingest.row_errors.len() - 5
        ));
    }
    out
}

/// Format the full single-run summary (windows, periods, spend, metrics).
pub fn format_analysis_summary(a: &AnalysisResult) -> String {
    let w = &a.windows;
    let m = &a.metrics;
    let f = &a.financials;

    let mut out = String::new();
    out.push_str("=== promo - Post-Promotion Analysis ===\n");
    out.push_str(&format!("Retailer: {}\n", a.retailer));
    out.push_str(&format!("Product group(s): {}\n", a.product_group_display()));
    out.push_str(&format!(
        "Promo: {} .. {} ({} days)\n",
        w.promo_start, w.promo_end, w.promo_days
    ));
    out.push_str(&format!("Pre:   {} .. {}\n", w.pre_start, w.pre_end));
    out.push_str(&format!("Post:  {} .. {}\n", w.post_start, w.post_end));

    out.push_str("\nPeriod performance:\n");
    out.push_str(&format!(
        "{:<14} {:>14} {:>12} {:>14} {:>12}\n",
        "period", "sales", "units", "incr sales", "incr units"
    ));
    out.push_str(&format!(
        "{:-<14} {:-<14} {:-<12} {:-<14} {:-<12}\n",
        "", "", "", "", ""
    ));
    for period in Period::ALL {
        let agg = a.aggregate(period);
        let (incr_sales, incr_units) = match period {
            Period::Pre => ("-".to_string(), "-".to_string()),
            _ => (
                fmt_money(agg.total_dollars - a.pre.total_dollars),
                fmt_count(agg.total_units - a.pre.total_units),
            ),
        };
        out.push_str(&format!(
            "{:<14} {:>14} {:>12} {:>14} {:>12}\n",
            period.display_name(),
            fmt_money(agg.total_dollars),
            fmt_count(agg.total_units),
            incr_sales,
            incr_units,
        ));
    }

    out.push_str("\nTrade spend breakdown:\n");
    out.push_str(&spend_line("Item-level trade spend", f.trade_spend, m.total_trade_spend));
    out.push_str(&spend_line("Additional fees", f.flat_fee, m.total_trade_spend));
    if m.edlp_spend > 0.0 {
        out.push_str(&spend_line("EDLP spend", m.edlp_spend, m.total_trade_spend));
    }
    out.push_str(&format!(
        "- Total trade investment: {}\n",
        fmt_money(m.total_trade_spend)
    ));

    out.push_str("\nLift:\n");
    out.push_str(&format!(
        "- During promo: {} (expected {}, {:+.1} pts)\n",
        fmt_pct(m.during_lift_pct),
        fmt_pct(f.expected_lift_pct),
        m.during_lift_pct - f.expected_lift_pct,
    ));
    out.push_str(&format!("- Post promo:   {}\n", fmt_pct(m.post_lift_pct)));
    out.push_str(&format!(
        "- Incremental units: {}\n",
        fmt_count(m.incremental_units)
    ));

    out.push_str("\nFinancial performance:\n");
    out.push_str(&format!(
        "- Actual ROI: {} (expected {}, {:+.1} pts)\n",
        fmt_pct(m.roi_pct),
        fmt_pct(f.expected_roi_pct),
        m.roi_pct - f.expected_roi_pct,
    ));
    out.push_str(&format!(
        "- Incremental revenue: {}\n",
        fmt_money(m.incremental_sales)
    ));
    out.push_str(&format!(
        "- Incremental profit:  {} (at {:.0}% gross margin)\n",
        fmt_money(m.incremental_profit),
        f.gross_margin_pct,
    ));

    if !a.notes.is_empty() {
        out.push_str(&format!("\nNotes: {}\n", a.notes));
    }

    out
}

fn spend_line(label: &str, amount: f64, total: f64) -> String {
    if total > 0.0 {
        format!(
            "- {label}: {} ({:.1}%)\n",
            fmt_money(amount),
            amount / total * 100.0
        )
    } else {
        format!("- {label}: {}\n", fmt_money(amount))
    }
}

/// Format the winner/laggard tables for scan mode.
pub fn format_scan_rankings(rankings: &ScanRankings) -> String {
    let mut out = String::new();

    out.push_str("Top lift (winners):\n");
    out.push_str(&format_scan_table(&rankings.winners));
    out.push('\n');

    out.push_str("Bottom lift (laggards):\n");
    out.push_str(&format_scan_table(&rankings.laggards));

    out
}

fn format_scan_table(rows: &[crate::app::pipeline::ScanEntry]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<40} {:<26} {:>11} {:>11} {:>9} {:>9}\n",
        "retailer", "product group", "pre units", "during", "lift", "roi"
    ));
    out.push_str(&format!(
        "{:-<40} {:-<26} {:-<11} {:-<11} {:-<9} {:-<9}\n",
        "", "", "", "", "", ""
    ));

    for entry in rows {
        let m = &entry.result.metrics;
        out.push_str(&format!(
            "{:<40} {:<26} {:>11} {:>11} {:>9} {:>9}\n",
            truncate(&entry.retailer, 40),
            truncate(&entry.product_group, 26),
            fmt_count(entry.result.pre.total_units),
            fmt_count(entry.result.during.total_units),
            fmt_pct(m.during_lift_pct),
            fmt_pct(m.roi_pct),
        ));
    }

    out
}

/// Format the saved-analyses listing with an aggregate footer.
pub fn format_saved_list(analyses: &[AnalysisResult]) -> String {
    if analyses.is_empty() {
        return "No saved analyses yet.\n".to_string();
    }

    let mut out = String::new();
    for (idx, a) in analyses.iter().enumerate() {
        let m = &a.metrics;
        out.push_str(&format!(
            "[{idx}] {} | {} | {} .. {} | lift {} | roi {} | spend {}\n",
            a.retailer,
            truncate(&a.product_group_display(), 40),
            a.windows.promo_start,
            a.windows.promo_end,
            fmt_pct(m.during_lift_pct),
            fmt_pct(m.roi_pct),
            fmt_money(m.total_trade_spend),
        ));
    }

    let n = analyses.len() as f64;
    let avg_lift = analyses.iter().map(|a| a.metrics.during_lift_pct).sum::<f64>() / n;
    let avg_roi = analyses.iter().map(|a| a.metrics.roi_pct).sum::<f64>() / n;
    let total_spend = analyses.iter().map(|a| a.metrics.total_trade_spend).sum::<f64>();
    let total_incremental = analyses.iter().map(|a| a.metrics.incremental_sales).sum::<f64>();

    out.push_str(&format!(
        "\n{} analyses | avg lift {} | avg roi {} | total investment {} | total incremental {}\n",
        analyses.len(),
        fmt_pct(avg_lift),
        fmt_pct(avg_roi),
        fmt_money(total_spend),
        fmt_money(total_incremental),
    ));

    out
}

/// Format the effective subsidy schedule.
pub fn format_rates(schedule: &SubsidySchedule) -> String {
    if schedule.is_empty() {
        return "No EDLP rates configured.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "EDLP rates ({} retailers configured):\n",
        schedule.retailer_count()
    ));

    let mut current_retailer = "";
    for (retailer, group, rate) in schedule.entries() {
        if retailer != current_retailer {
            out.push_str(&format!("{retailer}:\n"));
            current_retailer = retailer;
        }
        out.push_str(&format!("  {group}: ${rate:.2}/unit\n"));
    }

    out
}

/// Whole-dollar display with thousands separators (`$1,234`, `-$1,234`).
pub fn fmt_money(v: f64) -> String {
    let negative = v < -0.5;
    let grouped = group_thousands(v.abs().round() as u64);
    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Whole-number display with thousands separators.
pub fn fmt_count(v: f64) -> String {
    let negative = v < -0.5;
    let grouped = group_thousands(v.abs().round() as u64);
    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn fmt_pct(v: f64) -> String {
    format!("{v:.1}%")
}

fn group_thousands(v: u64) -> String {
    let digits = v.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
