//! Shared analysis-pipeline logic used by the CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! validate -> compute windows -> prorate (x3) -> compute metrics
//!
//! The front-ends can then focus on presentation (printing vs widgets).
//! Each step is sub-millisecond pure computation, so the pipeline is a plain
//! synchronous call chain; scan mode fans the same chain out across
//! retailer/product-group pairs in parallel.

use chrono::Local;
use rayon::prelude::*;

use crate::domain::{AnalysisResult, Period, RunConfig, WeeklyObservation};
use crate::engine::{compute_metrics, compute_windows, prorate};
use crate::error::AppError;
use crate::subsidy::SubsidySchedule;

/// Validate run preconditions at the boundary, before any computation.
///
/// Mirrors the entry-form checks: the promo end date must be strictly after
/// the start date, and at least one product group must be selected.
pub fn validate_run(config: &RunConfig) -> Result<(), AppError> {
    if config.promo_start >= config.promo_end {
        return Err(AppError::input(
            "Promo end date must be after the start date.",
        ));
    }
    if config.product_groups.is_empty() {
        return Err(AppError::input("Select at least one product group."));
    }
    Ok(())
}

/// Execute one full promotion evaluation.
///
/// An empty retailer/product/window intersection is not an error: the
/// aggregates come back zero and the metrics degrade per the
/// zero-denominator policy.
pub fn run_analysis(
    observations: &[WeeklyObservation],
    config: &RunConfig,
    schedule: &SubsidySchedule,
) -> Result<AnalysisResult, AppError> {
    validate_run(config)?;

    let windows = compute_windows(config.promo_start, config.promo_end);

    let [pre, during, post] = Period::ALL.map(|period| {
        let (start, end) = windows.period_dates(period);
        prorate(observations, &config.retailer, &config.product_groups, start, end)
    });

    let metrics = compute_metrics(
        pre,
        during,
        post,
        &config.financials,
        schedule,
        &config.retailer,
        &config.product_groups,
    );

    Ok(AnalysisResult {
        retailer: config.retailer.clone(),
        product_groups: config.product_groups.clone(),
        windows,
        pre,
        during,
        post,
        financials: config.financials,
        metrics,
        notes: config.notes.clone(),
        analyzed_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    })
}

/// One evaluated retailer/product-group pair from a scan.
#[derive(Debug, Clone)]
pub struct ScanEntry {
    pub retailer: String,
    pub product_group: String,
    pub result: AnalysisResult,
}

/// Evaluate the same promotion window across every retailer/product-group
/// pair present in the dataset.
///
/// Each pair is an independent pure evaluation over the shared read-only
/// dataset, so the fan-out runs on the rayon pool. Pairs with no volume in
/// any of the three windows are dropped; results come back sorted by
/// `(retailer, product_group)` regardless of scheduling order.
pub fn run_scan(
    observations: &[WeeklyObservation],
    pairs: &[(String, String)],
    template: &RunConfig,
    schedule: &SubsidySchedule,
) -> Result<Vec<ScanEntry>, AppError> {
    validate_scan_template(template)?;

    let mut entries: Vec<ScanEntry> = pairs
        .par_iter()
        .map(|(retailer, group)| {
            let config = RunConfig {
                retailer: retailer.clone(),
                product_groups: [group.clone()].into_iter().collect(),
                ..template.clone()
            };
            run_analysis(observations, &config, schedule).map(|result| ScanEntry {
                retailer: retailer.clone(),
                product_group: group.clone(),
                result,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    entries.retain(|e| {
        let r = &e.result;
        r.pre.total_units > 0.0 || r.during.total_units > 0.0 || r.post.total_units > 0.0
    });
    entries.sort_by(|a, b| {
        (a.retailer.as_str(), a.product_group.as_str())
            .cmp(&(b.retailer.as_str(), b.product_group.as_str()))
    });

    Ok(entries)
}

fn validate_scan_template(template: &RunConfig) -> Result<(), AppError> {
    if template.promo_start >= template.promo_end {
        return Err(AppError::input(
            "Promo end date must be after the start date.",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FinancialInputs;
    use chrono::NaiveDate;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, day).unwrap()
    }

    fn obs(geo: &str, group: &str, week_ending: NaiveDate, dollars: f64, units: f64) -> WeeklyObservation {
        WeeklyObservation {
            geography: geo.to_string(),
            product_group: group.to_string(),
            week_ending,
            dollars,
            units,
        }
    }

    fn config(retailer: &str, groups: &[&str]) -> RunConfig {
        RunConfig {
            retailer: retailer.to_string(),
            product_groups: groups.iter().map(|s| s.to_string()).collect(),
            promo_start: d(6, 10),
            promo_end: d(6, 23),
            financials: FinancialInputs {
                trade_spend: 1000.0,
                flat_fee: 0.0,
                gross_margin_pct: 30.0,
                expected_lift_pct: 10.0,
                expected_roi_pct: 0.0,
            },
            notes: String::new(),
        }
    }

    #[test]
    fn rejects_reversed_and_equal_dates() {
        let mut cfg = config("KROGER CORP - RMA", &["16oz Core"]);
        cfg.promo_end = cfg.promo_start;
        assert_eq!(validate_run(&cfg).unwrap_err().exit_code(), 2);

        cfg.promo_end = d(6, 1);
        assert!(validate_run(&cfg).is_err());
    }

    #[test]
    fn rejects_empty_product_group_selection() {
        let cfg = config("KROGER CORP - RMA", &[]);
        assert!(validate_run(&cfg).is_err());
    }

    #[test]
    fn end_to_end_analysis() {
        // Two full reporting weeks land in each window.
        let data = vec![
            obs("KROGER CORP - RMA", "16oz Core", d(6, 9), 1000.0, 100.0),
            obs("KROGER CORP - RMA", "16oz Core", d(6, 2), 1000.0, 100.0),
            obs("KROGER CORP - RMA", "16oz Core", d(6, 16), 1500.0, 130.0),
            obs("KROGER CORP - RMA", "16oz Core", d(6, 23), 1300.0, 110.0),
            obs("KROGER CORP - RMA", "16oz Core", d(6, 30), 900.0, 95.0),
            obs("KROGER CORP - RMA", "16oz Core", d(7, 7), 950.0, 90.0),
        ];

        let result = run_analysis(
            &data,
            &config("KROGER CORP - RMA", &["16oz Core"]),
            &SubsidySchedule::empty(),
        )
        .unwrap();

        // Pre window 05-27..06-09 fully covers the weeks ending 06-02 and 06-09.
        assert!((result.pre.total_units - 200.0).abs() < 1e-9);
        assert!((result.during.total_units - 240.0).abs() < 1e-9);
        assert!((result.post.total_units - 185.0).abs() < 1e-9);
        assert!((result.metrics.during_lift_pct - 20.0).abs() < 1e-9);
        assert_eq!(result.windows.promo_days, 14);
    }

    #[test]
    fn empty_intersection_yields_zero_result() {
        let data = vec![obs("KROGER CORP - RMA", "16oz Core", d(6, 16), 1500.0, 130.0)];
        let result = run_analysis(
            &data,
            &config("WALMART CORP - RMA", &["16oz Core"]),
            &SubsidySchedule::empty(),
        )
        .unwrap();
        assert_eq!(result.pre.total_units, 0.0);
        assert_eq!(result.during.total_units, 0.0);
        assert_eq!(result.metrics.during_lift_pct, 0.0);
    }

    #[test]
    fn scan_evaluates_and_sorts_pairs() {
        let data = vec![
            obs("WALMART CORP - RMA", "32oz Core", d(6, 16), 2000.0, 200.0),
            obs("BIG Y - RMA", "16oz Core", d(6, 16), 500.0, 50.0),
            // No volume anywhere near the windows: dropped from scan output.
            obs("PUBLIX CORP - RMA", "16oz Core", d(1, 7), 100.0, 10.0),
        ];
        let pairs = vec![
            ("WALMART CORP - RMA".to_string(), "32oz Core".to_string()),
            ("BIG Y - RMA".to_string(), "16oz Core".to_string()),
            ("PUBLIX CORP - RMA".to_string(), "16oz Core".to_string()),
        ];

        let template = config("", &[]);
        let entries = run_scan(&data, &pairs, &template, &SubsidySchedule::empty()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].retailer, "BIG Y - RMA");
        assert_eq!(entries[1].retailer, "WALMART CORP - RMA");
    }
}
