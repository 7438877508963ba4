//! Lift and ROI metrics over the three period aggregates.

use std::collections::BTreeSet;

use crate::domain::{FinancialInputs, MetricsBundle, PeriodAggregate};
use crate::subsidy::SubsidySchedule;

/// Compute the metrics bundle for one promotion evaluation.
///
/// Subsidy cost pools across groups: when multiple product groups are
/// selected, their per-unit rates are summed and applied uniformly to the
/// pooled during-period unit total. Per-group unit splits are not tracked
/// after pooling, so unit-based subsidy cannot be allocated per group here.
///
/// Zero-denominator policy: a zero pre-period unit baseline yields zero lift,
/// and zero total trade spend yields zero ROI. The bundle is total over its
/// inputs; there are no failure modes.
pub fn compute_metrics(
    pre: PeriodAggregate,
    during: PeriodAggregate,
    post: PeriodAggregate,
    financials: &FinancialInputs,
    schedule: &SubsidySchedule,
    retailer: &str,
    product_groups: &BTreeSet<String>,
) -> MetricsBundle {
    let edlp_spend = during.total_units * schedule.combined_rate(retailer, product_groups);
    let total_trade_spend = financials.trade_spend + financials.flat_fee + edlp_spend;

    // Lift is unit-based, relative to the pre-promo baseline.
    let during_lift_pct = if pre.total_units > 0.0 {
        (during.total_units - pre.total_units) / pre.total_units * 100.0
    } else {
        0.0
    };
    let post_lift_pct = if pre.total_units > 0.0 {
        (post.total_units - pre.total_units) / pre.total_units * 100.0
    } else {
        0.0
    };

    let incremental_sales = during.total_dollars - pre.total_dollars;
    let incremental_units = during.total_units - pre.total_units;
    let incremental_profit = incremental_sales * financials.gross_margin_pct / 100.0;

    let roi_pct = if total_trade_spend > 0.0 {
        (incremental_profit - total_trade_spend) / total_trade_spend * 100.0
    } else {
        0.0
    };

    MetricsBundle {
        during_lift_pct,
        post_lift_pct,
        incremental_sales,
        incremental_units,
        incremental_profit,
        edlp_spend,
        total_trade_spend,
        roi_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(dollars: f64, units: f64) -> PeriodAggregate {
        PeriodAggregate {
            total_dollars: dollars,
            total_units: units,
        }
    }

    fn fin(trade_spend: f64, flat_fee: f64, gross_margin_pct: f64) -> FinancialInputs {
        FinancialInputs {
            trade_spend,
            flat_fee,
            gross_margin_pct,
            expected_lift_pct: 0.0,
            expected_roi_pct: 0.0,
        }
    }

    fn groups(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn twenty_percent_unit_lift() {
        let m = compute_metrics(
            agg(10_000.0, 1000.0),
            agg(13_000.0, 1200.0),
            agg(10_500.0, 1050.0),
            &fin(0.0, 0.0, 30.0),
            &SubsidySchedule::empty(),
            "KROGER CORP - RMA",
            &groups(&["16oz Core"]),
        );
        assert!((m.during_lift_pct - 20.0).abs() < 1e-9);
        assert!((m.post_lift_pct - 5.0).abs() < 1e-9);
        assert!((m.incremental_sales - 3000.0).abs() < 1e-9);
        assert!((m.incremental_units - 200.0).abs() < 1e-9);
        assert!((m.incremental_profit - 900.0).abs() < 1e-9);
    }

    #[test]
    fn zero_baseline_degrades_lift_to_zero() {
        let m = compute_metrics(
            agg(0.0, 0.0),
            agg(5000.0, 500.0),
            agg(4000.0, 400.0),
            &fin(100.0, 0.0, 30.0),
            &SubsidySchedule::empty(),
            "KROGER CORP - RMA",
            &groups(&["16oz Core"]),
        );
        assert_eq!(m.during_lift_pct, 0.0);
        assert_eq!(m.post_lift_pct, 0.0);
        // Incrementals are still defined against the zero baseline.
        assert!((m.incremental_sales - 5000.0).abs() < 1e-9);
    }

    #[test]
    fn zero_spend_degrades_roi_to_zero() {
        let m = compute_metrics(
            agg(10_000.0, 1000.0),
            agg(13_000.0, 1200.0),
            agg(10_000.0, 1000.0),
            &fin(0.0, 0.0, 30.0),
            &SubsidySchedule::empty(),
            "KROGER CORP - RMA",
            &groups(&["16oz Core"]),
        );
        assert_eq!(m.total_trade_spend, 0.0);
        assert_eq!(m.roi_pct, 0.0);
    }

    #[test]
    fn breakeven_roi_is_zero() {
        // incremental_profit 6000 against total spend 6000 => ROI 0.
        let m = compute_metrics(
            agg(10_000.0, 1000.0),
            agg(30_000.0, 1500.0),
            agg(10_000.0, 1000.0),
            &fin(5000.0, 1000.0, 30.0),
            &SubsidySchedule::empty(),
            "KROGER CORP - RMA",
            &groups(&["16oz Core"]),
        );
        assert!((m.incremental_profit - 6000.0).abs() < 1e-9);
        assert!((m.total_trade_spend - 6000.0).abs() < 1e-9);
        assert!(m.roi_pct.abs() < 1e-9);
    }

    #[test]
    fn multi_group_subsidy_rates_are_summed_over_pooled_units() {
        let schedule = SubsidySchedule::from_entries(&[
            ("PUBLIX CORP - RMA", "16oz Core", 0.18),
            ("PUBLIX CORP - RMA", "32oz Core", 0.65),
        ]);
        let m = compute_metrics(
            agg(10_000.0, 1000.0),
            agg(13_000.0, 1200.0),
            agg(10_000.0, 1000.0),
            &fin(0.0, 0.0, 30.0),
            &schedule,
            "PUBLIX CORP - RMA",
            &groups(&["16oz Core", "32oz Core"]),
        );
        // (0.18 + 0.65) per unit on 1200 pooled units.
        assert!((m.edlp_spend - 996.0).abs() < 1e-9);
        assert!((m.total_trade_spend - 996.0).abs() < 1e-9);
    }

    #[test]
    fn unconfigured_retailer_pays_no_subsidy() {
        let schedule = SubsidySchedule::from_entries(&[("PUBLIX CORP - RMA", "16oz Core", 0.18)]);
        let m = compute_metrics(
            agg(10_000.0, 1000.0),
            agg(13_000.0, 1200.0),
            agg(10_000.0, 1000.0),
            &fin(0.0, 0.0, 30.0),
            &schedule,
            "BIG Y - RMA",
            &groups(&["16oz Core"]),
        );
        assert_eq!(m.edlp_spend, 0.0);
    }

    #[test]
    fn negative_lift_and_roi_are_preserved() {
        let m = compute_metrics(
            agg(10_000.0, 1000.0),
            agg(8000.0, 800.0),
            agg(9000.0, 900.0),
            &fin(1000.0, 0.0, 30.0),
            &SubsidySchedule::empty(),
            "KROGER CORP - RMA",
            &groups(&["16oz Core"]),
        );
        assert!((m.during_lift_pct - -20.0).abs() < 1e-9);
        assert!((m.incremental_profit - -600.0).abs() < 1e-9);
        assert!((m.roi_pct - -160.0).abs() < 1e-9);
    }
}
