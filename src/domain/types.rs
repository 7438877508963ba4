//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during analysis
//! - persisted to the saved-analyses JSON store
//! - exported to CSV summaries

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// One row of weekly syndicated sales data.
///
/// `week_ending` marks the **last** day of a trailing 7-day reporting week,
/// so the underlying span is `week_ending - 6 days ..= week_ending`.
/// Observations are immutable once loaded; the dataset is a read-only,
/// ordered collection for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyObservation {
    pub geography: String,
    pub product_group: String,
    pub week_ending: NaiveDate,
    pub dollars: f64,
    pub units: f64,
}

impl WeeklyObservation {
    /// First day of the implied 7-day reporting span.
    pub fn week_start(&self) -> NaiveDate {
        self.week_ending - Duration::days(6)
    }
}

/// The three analysis periods around a promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Pre,
    During,
    Post,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Pre, Period::During, Period::Post];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Period::Pre => "Pre-Promo",
            Period::During => "During Promo",
            Period::Post => "Post-Promo",
        }
    }
}

/// Derived promotion windows, keyed by a single start/end date pair.
///
/// Invariants (guaranteed by `engine::windows::compute_windows`):
/// - `promo_start <= promo_end`
/// - all three windows are contiguous and non-overlapping
/// - each window has length exactly `promo_days`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoWindowSet {
    pub promo_start: NaiveDate,
    pub promo_end: NaiveDate,
    /// Inclusive day count of the promotion window (>= 1).
    pub promo_days: i64,
    pub pre_start: NaiveDate,
    pub pre_end: NaiveDate,
    pub post_start: NaiveDate,
    pub post_end: NaiveDate,
}

impl PromoWindowSet {
    /// Inclusive `(start, end)` dates of one of the three windows.
    pub fn period_dates(&self, period: Period) -> (NaiveDate, NaiveDate) {
        match period {
            Period::Pre => (self.pre_start, self.pre_end),
            Period::During => (self.promo_start, self.promo_end),
            Period::Post => (self.post_start, self.post_end),
        }
    }
}

/// Prorated totals for one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodAggregate {
    pub total_dollars: f64,
    pub total_units: f64,
}

/// User-supplied financial inputs for a run.
///
/// Percentages are whole-number percents (`30.0` means 30%), matching how
/// they are entered and reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialInputs {
    pub trade_spend: f64,
    pub flat_fee: f64,
    pub gross_margin_pct: f64,
    pub expected_lift_pct: f64,
    pub expected_roi_pct: f64,
}

/// Computed lift/ROI metrics for a run.
///
/// All ratio metrics follow the zero-denominator policy: a zero baseline or
/// zero total spend yields `0.0` rather than an error or infinity, so the
/// bundle is always renderable. Callers that need to distinguish "zero
/// baseline" from "zero lift" must inspect the raw aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsBundle {
    /// Unit-based lift of the promo window vs. the pre-promo baseline (%).
    pub during_lift_pct: f64,
    /// Unit-based lift of the post window vs. the pre-promo baseline (%).
    pub post_lift_pct: f64,
    pub incremental_sales: f64,
    pub incremental_units: f64,
    pub incremental_profit: f64,
    /// Per-unit subsidy cost over pooled during-period units.
    pub edlp_spend: f64,
    /// `trade_spend + flat_fee + edlp_spend`.
    pub total_trade_spend: f64,
    pub roi_pct: f64,
}

/// The complete output record for one promotion evaluation.
///
/// Treated as immutable history once appended to the saved-analyses store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub retailer: String,
    /// Non-empty set of product groups, pooled into a single aggregate.
    pub product_groups: BTreeSet<String>,
    pub windows: PromoWindowSet,
    pub pre: PeriodAggregate,
    pub during: PeriodAggregate,
    pub post: PeriodAggregate,
    pub financials: FinancialInputs,
    pub metrics: MetricsBundle,
    #[serde(default)]
    pub notes: String,
    /// Local timestamp of when the analysis was run (`YYYY-MM-DD HH:MM:SS`).
    pub analyzed_at: String,
}

impl AnalysisResult {
    /// Aggregate for one of the three windows.
    pub fn aggregate(&self, period: Period) -> PeriodAggregate {
        match period {
            Period::Pre => self.pre,
            Period::During => self.during,
            Period::Post => self.post,
        }
    }

    /// Comma-joined product-group label for display and exports.
    pub fn product_group_display(&self) -> String {
        self.product_groups
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A single run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub retailer: String,
    pub product_groups: BTreeSet<String>,
    pub promo_start: NaiveDate,
    pub promo_end: NaiveDate,
    pub financials: FinancialInputs,
    pub notes: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_start_is_six_days_before_week_ending() {
        let obs = WeeklyObservation {
            geography: "KROGER CORP - RMA".to_string(),
            product_group: "16oz Core".to_string(),
            week_ending: NaiveDate::from_ymd_opt(2024, 6, 16).unwrap(),
            dollars: 700.0,
            units: 70.0,
        };
        assert_eq!(obs.week_start(), NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
    }

    #[test]
    fn product_group_display_is_sorted_and_joined() {
        let result = AnalysisResult {
            retailer: "PUBLIX CORP - RMA".to_string(),
            product_groups: ["32oz Core", "16oz Core"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            windows: PromoWindowSet {
                promo_start: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
                promo_end: NaiveDate::from_ymd_opt(2024, 6, 23).unwrap(),
                promo_days: 14,
                pre_start: NaiveDate::from_ymd_opt(2024, 5, 27).unwrap(),
                pre_end: NaiveDate::from_ymd_opt(2024, 6, 9).unwrap(),
                post_start: NaiveDate::from_ymd_opt(2024, 6, 24).unwrap(),
                post_end: NaiveDate::from_ymd_opt(2024, 7, 7).unwrap(),
            },
            pre: PeriodAggregate::default(),
            during: PeriodAggregate::default(),
            post: PeriodAggregate::default(),
            financials: FinancialInputs {
                trade_spend: 0.0,
                flat_fee: 0.0,
                gross_margin_pct: 30.0,
                expected_lift_pct: 0.0,
                expected_roi_pct: 0.0,
            },
            metrics: MetricsBundle {
                during_lift_pct: 0.0,
                post_lift_pct: 0.0,
                incremental_sales: 0.0,
                incremental_units: 0.0,
                incremental_profit: 0.0,
                edlp_spend: 0.0,
                total_trade_spend: 0.0,
                roi_pct: 0.0,
            },
            notes: String::new(),
            analyzed_at: "2024-07-08 09:00:00".to_string(),
        };

        // BTreeSet keeps groups sorted, so display order is deterministic.
        assert_eq!(result.product_group_display(), "16oz Core, 32oz Core");
    }
}
