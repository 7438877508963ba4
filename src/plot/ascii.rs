//! ASCII/Unicode bar chart for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - one bar per period (pre / during / post), drawn with `#`
//! - dollar value label above each bar
//! - period label + date range below the axis

use crate::domain::{AnalysisResult, Period};
use crate::report::format::fmt_money;

/// Render the pre/during/post sales comparison as a bar chart.
pub fn render_period_bars(result: &AnalysisResult, width: usize, height: usize) -> String {
    let width = width.max(36);
    let height = height.max(7);

    let values: Vec<f64> = Period::ALL
        .iter()
        .map(|p| result.aggregate(*p).total_dollars)
        .collect();
    let max_value = values.iter().cloned().fold(0.0, f64::max);

    // Rows available for the bars themselves (minus label + axis + captions).
    let bar_rows = height.saturating_sub(4).max(3);
    let col_width = width / 3;
    let bar_width = (col_width * 3 / 5).max(3);

    let mut grid = vec![vec![' '; width]; bar_rows];

    for (i, value) in values.iter().enumerate() {
        let col_start = i * col_width + (col_width - bar_width) / 2;

        // Bar height in rows; any nonzero value gets at least one row.
        let filled = if max_value > 0.0 {
            let h = (value / max_value * bar_rows as f64).round() as usize;
            if *value > 0.0 { h.max(1).min(bar_rows) } else { 0 }
        } else {
            0
        };

        for row in 0..filled {
            let y = bar_rows - 1 - row;
            for x in col_start..(col_start + bar_width).min(width) {
                grid[y][x] = '#';
            }
        }

        // Value label sits just above the bar (or on its top row when the
        // bar spans the full height).
        let label = fmt_money(*value);
        let label_y = bar_rows.saturating_sub(filled + 1).min(bar_rows - 1);
        write_centered(&mut grid[label_y], col_start, bar_width, &label);
    }

    let mut out = String::new();
    out.push_str("Sales by period:\n");
    for row in &grid {
        let line: String = row.iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push_str(&"-".repeat(width));
    out.push('\n');

    // Period captions under the axis.
    let mut caption = vec![' '; width];
    let mut dates = vec![' '; width];
    for (i, period) in Period::ALL.iter().enumerate() {
        let col_start = i * col_width;
        write_centered(&mut caption, col_start, col_width, period.display_name());
        let (start, end) = result.windows.period_dates(*period);
        let range = format!("{} .. {}", fmt_short(start), fmt_short(end));
        write_centered(&mut dates, col_start, col_width, &range);
    }
    out.push_str(caption.iter().collect::<String>().trim_end());
    out.push('\n');
    out.push_str(dates.iter().collect::<String>().trim_end());
    out.push('\n');

    out
}

fn write_centered(row: &mut [char], col_start: usize, col_width: usize, text: &str) {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() >= col_width {
        for (i, ch) in chars.iter().take(col_width).enumerate() {
            if col_start + i < row.len() {
                row[col_start + i] = *ch;
            }
        }
        return;
    }
    let offset = col_start + (col_width - chars.len()) / 2;
    for (i, ch) in chars.iter().enumerate() {
        if offset + i < row.len() {
            row[offset + i] = *ch;
        }
    }
}

fn fmt_short(date: chrono::NaiveDate) -> String {
    date.format("%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        FinancialInputs, MetricsBundle, PeriodAggregate, PromoWindowSet,
    };
    use chrono::NaiveDate;

    fn result(pre: f64, during: f64, post: f64) -> AnalysisResult {
        let d = |m: u32, day: u32| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
        let agg = |dollars: f64| PeriodAggregate {
            total_dollars: dollars,
            total_units: dollars / 10.0,
        };
        AnalysisResult {
            retailer: "BIG Y - RMA".to_string(),
            product_groups: ["16oz Core".to_string()].into_iter().collect(),
            windows: PromoWindowSet {
                promo_start: d(6, 10),
                promo_end: d(6, 23),
                promo_days: 14,
                pre_start: d(5, 27),
                pre_end: d(6, 9),
                post_start: d(6, 24),
                post_end: d(7, 7),
            },
            pre: agg(pre),
            during: agg(during),
            post: agg(post),
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
        }
    }

    #[test]
    fn renders_bars_and_labels() {
        let chart = render_period_bars(&result(1000.0, 2000.0, 1500.0), 72, 16);
        assert!(chart.contains('#'));
        assert!(chart.contains("$2,000"));
        assert!(chart.contains("Pre-Promo"));
        assert!(chart.contains("During Promo"));
        assert!(chart.contains("Post-Promo"));
        assert!(chart.contains("06-10 .. 06-23"));
    }

    #[test]
    fn all_zero_sales_does_not_panic() {
        let chart = render_period_bars(&result(0.0, 0.0, 0.0), 72, 16);
        assert!(!chart.contains('#'));
        assert!(chart.contains("$0"));
    }

    #[test]
    fn output_is_deterministic() {
        let a = render_period_bars(&result(1000.0, 2000.0, 1500.0), 72, 16);
        let b = render_period_bars(&result(1000.0, 2000.0, 1500.0), 72, 16);
        assert_eq!(a, b);
    }

    #[test]
    fn tallest_bar_belongs_to_largest_period() {
        let chart = render_period_bars(&result(500.0, 3000.0, 1000.0), 72, 16);
        // The top bar row should only contain the during-promo bar.
        let first_bar_row = chart
            .lines()
            .find(|line| line.contains('#'))
            .unwrap()
            .to_string();
        let width = 72usize;
        let col = width / 3;
        let during_cols = col..(2 * col);
        let hash_positions: Vec<usize> = first_bar_row
            .char_indices()
            .filter(|(_, c)| *c == '#')
            .map(|(i, _)| i)
            .collect();
        assert!(hash_positions.iter().all(|i| during_cols.contains(i)));
    }
}
