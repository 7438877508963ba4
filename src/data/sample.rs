//! Synthetic weekly sales generation for demos and offline testing.
//!
//! Generates a deterministic (seeded) weekly syndicated dataset for a small
//! retailer/product-group catalog: a noisy baseline with a promotion bump
//! injected mid-series, so the analyzer has something to find.

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::WeeklyObservation;
use crate::error::AppError;

/// Week-over-week log-noise applied to baseline dollars.
const BASE_SIGMA: f64 = 0.08;

/// Catalog entry: retailer, product group, baseline weekly dollars, average
/// unit price, and the multiplicative lift injected during the promo weeks.
const CATALOG: &[(&str, &str, f64, f64, f64)] = &[
    ("BIG Y - RMA", "16oz Core", 4_200.0, 3.49, 1.35),
    ("BIG Y - RMA", "32oz Core", 6_800.0, 5.99, 1.20),
    ("KROGER CORP - RMA", "24oz/6pk Traditional PBY", 18_500.0, 7.49, 1.55),
    ("PUBLIX CORP - RMA", "16oz Core", 12_400.0, 3.79, 1.45),
    ("PUBLIX CORP - RMA", "32oz Core", 9_300.0, 6.29, 1.30),
    ("WALMART CORP - RMA", "16oz Core", 26_000.0, 3.29, 1.25),
    ("WALMART CORP - RMA", "32oz Core", 21_500.0, 5.49, 1.15),
    ("WEGMANS CORP W/O NYC - RMA", "16oz Innovation", 5_600.0, 3.99, 1.60),
];

/// Demo dataset parameters.
#[derive(Debug, Clone)]
pub struct SampleSpec {
    /// Number of reporting weeks to generate (>= 8).
    pub weeks: usize,
    pub seed: u64,
    /// `Week Ending` of the first generated week.
    pub first_week_ending: NaiveDate,
}

/// Generated dataset plus the injected promo window (two reporting weeks,
/// expressed as day-granularity dates usable directly with `analyze`).
#[derive(Debug, Clone)]
pub struct SampleData {
    pub observations: Vec<WeeklyObservation>,
    pub promo_start: NaiveDate,
    pub promo_end: NaiveDate,
}

/// Generate the synthetic weekly dataset.
pub fn generate_weekly_sample(spec: &SampleSpec) -> Result<SampleData, AppError> {
    if spec.weeks < 8 {
        return Err(AppError::input("Demo dataset needs at least 8 weeks."));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let noise = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::internal(format!("Noise distribution error: {e}")))?;

    // Two-week promo bump centered in the series.
    let bump_first = spec.weeks / 2;
    let bump_weeks = [bump_first, bump_first + 1];

    let mut observations = Vec::with_capacity(spec.weeks * CATALOG.len());
    for week_idx in 0..spec.weeks {
        let week_ending = spec.first_week_ending + Duration::days(7 * week_idx as i64);
        for (retailer, group, base_dollars, price, promo_lift) in CATALOG {
            let z: f64 = noise.sample(&mut rng);
            // Lognormal-style multiplier with mean correction so the
            // long-run average stays at the baseline.
            let mult = (BASE_SIGMA * z - BASE_SIGMA * BASE_SIGMA / 2.0).exp();

            let lift = if bump_weeks.contains(&week_idx) { *promo_lift } else { 1.0 };
            let dollars = base_dollars * mult * lift;
            let units = (dollars / price).round();

            observations.push(WeeklyObservation {
                geography: retailer.to_string(),
                product_group: group.to_string(),
                week_ending,
                dollars: (dollars * 100.0).round() / 100.0,
                units,
            });
        }
    }

    let first_bump_ending = spec.first_week_ending + Duration::days(7 * bump_first as i64);
    let promo_start = first_bump_ending - Duration::days(6);
    let promo_end = first_bump_ending + Duration::days(7);

    Ok(SampleData {
        observations,
        promo_start,
        promo_end,
    })
}

/// Write observations to a CSV the ingester can read back.
pub fn write_weekly_csv(path: &std::path::Path, observations: &[WeeklyObservation]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::input(format!("Failed to create CSV '{}': {e}", path.display()))
    })?;

    writer
        .write_record(["GEOGRAPHY", "Product Group", "Week Ending", "Dollars", "Units"])
        .map_err(|e| AppError::input(format!("Failed to write CSV header: {e}")))?;

    for obs in observations {
        writer
            .write_record([
                obs.geography.as_str(),
                obs.product_group.as_str(),
                &obs.week_ending.to_string(),
                &format!("{:.2}", obs.dollars),
                &format!("{:.0}", obs.units),
            ])
            .map_err(|e| AppError::input(format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::input(format!("Failed to flush CSV: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> SampleSpec {
        SampleSpec {
            weeks: 52,
            seed: 42,
            first_week_ending: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        }
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let a = generate_weekly_sample(&spec()).unwrap();
        let b = generate_weekly_sample(&spec()).unwrap();
        assert_eq!(a.observations, b.observations);
        assert_eq!(a.observations.len(), 52 * CATALOG.len());
    }

    #[test]
    fn promo_window_spans_the_two_bump_weeks() {
        let data = generate_weekly_sample(&spec()).unwrap();
        // Week 26 ends 2024-07-07; its span starts 2024-07-01. The bump
        // covers weeks 26 and 27, so the window ends 2024-07-14.
        assert_eq!(data.promo_start, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert_eq!(data.promo_end, NaiveDate::from_ymd_opt(2024, 7, 14).unwrap());
        assert_eq!((data.promo_end - data.promo_start).num_days() + 1, 14);
    }

    #[test]
    fn bump_weeks_carry_visible_lift() {
        let data = generate_weekly_sample(&spec()).unwrap();
        let bump_endings = [
            NaiveDate::from_ymd_opt(2024, 7, 7).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 14).unwrap(),
        ];

        // Average KROGER bump-week dollars should clearly exceed the baseline
        // (1.55x lift vs 8% weekly noise).
        let kroger: Vec<&WeeklyObservation> = data
            .observations
            .iter()
            .filter(|o| o.geography == "KROGER CORP - RMA")
            .collect();
        let bump_avg: f64 = kroger
            .iter()
            .filter(|o| bump_endings.contains(&o.week_ending))
            .map(|o| o.dollars)
            .sum::<f64>()
            / 2.0;
        let baseline_avg: f64 = kroger
            .iter()
            .filter(|o| !bump_endings.contains(&o.week_ending))
            .map(|o| o.dollars)
            .sum::<f64>()
            / (kroger.len() - 2) as f64;

        assert!(
            bump_avg > baseline_avg * 1.2,
            "bump {bump_avg} vs baseline {baseline_avg}"
        );
    }

    #[test]
    fn too_few_weeks_is_rejected() {
        let mut s = spec();
        s.weeks = 4;
        assert!(generate_weekly_sample(&s).is_err());
    }
}
