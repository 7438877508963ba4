//! EDLP subsidy rate schedule.
//!
//! A subsidy (EDLP) rate is a fixed dollar-per-unit payment owed to a
//! retailer independent of promotional activity, applied to all units sold
//! during the promo window. The schedule is an immutable
//! `retailer -> product group -> rate` lookup injected into the metrics
//! calculator — never a hidden global — so tests can substitute their own.
//!
//! Resolution order for the effective schedule:
//!
//! 1. an explicit `--rates <file>` JSON override
//! 2. a file named by the `PROMO_EDLP_RATES` env var (`.env` supported)
//! 3. the compiled-in default table

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use crate::error::AppError;

/// Compiled-in default rates, keyed by `GEOGRAPHY` and `Product Group`
/// exactly as they appear in the syndicated data.
const BUILTIN_RATES: &[(&str, &[(&str, f64)])] = &[
    (
        "AC - ALBERTSONSCO NORCAL DIV W/ HAWAII - RMA",
        &[
            ("10oz Core", 0.15),
            ("16oz Core", 0.17),
            ("16oz Innovation", 0.17),
            ("32oz Core", 0.32),
        ],
    ),
    ("BIG Y - RMA", &[("16oz Core", 0.16), ("32oz Core", 0.32)]),
    ("KROGER CORP - RMA", &[("24oz/6pk Traditional PBY", 0.55)]),
    (
        "PUBLIX CORP - RMA",
        &[
            ("16oz Core", 0.18),
            ("16oz Innovation", 0.18),
            ("32oz Core", 0.65),
            ("32oz/6pk Innovation", 0.69),
        ],
    ),
    (
        "SPROUTS FARMERS MARKET - TOTAL US W/O PL",
        &[
            ("10oz Core", 0.02),
            ("10oz/6pk Smoothie", 0.40),
            ("16oz Innovation", 0.38),
            ("24oz/6pk Traditional PBY", 0.65),
            ("32oz Core", 0.06),
        ],
    ),
    (
        "STATER BROS CORP - RMA",
        &[("16oz Core", 0.35), ("16oz Innovation", 0.35), ("32oz Core", 0.70)],
    ),
    ("TARGET CORP W/ AK/HI - RMA", &[("12oz/4pk CCW", 0.47)]),
    ("WALMART CORP - RMA", &[("16oz Core", 0.51), ("32oz Core", 0.72)]),
    (
        "WEGMANS CORP W/O NYC - RMA",
        &[
            ("10oz/6pk Smoothie", 0.36),
            ("16oz Core", 0.38),
            ("16oz Innovation", 0.38),
            ("32oz Core", 0.72),
        ],
    ),
];

/// Immutable per-unit subsidy rate lookup.
///
/// Missing keys default to rate `0.0`; the schedule never fails a lookup.
#[derive(Debug, Clone, Default)]
pub struct SubsidySchedule {
    rates: BTreeMap<String, BTreeMap<String, f64>>,
}

impl SubsidySchedule {
    /// A schedule with no configured rates (every lookup is `0.0`).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The compiled-in default table.
    pub fn builtin() -> Self {
        Self::from_entries(
            &BUILTIN_RATES
                .iter()
                .flat_map(|(retailer, groups)| {
                    groups.iter().map(move |(group, rate)| (*retailer, *group, *rate))
                })
                .collect::<Vec<_>>(),
        )
    }

    /// Build a schedule from `(retailer, product_group, rate)` triples.
    pub fn from_entries(entries: &[(&str, &str, f64)]) -> Self {
        let mut rates: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
        for (retailer, group, rate) in entries {
            rates
                .entry(retailer.to_string())
                .or_default()
                .insert(group.to_string(), *rate);
        }
        Self { rates }
    }

    /// Load a `{retailer: {product_group: rate}}` JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|e| {
            AppError::input(format!("Failed to open rates JSON '{}': {e}", path.display()))
        })?;
        let rates: BTreeMap<String, BTreeMap<String, f64>> = serde_json::from_reader(file)
            .map_err(|e| AppError::input(format!("Invalid rates JSON '{}': {e}", path.display())))?;

        for (retailer, groups) in &rates {
            for (group, rate) in groups {
                if !rate.is_finite() || *rate < 0.0 {
                    return Err(AppError::input(format!(
                        "Invalid rate {rate} for '{retailer}' / '{group}' (must be finite and >= 0)."
                    )));
                }
            }
        }

        Ok(Self { rates })
    }

    /// Resolve the effective schedule: explicit file > env var > builtin.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, AppError> {
        if let Some(path) = explicit {
            return Self::from_json_file(path);
        }

        dotenvy::dotenv().ok();
        if let Ok(path) = std::env::var("PROMO_EDLP_RATES") {
            return Self::from_json_file(Path::new(&path));
        }

        Ok(Self::builtin())
    }

    /// Per-unit rate for one retailer/product-group pair (`0.0` if absent).
    pub fn rate(&self, retailer: &str, product_group: &str) -> f64 {
        self.rates
            .get(retailer)
            .and_then(|groups| groups.get(product_group))
            .copied()
            .unwrap_or(0.0)
    }

    /// Sum of per-unit rates over a product-group selection.
    ///
    /// Applied uniformly to pooled during-period units; see
    /// `engine::metrics::compute_metrics`.
    pub fn combined_rate<'a, I>(&self, retailer: &str, product_groups: I) -> f64
    where
        I: IntoIterator<Item = &'a String>,
    {
        product_groups
            .into_iter()
            .map(|group| self.rate(retailer, group))
            .sum()
    }

    /// Iterate all configured `(retailer, product_group, rate)` entries in
    /// deterministic (sorted) order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.rates.iter().flat_map(|(retailer, groups)| {
            groups
                .iter()
                .map(move |(group, rate)| (retailer.as_str(), group.as_str(), *rate))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Number of retailers with at least one configured rate.
    pub fn retailer_count(&self) -> usize {
        self.rates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_default_to_zero() {
        let schedule = SubsidySchedule::from_entries(&[("PUBLIX CORP - RMA", "16oz Core", 0.18)]);
        assert_eq!(schedule.rate("PUBLIX CORP - RMA", "16oz Core"), 0.18);
        assert_eq!(schedule.rate("PUBLIX CORP - RMA", "32oz Core"), 0.0);
        assert_eq!(schedule.rate("BIG Y - RMA", "16oz Core"), 0.0);
    }

    #[test]
    fn combined_rate_sums_selected_groups() {
        let schedule = SubsidySchedule::from_entries(&[
            ("PUBLIX CORP - RMA", "16oz Core", 0.18),
            ("PUBLIX CORP - RMA", "32oz Core", 0.65),
            ("PUBLIX CORP - RMA", "16oz Innovation", 0.18),
        ]);
        let selection: std::collections::BTreeSet<String> =
            ["16oz Core", "32oz Core"].iter().map(|s| s.to_string()).collect();
        assert!((schedule.combined_rate("PUBLIX CORP - RMA", &selection) - 0.83).abs() < 1e-9);
    }

    #[test]
    fn builtin_table_is_nonempty_and_sorted() {
        let schedule = SubsidySchedule::builtin();
        assert!(!schedule.is_empty());
        assert!(schedule.rate("WALMART CORP - RMA", "32oz Core") > 0.0);

        let retailers: Vec<&str> = schedule.entries().map(|(r, _, _)| r).collect();
        let mut sorted = retailers.clone();
        sorted.sort();
        assert_eq!(retailers, sorted);
    }

    #[test]
    fn empty_schedule_always_zero() {
        let schedule = SubsidySchedule::empty();
        assert_eq!(schedule.rate("WALMART CORP - RMA", "32oz Core"), 0.0);
        assert_eq!(schedule.retailer_count(), 0);
    }
}
