//! Proration of weekly observations onto arbitrary day-granularity windows.
//!
//! Syndicated data is reported at weekly granularity but promotion windows are
//! arbitrary day ranges. The linear-overlap proration implemented here is the
//! standard trade-promotion convention: each reporting week contributes its
//! dollars/units in proportion to the number of its days falling inside the
//! window. This is an allocation rule, not a forecast; no smoothing or
//! seasonality adjustment is applied.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use crate::domain::{PeriodAggregate, WeeklyObservation};

/// Prorate matching observations onto `[window_start, window_end]`.
///
/// Observations are matched by exact geography and membership in
/// `product_groups`; multiple groups are pooled into a single aggregate.
/// An observation is admitted when its `week_ending` falls within
/// `[window_start, window_end + 7 days]` — the extended upper bound admits
/// weeks whose reporting date trails the window but whose underlying 7-day
/// span still overlaps it.
///
/// Accumulation follows the input order of `observations` (affects only
/// floating-point rounding reproducibility). An empty intersection is a
/// valid outcome and yields the zero aggregate.
pub fn prorate(
    observations: &[WeeklyObservation],
    retailer: &str,
    product_groups: &BTreeSet<String>,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> PeriodAggregate {
    let admit_until = window_end + Duration::days(7);

    let mut total = PeriodAggregate::default();
    for obs in observations {
        if obs.geography != retailer || !product_groups.contains(&obs.product_group) {
            continue;
        }
        if obs.week_ending < window_start || obs.week_ending > admit_until {
            continue;
        }

        let overlap_start = obs.week_start().max(window_start);
        let overlap_end = obs.week_ending.min(window_end);
        if overlap_start > overlap_end {
            continue;
        }

        let overlap_days = (overlap_end - overlap_start).num_days() + 1;
        let factor = overlap_days as f64 / 7.0;
        total.total_dollars += obs.dollars * factor;
        total.total_units += obs.units * factor;
    }

    total
}
