//! Period calculation: derive pre/during/post windows from promo dates.

use chrono::{Duration, NaiveDate};

use crate::domain::PromoWindowSet;

/// Derive the three analysis windows for a promotion.
///
/// The pre window is the `promo_days`-length span immediately preceding
/// `promo_start` and the post window the `promo_days`-length span immediately
/// following `promo_end`, with no gaps:
///
/// ```text
/// [pre_start ..= pre_end][promo_start ..= promo_end][post_start ..= post_end]
/// ```
///
/// Precondition: `promo_start <= promo_end`. Callers validate date order
/// before invoking; this function does not re-check it.
pub fn compute_windows(promo_start: NaiveDate, promo_end: NaiveDate) -> PromoWindowSet {
    let promo_days = (promo_end - promo_start).num_days() + 1;

    let pre_end = promo_start - Duration::days(1);
    let pre_start = pre_end - Duration::days(promo_days - 1);

    let post_start = promo_end + Duration::days(1);
    let post_end = post_start + Duration::days(promo_days - 1);

    PromoWindowSet {
        promo_start,
        promo_end,
        promo_days,
        pre_start,
        pre_end,
        post_start,
        post_end,
    }
}
