//! The temporal-allocation and metrics engine.
//!
//! Three pure components, composed linearly:
//!
//! - `windows`: promotion start/end dates -> symmetric pre/during/post windows
//! - `prorate`: weekly observations x window -> overlap-weighted totals
//! - `metrics`: three period totals + financial inputs -> lift/ROI bundle
//!
//! Data flows strictly forward; no component mutates another's output. All
//! functions here are synchronous, deterministic, and safe to call
//! concurrently for independent analyses.

pub mod metrics;
pub mod prorate;
pub mod windows;

pub use metrics::compute_metrics;
pub use prorate::prorate;
pub use windows::compute_windows;
