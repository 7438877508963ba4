//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - syndicated weekly sales records (`WeeklyObservation`)
//! - derived promotion windows (`PromoWindowSet`, `Period`)
//! - prorated period totals (`PeriodAggregate`)
//! - financial inputs and computed metrics (`FinancialInputs`, `MetricsBundle`)
//! - the full per-run output record (`AnalysisResult`)

pub mod types;

pub use types::*;
