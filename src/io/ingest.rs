//! CSV ingest and normalization for weekly syndicated sales data.
//!
//! This module turns a weekly consumption export into a clean, ordered
//! collection of `WeeklyObservation`s that are safe to prorate.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (input order is preserved)
//! - **Separation of concerns**: no window/metrics logic here

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::WeeklyObservation;
use crate::error::AppError;

/// Summary stats about the observations actually loaded.
#[derive(Debug, Clone)]
pub struct DatasetStats {
    pub n_observations: usize,
    pub first_week_ending: NaiveDate,
    pub last_week_ending: NaiveDate,
    pub n_retailers: usize,
    pub n_product_groups: usize,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: observations + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub observations: Vec<WeeklyObservation>,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl IngestedData {
    /// Sorted distinct retailer names present in the data.
    pub fn retailers(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.observations.iter().map(|o| o.geography.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Sorted distinct product-group names present in the data.
    pub fn product_groups(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .observations
            .iter()
            .map(|o| o.product_group.as_str())
            .collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Sorted distinct `(retailer, product_group)` pairs present in the data.
    pub fn retailer_group_pairs(&self) -> Vec<(String, String)> {
        let set: BTreeSet<(&str, &str)> = self
            .observations
            .iter()
            .map(|o| (o.geography.as_str(), o.product_group.as_str()))
            .collect();
        set.into_iter()
            .map(|(r, g)| (r.to_string(), g.to_string()))
            .collect()
    }
}

/// Load and normalize a weekly sales CSV.
pub fn load_weekly_data(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(obs) => observations.push(obs),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = observations.len();
    let stats = compute_stats(&observations)
        .ok_or_else(|| AppError::data("No valid rows remain after validation."))?;

    Ok(IngestedData {
        observations,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿GEOGRAPHY"). If we don't strip it, schema validation
    // will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for name in ["geography", "product group", "week ending", "dollars", "units"] {
        if !header_map.contains_key(name) {
            return Err(AppError::input(format!("Missing required column: `{name}`")));
        }
    }
    Ok(())
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<WeeklyObservation, String> {
    let geography = get_required(record, header_map, "geography")?.to_string();
    let product_group = get_required(record, header_map, "product group")?.to_string();
    let week_ending = parse_date(get_required(record, header_map, "week ending")?)?;
    let dollars = parse_amount(get_required(record, header_map, "dollars")?, "dollars")?;
    let units = parse_amount(get_required(record, header_map, "units")?, "units")?;

    Ok(WeeklyObservation {
        geography,
        product_group,
        week_ending,
        dollars,
        units,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // We recommend ISO dates (`YYYY-MM-DD`), but syndicated exports commonly
    // use US `MM/DD/YYYY`. We accept a small set of common formats to reduce
    // friction while keeping parsing deterministic.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%m/%d/%y"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, MM/DD/YYYY, YYYY/MM/DD, MM/DD/YY."
    ))
}

fn parse_amount(s: &str, name: &str) -> Result<f64, String> {
    // Exports often carry currency formatting ("$1,234.50"); strip it before
    // parsing.
    let cleaned: String = s.chars().filter(|c| *c != '$' && *c != ',').collect();
    let v = cleaned
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{name}` value '{s}'."))?;
    if !v.is_finite() {
        return Err(format!("Non-finite `{name}` value '{s}'."));
    }
    if v < 0.0 {
        return Err(format!("Negative `{name}` value '{s}' (must be >= 0)."));
    }
    Ok(v)
}

fn compute_stats(observations: &[WeeklyObservation]) -> Option<DatasetStats> {
    let first_week_ending = observations.iter().map(|o| o.week_ending).min()?;
    let last_week_ending = observations.iter().map(|o| o.week_ending).max()?;

    let retailers: BTreeSet<&str> = observations.iter().map(|o| o.geography.as_str()).collect();
    let groups: BTreeSet<&str> = observations.iter().map(|o| o.product_group.as_str()).collect();

    Some(DatasetStats {
        n_observations: observations.len(),
        first_week_ending,
        last_week_ending,
        n_retailers: retailers.len(),
        n_product_groups: groups.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
        assert_eq!(parse_date("2024-06-16").unwrap(), expected);
        assert_eq!(parse_date("06/16/2024").unwrap(), expected);
        assert_eq!(parse_date("2024/06/16").unwrap(), expected);
        assert!(parse_date("16.06.2024").is_err());
    }

    #[test]
    fn parse_amount_strips_currency_formatting() {
        assert_eq!(parse_amount("$1,234.50", "dollars").unwrap(), 1234.5);
        assert_eq!(parse_amount("700", "dollars").unwrap(), 700.0);
        assert!(parse_amount("-5", "units").is_err());
        assert!(parse_amount("n/a", "units").is_err());
    }

    #[test]
    fn header_normalization_strips_bom_and_case() {
        assert_eq!(normalize_header_name("\u{feff}GEOGRAPHY"), "geography");
        assert_eq!(normalize_header_name("  Product Group "), "product group");
        assert_eq!(normalize_header_name("Week Ending"), "week ending");
    }

    #[test]
    fn parse_row_builds_observation() {
        let headers = StringRecord::from(vec!["GEOGRAPHY", "Product Group", "Week Ending", "Dollars", "Units"]);
        let header_map = build_header_map(&headers);
        let record = StringRecord::from(vec![
            "KROGER CORP - RMA",
            "16oz Core",
            "2024-06-16",
            "$700.00",
            "70",
        ]);

        let obs = parse_row(&record, &header_map).unwrap();
        assert_eq!(obs.geography, "KROGER CORP - RMA");
        assert_eq!(obs.product_group, "16oz Core");
        assert_eq!(obs.week_ending, NaiveDate::from_ymd_opt(2024, 6, 16).unwrap());
        assert_eq!(obs.dollars, 700.0);
        assert_eq!(obs.units, 70.0);
    }

    #[test]
    fn distinct_pairs_are_sorted() {
        let obs = |geo: &str, group: &str| WeeklyObservation {
            geography: geo.to_string(),
            product_group: group.to_string(),
            week_ending: NaiveDate::from_ymd_opt(2024, 6, 16).unwrap(),
            dollars: 1.0,
            units: 1.0,
        };
        let data = IngestedData {
            observations: vec![
                obs("WALMART CORP - RMA", "32oz Core"),
                obs("BIG Y - RMA", "16oz Core"),
                obs("WALMART CORP - RMA", "16oz Core"),
                obs("BIG Y - RMA", "16oz Core"),
            ],
            stats: DatasetStats {
                n_observations: 4,
                first_week_ending: NaiveDate::from_ymd_opt(2024, 6, 16).unwrap(),
                last_week_ending: NaiveDate::from_ymd_opt(2024, 6, 16).unwrap(),
                n_retailers: 2,
                n_product_groups: 2,
            },
            row_errors: Vec::new(),
            rows_read: 4,
            rows_used: 4,
        };

        assert_eq!(data.retailers(), vec!["BIG Y - RMA", "WALMART CORP - RMA"]);
        assert_eq!(
            data.retailer_group_pairs(),
            vec![
                ("BIG Y - RMA".to_string(), "16oz Core".to_string()),
                ("WALMART CORP - RMA".to_string(), "16oz Core".to_string()),
                ("WALMART CORP - RMA".to_string(), "32oz Core".to_string()),
            ]
        );
    }
}
