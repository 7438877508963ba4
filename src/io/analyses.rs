//! Read/write the saved-analyses JSON file.
//!
//! Analyses JSON is the portable representation of the saved-analyses
//! collection: one document holding every committed `AnalysisResult`.
//! The store layer (`store::AnalysisStore`) owns append/remove semantics;
//! this module only handles serialization.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::AnalysisResult;
use crate::error::AppError;

/// On-disk schema of the saved-analyses file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysesFile {
    pub tool: String,
    pub analyses: Vec<AnalysisResult>,
}

impl AnalysesFile {
    pub fn new(analyses: Vec<AnalysisResult>) -> Self {
        Self {
            tool: "promo".to_string(),
            analyses,
        }
    }
}

/// Write the analyses JSON file.
pub fn write_analyses_json(path: &Path, file: &AnalysesFile) -> Result<(), AppError> {
    let out = File::create(path).map_err(|e| {
        AppError::input(format!("Failed to create analyses JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::input(format!("Failed to write analyses JSON: {e}")))?;

    Ok(())
}

/// Read an analyses JSON file.
pub fn read_analyses_json(path: &Path) -> Result<AnalysesFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::input(format!("Failed to open analyses JSON '{}': {e}", path.display()))
    })?;
    let parsed: AnalysesFile = serde_json::from_reader(file)
        .map_err(|e| AppError::input(format!("Invalid analyses JSON '{}': {e}", path.display())))?;
    Ok(parsed)
}
