//! The saved-analyses store.
//!
//! An explicit, externally owned collection with `append`, `remove(index)`,
//! and `list()` operations. The analysis engine never reaches into this
//! store — it only produces `AnalysisResult` values that the store's owner
//! (the CLI layer) decides to retain. Entries are treated as immutable
//! history once appended.
//!
//! The store is file-backed (JSON via `io::analyses`), single-process,
//! single-writer. A missing file opens as an empty store.

use std::path::{Path, PathBuf};

use crate::domain::AnalysisResult;
use crate::error::AppError;
use crate::io::analyses::{read_analyses_json, write_analyses_json, AnalysesFile};

/// Default store file name, created in the working directory.
pub const DEFAULT_STORE_PATH: &str = "promo_analyses.json";

#[derive(Debug, Clone)]
pub struct AnalysisStore {
    path: PathBuf,
    analyses: Vec<AnalysisResult>,
}

impl AnalysisStore {
    /// Open the store at `path`; a missing file yields an empty store.
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let analyses = if path.exists() {
            read_analyses_json(path)?.analyses
        } else {
            Vec::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            analyses,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, analysis: AnalysisResult) {
        self.analyses.push(analysis);
    }

    /// Remove by zero-based index, returning the removed entry.
    pub fn remove(&mut self, index: usize) -> Result<AnalysisResult, AppError> {
        if index >= self.analyses.len() {
            return Err(AppError::input(format!(
                "No saved analysis at index {index} (store has {} entries).",
                self.analyses.len()
            )));
        }
        Ok(self.analyses.remove(index))
    }

    pub fn list(&self) -> &[AnalysisResult] {
        &self.analyses
    }

    pub fn len(&self) -> usize {
        self.analyses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }

    /// Persist the current contents back to the store file.
    pub fn save(&self) -> Result<(), AppError> {
        write_analyses_json(&self.path, &AnalysesFile::new(self.analyses.clone()))
    }
}
