//! Driver code assignment for file-based sources
//!
//! Explicit mappings win. Otherwise the code is the file stem's first
//! `_`-separated token, upper-cased: `ver_telemetry.csv` becomes `VER`.

use crate::error::SourceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tr_core::model::DriverCode;

/// File stem to driver code overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverCodeMap {
    by_stem: BTreeMap<String, String>,
}

impl DriverCodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapping(mut self, stem: impl Into<String>, code: impl Into<String>) -> Self {
        self.insert(stem, code);
        self
    }

    pub fn insert(&mut self, stem: impl Into<String>, code: impl Into<String>) {
        self.by_stem.insert(stem.into(), code.into());
    }

    pub fn len(&self) -> usize {
        self.by_stem.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_stem.is_empty()
    }

    pub fn resolve(&self, stem: &str) -> Result<DriverCode, SourceError> {
        match self.by_stem.get(stem) {
            Some(code) => {
                DriverCode::new(code).map_err(|_| SourceError::InvalidDriverCode(code.clone()))
            }
            None => code_from_stem(stem),
        }
    }

    pub fn resolve_path(&self, path: &Path) -> Result<DriverCode, SourceError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| SourceError::InvalidDriverCode(path.display().to_string()))?;
        self.resolve(stem)
    }
}

/// Code from the naming convention alone
pub fn code_from_stem(stem: &str) -> Result<DriverCode, SourceError> {
    let token = stem.split('_').next().unwrap_or(stem);
    DriverCode::new(token).map_err(|_| SourceError::InvalidDriverCode(stem.to_string()))
}
