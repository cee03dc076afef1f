//! Build configuration
//!
//! Read from an optional JSON file, then overridden field by field from the
//! command line. Every field has a default, so `{}` is a valid file.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tr_adapters::csv_source::DEFAULT_TIME_COLUMNS;
use tr_adapters::{ColumnSpec, DriverCodeMap};
use tr_core::assemble::DEFAULT_FPS;
use tr_core::timeline::validate_frame_rate;
use tr_core::{Alignment, NormalizationScope, PipelineOptions};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Output frame rate
    pub fps: f64,
    pub alignment: Alignment,
    pub scope: NormalizationScope,
    /// Time headers to try, in order
    pub time_columns: Vec<String>,
    /// File stem to driver code overrides
    pub driver_codes: DriverCodeMap,
    /// Pretty-print the JSON artifact
    pub pretty: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            alignment: Alignment::default(),
            scope: NormalizationScope::default(),
            time_columns: DEFAULT_TIME_COLUMNS.iter().map(|c| c.to_string()).collect(),
            driver_codes: DriverCodeMap::default(),
            pretty: true,
        }
    }
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub fps: Option<f64>,
    pub alignment: Option<Alignment>,
    pub scope: Option<NormalizationScope>,
    pub time_columns: Vec<String>,
    pub driver_codes: Vec<(String, String)>,
    pub compact: bool,
}

impl BuildConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    /// Load `path` when given, defaults otherwise, then apply `overrides`
    /// and validate
    pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(fps) = overrides.fps {
            self.fps = fps;
        }
        if let Some(alignment) = overrides.alignment {
            self.alignment = alignment;
        }
        if let Some(scope) = overrides.scope {
            self.scope = scope;
        }
        if !overrides.time_columns.is_empty() {
            self.time_columns = overrides.time_columns.clone();
        }
        for (stem, code) in &overrides.driver_codes {
            self.driver_codes.insert(stem.clone(), code.clone());
        }
        if overrides.compact {
            self.pretty = false;
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_frame_rate(self.fps)?;
        if self.time_columns.is_empty() {
            bail!("time_columns must name at least one column");
        }
        if self.time_columns.iter().any(|c| c.trim().is_empty()) {
            bail!("time_columns must not contain empty names");
        }
        Ok(())
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            fps: self.fps,
            alignment: self.alignment,
            scope: self.scope,
        }
    }

    pub fn columns(&self) -> ColumnSpec {
        ColumnSpec::default().with_time_columns(self.time_columns.clone())
    }
}

/// Parse a `STEM=CODE` command-line mapping
pub fn parse_code_mapping(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((stem, code)) if !stem.trim().is_empty() && !code.trim().is_empty() => {
            Ok((stem.trim().to_string(), code.trim().to_string()))
        }
        _ => Err(format!("expected STEM=CODE, got {raw:?}")),
    }
}
