//! Source discovery and loading
//!
//! Sources are read one after another in discovery order. A failing source is
//! recorded in the [`LoadReport`] and the rest still load.

use crate::codes::DriverCodeMap;
use crate::csv_source::{ColumnSpec, CsvSource};
use crate::error::SourceError;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tr_core::model::{DriverCode, DriverSeries};
use tr_core::source::SampleSource;
use tracing::{debug, info, warn};

/// A source that contributed no driver
pub struct SourceFailure {
    pub source: String,
    pub error: anyhow::Error,
}

impl fmt::Debug for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:#}", self.source, self.error)
    }
}

#[derive(Debug, Default)]
pub struct LoadReport {
    /// Loaded drivers, in discovery order
    pub series: Vec<DriverSeries>,
    pub failures: Vec<SourceFailure>,
}

impl LoadReport {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn driver_codes(&self) -> Vec<&DriverCode> {
        self.series.iter().map(|s| s.code()).collect()
    }

    fn fail(&mut self, source: String, error: anyhow::Error) {
        warn!(source = %source, error = %format!("{error:#}"), "Source skipped");
        self.failures.push(SourceFailure { source, error });
    }
}

/// Read every source. A code already loaded by an earlier source makes the
/// later one fail with [`SourceError::DuplicateDriver`].
pub fn load_sources<I>(sources: I) -> LoadReport
where
    I: IntoIterator<Item = Box<dyn SampleSource>>,
{
    let mut report = LoadReport::default();
    load_into(&mut report, sources);
    report
}

fn load_into<I>(report: &mut LoadReport, sources: I)
where
    I: IntoIterator<Item = Box<dyn SampleSource>>,
{
    let mut seen: HashMap<DriverCode, String> = HashMap::new();

    for mut source in sources {
        let name = source.name().to_string();
        let code = source.driver_code().clone();

        if let Some(first) = seen.get(&code) {
            let err = SourceError::DuplicateDriver {
                code,
                first: first.clone(),
            };
            report.fail(name, err.into());
            continue;
        }

        match source.read_series() {
            Ok(series) => {
                debug!(source = %name, driver = %code, samples = series.len(), "Loaded source");
                seen.insert(code, name);
                report.series.push(series);
            }
            Err(e) => report.fail(name, e),
        }
    }

    info!(
        loaded = report.series.len(),
        failed = report.failures.len(),
        "Sources loaded"
    );
}

/// `*.csv` files directly inside `dir`, sorted by path
pub fn discover_csv_files(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let io_error = |source| SourceError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    debug!(dir = %dir.display(), files = files.len(), "Discovered timing exports");
    Ok(files)
}

/// Resolve driver codes for `paths` and load them as CSV sources. Files whose
/// code cannot be resolved are reported alongside read failures.
pub fn load_csv_files(paths: &[PathBuf], codes: &DriverCodeMap, columns: &ColumnSpec) -> LoadReport {
    let mut report = LoadReport::default();
    let mut sources: Vec<Box<dyn SampleSource>> = Vec::with_capacity(paths.len());

    for path in paths {
        match codes.resolve_path(path) {
            Ok(code) => sources.push(Box::new(CsvSource::new(path.clone(), code, columns.clone()))),
            Err(e) => report.fail(path.display().to_string(), e.into()),
        }
    }

    load_into(&mut report, sources);
    report
}
