//! `build` and `demo` commands: sources in, artifact out

use crate::artifact::write_artifact;
use crate::config::BuildConfig;
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tr_adapters::{
    demo_grid, discover_csv_files, load_csv_files, load_sources, DemoParams, LoadReport,
};
use tr_core::source::SampleSource;
use tr_core::{assemble, Alignment, RaceData};
use tracing::{info, warn};

/// What a build produced
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub output: PathBuf,
    pub drivers: usize,
    pub skipped_sources: usize,
    pub total_frames: usize,
    pub fps: f64,
    pub alignment: Alignment,
    pub bytes: u64,
}

/// Expand directories into their CSV files. Explicit files keep the order
/// they were given in.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = discover_csv_files(input)
                .with_context(|| format!("failed to scan {}", input.display()))?;
            if found.is_empty() {
                warn!(dir = %input.display(), "No CSV files in directory");
            }
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// Build an artifact from timing exports
pub fn run_build(inputs: &[PathBuf], output: &Path, config: &BuildConfig) -> Result<BuildSummary> {
    config.validate()?;

    let files = collect_inputs(inputs)?;
    if files.is_empty() {
        bail!("no CSV files found in the given inputs");
    }
    info!(files = files.len(), "Building race data");

    let report = load_csv_files(&files, &config.driver_codes, &config.columns());
    finish(report, output, config)
}

/// Options for the synthetic race
#[derive(Debug, Clone)]
pub struct DemoRequest {
    pub drivers: usize,
    pub laps: u32,
    /// Also write the generated samples as CSV timing exports here
    pub export_csv: Option<PathBuf>,
}

/// Build an artifact from generated demo drivers
pub fn run_demo(request: &DemoRequest, output: &Path, config: &BuildConfig) -> Result<BuildSummary> {
    config.validate()?;
    if request.drivers == 0 {
        bail!("demo needs at least one driver");
    }

    let grid = demo_grid(
        request.drivers,
        DemoParams {
            laps: request.laps,
            ..DemoParams::default()
        },
    );

    if let Some(dir) = &request.export_csv {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        for source in &grid {
            let path = dir.join(format!(
                "{}_telemetry.csv",
                source.driver_code().as_str().to_lowercase()
            ));
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            source
                .write_csv(BufWriter::new(file))
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        info!(dir = %dir.display(), files = grid.len(), "Exported demo timing data");
    }

    let sources: Vec<Box<dyn SampleSource>> = grid
        .into_iter()
        .map(|s| Box::new(s) as Box<dyn SampleSource>)
        .collect();
    finish(load_sources(sources), output, config)
}

fn finish(report: LoadReport, output: &Path, config: &BuildConfig) -> Result<BuildSummary> {
    let data: RaceData =
        assemble(&report.series, &config.pipeline_options()).context("failed to build race data")?;
    let bytes = write_artifact(&data, output, config.pretty)?;

    let summary = BuildSummary {
        output: output.to_path_buf(),
        drivers: data.drivers.len(),
        skipped_sources: report.failures.len(),
        total_frames: data.total_frames(),
        fps: data.fps,
        alignment: data.alignment,
        bytes,
    };
    info!(
        output = %summary.output.display(),
        drivers = summary.drivers,
        frames = summary.total_frames,
        skipped = summary.skipped_sources,
        "Race data written"
    );
    Ok(summary)
}
