//! TrackReplay
//!
//! Turns per-driver timing exports into a time-aligned race data artifact
//! and plays it back in the terminal.

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tr_cli::artifact::read_artifact;
use tr_cli::build::{run_build, run_demo, BuildSummary, DemoRequest};
use tr_cli::config::{parse_code_mapping, BuildConfig, Overrides};
use tr_cli::inspect::{
    render_snapshot, render_summary, snapshot, snapshot_at, summarize, ArtifactSummary, Snapshot,
};
use tr_cli::play::{run_playback, PlayOutcome};
use tr_core::{Alignment, NormalizationScope, Playback};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "trackreplay", author, version, about = "Race replay data builder and player", long_about = None)]
struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a race data artifact from CSV timing exports
    Build(BuildArgs),
    /// Build an artifact from generated demo drivers
    Demo(DemoArgs),
    /// Summarize an artifact, optionally with the running order at a time
    Inspect(InspectArgs),
    /// Play an artifact back in real time
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct PipelineArgs {
    /// JSON build configuration; flags below override it
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Output frame rate, at most 1000
    #[arg(long)]
    fps: Option<f64>,

    /// How frames are placed on the time axis
    #[arg(long, value_enum)]
    alignment: Option<AlignmentOpt>,

    /// Normalize each driver separately or against one shared box
    #[arg(long, value_enum)]
    scope: Option<ScopeOpt>,

    /// Time column to read, repeat for a preference list
    #[arg(long = "time-column")]
    time_columns: Vec<String>,

    /// Map a file stem to a driver code, e.g. `car_1=VER`
    #[arg(long = "driver-code", value_parser = parse_code_mapping)]
    driver_codes: Vec<(String, String)>,

    /// Write single-line JSON
    #[arg(long, action = ArgAction::SetTrue)]
    compact: bool,
}

impl PipelineArgs {
    fn resolve(&self) -> Result<BuildConfig> {
        let overrides = Overrides {
            fps: self.fps,
            alignment: self.alignment.map(Into::into),
            scope: self.scope.map(Into::into),
            time_columns: self.time_columns.clone(),
            driver_codes: self.driver_codes.clone(),
            compact: self.compact,
        };
        BuildConfig::resolve(self.config.as_deref(), &overrides)
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum AlignmentOpt {
    Union,
    FixedRate,
    LegacyStride,
}

impl From<AlignmentOpt> for Alignment {
    fn from(opt: AlignmentOpt) -> Self {
        match opt {
            AlignmentOpt::Union => Alignment::Union,
            AlignmentOpt::FixedRate => Alignment::FixedRate,
            AlignmentOpt::LegacyStride => Alignment::LegacyStride,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ScopeOpt {
    PerDriver,
    Shared,
}

impl From<ScopeOpt> for NormalizationScope {
    fn from(opt: ScopeOpt) -> Self {
        match opt {
            ScopeOpt::PerDriver => NormalizationScope::PerDriver,
            ScopeOpt::Shared => NormalizationScope::Shared,
        }
    }
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// CSV files or directories of CSV files, one file per driver
    #[arg(required = true, value_hint = ValueHint::AnyPath)]
    inputs: Vec<PathBuf>,

    /// Artifact path; a `.zst` extension compresses it
    #[arg(short, long, default_value = "race_data.json", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    #[command(flatten)]
    pipeline: PipelineArgs,
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Number of drivers (at most the registry grid)
    #[arg(long, default_value_t = 6)]
    drivers: usize,

    #[arg(long, default_value_t = 3)]
    laps: u32,

    /// Also write the generated samples as CSV exports into this directory
    #[arg(long, value_hint = ValueHint::DirPath)]
    export_csv: Option<PathBuf>,

    #[arg(short, long, default_value = "demo_race.json", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    #[command(flatten)]
    pipeline: PipelineArgs,
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[arg(value_hint = ValueHint::FilePath)]
    artifact: PathBuf,

    /// Show the running order at this playback time (seconds)
    #[arg(long)]
    at: Option<f64>,

    /// Leaderboard rows to show
    #[arg(long, default_value_t = 20)]
    top: usize,

    /// Print JSON instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[arg(value_hint = ValueHint::FilePath)]
    artifact: PathBuf,

    /// Playback speed multiplier (0.1 to 16)
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Start time in seconds
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Leaderboard rows to show per frame
    #[arg(long, default_value_t = 3)]
    top: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Build(args) => {
            let config = args.pipeline.resolve()?;
            print_summary(&run_build(&args.inputs, &args.output, &config)?);
        }
        Command::Demo(args) => {
            let config = args.pipeline.resolve()?;
            let request = DemoRequest {
                drivers: args.drivers,
                laps: args.laps,
                export_csv: args.export_csv,
            };
            print_summary(&run_demo(&request, &args.output, &config)?);
        }
        Command::Inspect(args) => inspect(args)?,
        Command::Play(args) => play(args).await?,
    }

    Ok(())
}

fn print_summary(summary: &BuildSummary) {
    println!(
        "{}: {} drivers, {} frames at {} fps ({:?}), {} bytes",
        summary.output.display(),
        summary.drivers,
        summary.total_frames,
        summary.fps,
        summary.alignment,
        summary.bytes
    );
    if summary.skipped_sources > 0 {
        println!("{} source(s) skipped, see log for details", summary.skipped_sources);
    }
}

#[derive(Serialize)]
struct InspectReport<'a> {
    summary: &'a ArtifactSummary,
    snapshot: Option<&'a Snapshot>,
}

fn inspect(args: InspectArgs) -> Result<()> {
    let data = read_artifact(&args.artifact)?;
    let summary = summarize(&data);
    let mut playback = Playback::new(data);
    let snap = args.at.and_then(|t| snapshot_at(&mut playback, t));

    if args.json {
        let report = InspectReport {
            summary: &summary,
            snapshot: snap.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render_summary(&summary));
        if let Some(snap) = snap {
            println!("{}", render_snapshot(&snap, args.top));
        }
    }
    Ok(())
}

async fn play(args: PlayArgs) -> Result<()> {
    let data = read_artifact(&args.artifact)?;
    let mut playback = Playback::new(data);
    playback.set_speed(args.speed);
    playback.seek(args.start);

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping playback");
            ctrl_c.cancel();
        }
    });

    let top = args.top;
    let outcome = run_playback(&mut playback, cancel, |p| {
        if let Some(snap) = snapshot(p) {
            println!("{}", render_snapshot(&snap, top));
        }
    })
    .await;

    if outcome == PlayOutcome::Finished {
        info!(frames = playback.total_frames(), "Playback finished");
    }
    Ok(())
}
