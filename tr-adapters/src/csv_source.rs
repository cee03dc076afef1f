//! CSV timing-export source
//!
//! One file per driver with a header row. Only the time, `X`, `Y` and
//! `LapNumber` columns are read; everything else in the export is ignored.
//! Bad rows are skipped and counted in a [`ParseReport`] instead of failing
//! the whole file.

use crate::error::SourceError;
use crate::time::parse_session_time;
use anyhow::Result;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tr_core::model::{DriverCode, DriverSample, DriverSeries};
use tr_core::source::SampleSource;
use tracing::{debug, warn};

/// Time headers tried in order when none is configured
pub const DEFAULT_TIME_COLUMNS: &[&str] = &["SessionTime", "Time"];

/// Header names to read from an export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSpec {
    /// Preference list; the first header present is used
    pub time: Vec<String>,
    pub x: String,
    pub y: String,
    /// Optional column, laps default to 1 without it
    pub lap: String,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            time: DEFAULT_TIME_COLUMNS.iter().map(|c| c.to_string()).collect(),
            x: "X".to_string(),
            y: "Y".to_string(),
            lap: "LapNumber".to_string(),
        }
    }
}

impl ColumnSpec {
    pub fn with_time_columns(mut self, time: Vec<String>) -> Self {
        if !time.is_empty() {
            self.time = time;
        }
        self
    }

    fn resolve(&self, headers: &StringRecord, source_name: &str) -> Result<ColumnIndex, SourceError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let missing = |column: &str| SourceError::MissingColumn {
            source_name: source_name.to_string(),
            column: column.to_string(),
        };

        let time = self
            .time
            .iter()
            .find_map(|name| find(name.as_str()))
            .ok_or_else(|| missing(self.time.join("|").as_str()))?;
        let x = find(self.x.as_str()).ok_or_else(|| missing(self.x.as_str()))?;
        let y = find(self.y.as_str()).ok_or_else(|| missing(self.y.as_str()))?;

        Ok(ColumnIndex {
            time,
            x,
            y,
            lap: find(self.lap.as_str()),
        })
    }
}

struct ColumnIndex {
    time: usize,
    x: usize,
    y: usize,
    lap: Option<usize>,
}

/// Row-level data quality counters for one parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    pub rows: usize,
    pub kept: usize,
    pub skipped_rows: usize,
    /// Rows whose time cell could not be parsed and became 0.0
    pub time_fallbacks: usize,
    /// Rows whose lap was missing or invalid and became 1
    pub lap_defaults: usize,
}

/// Parse an export from any reader. Samples come back in row order.
pub fn parse_samples<R: Read>(
    reader: R,
    columns: &ColumnSpec,
    source_name: &str,
) -> Result<(Vec<DriverSample>, ParseReport), SourceError> {
    let csv_error = |source| SourceError::Csv {
        source_name: source_name.to_string(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers().map_err(csv_error)?.clone();
    let index = columns.resolve(&headers, source_name)?;

    let mut report = ParseReport::default();
    let mut samples = Vec::new();

    for record in rdr.records() {
        report.rows += 1;
        let record = match record {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(csv_error(e)),
            Err(e) => {
                debug!(source = source_name, error = %e, "Skipping unreadable row");
                report.skipped_rows += 1;
                continue;
            }
        };

        match parse_row(&record, &index, &mut report) {
            Some(sample) => samples.push(sample),
            None => report.skipped_rows += 1,
        }
    }

    report.kept = samples.len();
    Ok((samples, report))
}

fn parse_row(record: &StringRecord, index: &ColumnIndex, report: &mut ParseReport) -> Option<DriverSample> {
    let time_cell = cell(record, index.time)?;
    let x = parse_coordinate(record, index.x)?;
    let y = parse_coordinate(record, index.y)?;

    let time = parse_session_time(time_cell).unwrap_or_else(|| {
        report.time_fallbacks += 1;
        0.0
    });
    let lap = index
        .lap
        .and_then(|i| cell(record, i))
        .and_then(parse_lap)
        .unwrap_or_else(|| {
            report.lap_defaults += 1;
            1
        });

    Some(DriverSample::new(time, x, y, lap))
}

fn cell(record: &StringRecord, i: usize) -> Option<&str> {
    record.get(i).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_coordinate(record: &StringRecord, i: usize) -> Option<f64> {
    cell(record, i)?.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Laps are written as integers or floats (`"3.0"`); anything below 1 is
/// treated as missing
fn parse_lap(raw: &str) -> Option<u32> {
    let value: f64 = raw.parse().ok()?;
    (value.is_finite() && value >= 1.0).then(|| value.min(u32::MAX as f64) as u32)
}

/// A driver's timing export on disk
pub struct CsvSource {
    path: PathBuf,
    name: String,
    code: DriverCode,
    columns: ColumnSpec,
    last_report: Option<ParseReport>,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>, code: DriverCode, columns: ColumnSpec) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            name,
            code,
            columns,
            last_report: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Counters from the most recent `read_series` call
    pub fn last_report(&self) -> Option<ParseReport> {
        self.last_report
    }
}

impl SampleSource for CsvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn driver_code(&self) -> &DriverCode {
        &self.code
    }

    fn read_series(&mut self) -> Result<DriverSeries> {
        let file = File::open(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let (samples, report) = parse_samples(BufReader::new(file), &self.columns, &self.name)?;
        self.last_report = Some(report);

        debug!(
            source = %self.name,
            driver = %self.code,
            rows = report.rows,
            kept = report.kept,
            skipped = report.skipped_rows,
            "Parsed timing export"
        );
        if report.time_fallbacks > 0 {
            warn!(
                source = %self.name,
                rows = report.time_fallbacks,
                "Unparseable time cells treated as 0.0"
            );
        }
        if samples.is_empty() {
            return Err(SourceError::Empty(self.name.clone()).into());
        }

        Ok(DriverSeries::new(self.code.clone(), samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> (Vec<DriverSample>, ParseReport) {
        parse_samples(csv.as_bytes(), &ColumnSpec::default(), "test.csv").unwrap()
    }

    #[test]
    fn test_parses_timedelta_rows() {
        let (samples, report) = parse(
            "SessionTime,X,Y,LapNumber\n\
             0 days 00:56:26.961,-3500.5,1200,1\n\
             0 days 00:56:27.161,-3480.0,1210.25,1\n",
        );
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].x, -3500.5);
        assert_eq!(samples[1].y, 1210.25);
        assert!((samples[0].time - 3386.961).abs() < 1e-9);
        assert_eq!(report.rows, 2);
        assert_eq!(report.kept, 2);
        assert_eq!(report.skipped_rows, 0);
    }

    #[test]
    fn test_prefers_session_time_over_time() {
        let (samples, _) = parse("Time,SessionTime,X,Y\n00:00:01,00:10:00,1,2\n");
        assert_eq!(samples[0].time, 600.0);
    }

    #[test]
    fn test_falls_back_to_time_column() {
        let (samples, _) = parse("Time,X,Y\n12.5,1,2\n");
        assert_eq!(samples[0].time, 12.5);
    }

    #[test]
    fn test_custom_time_column() {
        let columns = ColumnSpec::default().with_time_columns(vec!["Date".into()]);
        let (samples, _) = parse_samples("Date,X,Y\n3,1,2\n".as_bytes(), &columns, "c.csv").unwrap();
        assert_eq!(samples[0].time, 3.0);
    }

    #[test]
    fn test_missing_required_column() {
        let err = parse_samples("SessionTime,X\n1,2\n".as_bytes(), &ColumnSpec::default(), "a.csv")
            .unwrap_err();
        match err {
            SourceError::MissingColumn { source_name, column } => {
                assert_eq!(source_name, "a.csv");
                assert_eq!(column, "Y");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_rows_are_skipped() {
        let (samples, report) = parse(
            "SessionTime,X,Y\n\
             1,10,10\n\
             ,11,11\n\
             2,abc,12\n\
             3,13,\n\
             4,NaN,14\n\
             5,15,15\n",
        );
        let times: Vec<f64> = samples.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![1.0, 5.0]);
        assert_eq!(report.rows, 6);
        assert_eq!(report.skipped_rows, 4);
    }

    #[test]
    fn test_zero_coordinates_are_kept() {
        let (samples, _) = parse("SessionTime,X,Y\n1,0,0\n");
        assert_eq!(samples.len(), 1);
        assert_eq!((samples[0].x, samples[0].y), (0.0, 0.0));
    }

    #[test]
    fn test_unparseable_time_becomes_zero() {
        let (samples, report) = parse("SessionTime,X,Y\nsoon,1,2\n");
        assert_eq!(samples[0].time, 0.0);
        assert_eq!(report.time_fallbacks, 1);
    }

    #[test]
    fn test_overflowing_time_becomes_zero() {
        let (samples, report) = parse("SessionTime,X,Y\n1e307:00,1,2\n2,3,4\n");
        assert_eq!(samples[0].time, 0.0);
        assert_eq!(samples[1].time, 2.0);
        assert_eq!(report.time_fallbacks, 1);
    }

    #[test]
    fn test_lap_defaults_and_float_laps() {
        let (samples, report) = parse(
            "SessionTime,X,Y,LapNumber\n\
             1,1,1,3.0\n\
             2,1,1,\n\
             3,1,1,0\n\
             4,1,1,x\n\
             5,1,1,12\n",
        );
        let laps: Vec<u32> = samples.iter().map(|s| s.lap).collect();
        assert_eq!(laps, vec![3, 1, 1, 1, 12]);
        assert_eq!(report.lap_defaults, 3);
    }

    #[test]
    fn test_without_lap_column_every_lap_is_one() {
        let (samples, _) = parse("SessionTime,X,Y\n1,1,1\n2,2,2\n");
        assert!(samples.iter().all(|s| s.lap == 1));
    }

    #[test]
    fn test_short_rows_and_extra_columns() {
        let (samples, report) = parse(
            "SessionTime,Speed,X,Y,Brake\n\
             1,300,5,6,False\n\
             2,301\n",
        );
        assert_eq!(samples.len(), 1);
        assert_eq!((samples[0].x, samples[0].y), (5.0, 6.0));
        assert_eq!(report.skipped_rows, 1);
    }

    #[test]
    fn test_row_order_is_preserved() {
        let (samples, _) = parse("SessionTime,X,Y\n3,3,3\n1,1,1\n2,2,2\n");
        let times: Vec<f64> = samples.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![3.0, 1.0, 2.0]);
    }
}
