//! Loading timing exports from a directory

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tr_adapters::{
    demo_grid, discover_csv_files, load_csv_files, ColumnSpec, CsvSource, DemoParams,
    DriverCodeMap, SourceError,
};
use tr_core::model::DriverCode;
use tr_core::source::SampleSource;

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn test_discovery_is_sorted_and_filters_extensions() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "ver_telemetry.csv", "SessionTime,X,Y\n1,1,1\n");
    write(dir.path(), "ALO_telemetry.CSV", "SessionTime,X,Y\n1,1,1\n");
    write(dir.path(), "notes.txt", "not an export");
    fs::create_dir(dir.path().join("nested.csv")).unwrap();

    let files = discover_csv_files(dir.path()).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["ALO_telemetry.CSV", "ver_telemetry.csv"]);
}

#[test]
fn test_missing_directory_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = discover_csv_files(&dir.path().join("absent")).unwrap_err();
    assert!(matches!(err, SourceError::Io { .. }));
}

#[test]
fn test_directory_load_reports_bad_files_and_keeps_good_ones() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "ham_telemetry.csv",
        "SessionTime,X,Y,LapNumber\n0 days 00:56:26.961,10,20,1\n0 days 00:56:27.161,11,21,1\n",
    );
    write(dir.path(), "lec_telemetry.csv", "SessionTime,X\n1,1\n");
    write(dir.path(), "nor_telemetry.csv", "SessionTime,X,Y\n,1,1\n");
    write(dir.path(), "ver_telemetry.csv", "Time,X,Y\n5,1,1\n6,2,2\n");

    let files = discover_csv_files(dir.path()).unwrap();
    let report = load_csv_files(&files, &DriverCodeMap::new(), &ColumnSpec::default());

    let codes: Vec<&str> = report.series.iter().map(|s| s.code().as_str()).collect();
    assert_eq!(codes, vec!["HAM", "VER"]);

    let failed: Vec<&str> = report.failures.iter().map(|f| f.source.as_str()).collect();
    assert_eq!(failed, vec!["lec_telemetry.csv", "nor_telemetry.csv"]);
    assert!(matches!(
        report.failures[0].error.downcast_ref::<SourceError>(),
        Some(SourceError::MissingColumn { .. })
    ));
    assert!(matches!(
        report.failures[1].error.downcast_ref::<SourceError>(),
        Some(SourceError::Empty(_))
    ));
}

#[test]
fn test_explicit_codes_and_duplicates() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "car_1.csv", "SessionTime,X,Y\n1,1,1\n");
    write(dir.path(), "ver_backup.csv", "SessionTime,X,Y\n1,1,1\n");

    let files = discover_csv_files(dir.path()).unwrap();
    let codes = DriverCodeMap::new().with_mapping("car_1", "ver");
    let report = load_csv_files(&files, &codes, &ColumnSpec::default());

    assert_eq!(report.series.len(), 1);
    assert_eq!(report.series[0].code().as_str(), "VER");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source, "ver_backup.csv");
    assert!(matches!(
        report.failures[0].error.downcast_ref::<SourceError>(),
        Some(SourceError::DuplicateDriver { .. })
    ));
}

#[test]
fn test_unresolvable_code_is_reported() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "_anonymous.csv", "SessionTime,X,Y\n1,1,1\n");

    let files = discover_csv_files(dir.path()).unwrap();
    let report = load_csv_files(&files, &DriverCodeMap::new(), &ColumnSpec::default());
    assert!(report.is_empty());
    assert!(matches!(
        report.failures[0].error.downcast_ref::<SourceError>(),
        Some(SourceError::InvalidDriverCode(_))
    ));
}

#[test]
fn test_csv_source_sorts_out_of_order_rows_and_records_report() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "per.csv",
        "SessionTime,X,Y,LapNumber\n3,3,3,1\n1,1,1,1\nbad,2,2,x\n",
    );

    let mut source = CsvSource::new(
        dir.path().join("per.csv"),
        DriverCode::new("PER").unwrap(),
        ColumnSpec::default(),
    );
    assert!(source.last_report().is_none());

    let series = source.read_series().unwrap();
    let times: Vec<f64> = series.samples().iter().map(|s| s.time).collect();
    assert_eq!(times, vec![0.0, 1.0, 3.0]);

    let report = source.last_report().unwrap();
    assert_eq!(report.rows, 3);
    assert_eq!(report.time_fallbacks, 1);
    assert_eq!(report.lap_defaults, 1);
}

#[test]
fn test_demo_exports_load_like_real_ones() {
    let dir = TempDir::new().unwrap();
    let params = DemoParams {
        laps: 1,
        lap_time: 30.0,
        ..DemoParams::default()
    };
    for source in demo_grid(4, params) {
        let name = format!("{}_demo.csv", source.driver_code().as_str().to_lowercase());
        let file = fs::File::create(dir.path().join(name)).unwrap();
        source.write_csv(file).unwrap();
    }

    let files = discover_csv_files(dir.path()).unwrap();
    let report = load_csv_files(&files, &DriverCodeMap::new(), &ColumnSpec::default());
    assert!(report.failures.is_empty());

    let codes: Vec<&str> = report.series.iter().map(|s| s.code().as_str()).collect();
    assert_eq!(codes, vec!["LEC", "PER", "SAI", "VER"]);
}
