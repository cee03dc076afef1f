//! Telemetry sample sources for TrackReplay

pub mod codes;
pub mod csv_source;
pub mod demo;
pub mod error;
pub mod loader;
pub mod time;

pub use codes::DriverCodeMap;
pub use csv_source::{ColumnSpec, CsvSource, ParseReport};
pub use demo::{demo_grid, DemoParams, DemoSource};
pub use error::SourceError;
pub use loader::{discover_csv_files, load_csv_files, load_sources, LoadReport, SourceFailure};
