//! Per-source error type
//!
//! Every variant describes a failure of one source only. The loader records
//! it and carries on with the remaining sources.

use std::path::PathBuf;
use thiserror::Error;
use tr_core::model::DriverCode;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{source_name}: malformed CSV")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("{source_name}: missing required column {column:?}")]
    MissingColumn { source_name: String, column: String },

    #[error("cannot derive a driver code from {0:?}")]
    InvalidDriverCode(String),

    #[error("driver {code} is already provided by {first}")]
    DuplicateDriver { code: DriverCode, first: String },

    #[error("{0}: no usable samples")]
    Empty(String),
}
