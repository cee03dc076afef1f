//! Pipeline error type

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    #[error("invalid frame rate {0}: must be above zero and at most 1000")]
    InvalidFrameRate(f64),

    #[error("fixed-rate timeline would need {0} frames")]
    TimelineTooLong(u64),

    #[error("no driver has any samples")]
    NoDrivers,

    #[error("invalid driver code {0:?}")]
    InvalidDriverCode(String),

    #[error("malformed race data: {0}")]
    MalformedArtifact(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
