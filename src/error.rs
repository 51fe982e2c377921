use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("scan of table '{table}' failed: {message}")]
    Store { table: String, message: String },
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse '{}': {source}", path.display())]
    Parse {
        source: serde_json::Error,
        path: PathBuf,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("record is missing attribute '{0}'")]
    MissingField(&'static str),
    #[error("attribute '{field}' should be tagged {expected}, found {found}")]
    WrongTag {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("attribute '{field}' is not a valid number: '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("attribute '{field}' is outside the representable time range: {seconds}")]
    TimestampOutOfRange { field: &'static str, seconds: i64 },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("no position records to plot")]
    EmptyInput,
    #[error("failed to encode map data: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to export '{}': {source}", path.display())]
    Export { source: csv::Error, path: PathBuf },
}

pub type PipelineResult<T> = Result<T, PipelineError>;
