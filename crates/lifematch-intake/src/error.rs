//! Intake errors.

use lifematch_core::models::StatusParseError;
use lifematch_core::registry::RegistryError;
use thiserror::Error;

/// Errors raised while ingesting external records or advisor output.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Table has no header row")]
    EmptyTable,

    #[error("Line {line}: missing column {column}")]
    MissingColumn { line: usize, column: String },

    #[error("Line {line}: invalid number in column {column}: {value:?}")]
    InvalidNumber {
        line: usize,
        column: String,
        value: String,
    },

    #[error("Line {line}: invalid date in column {column}: {value:?}")]
    InvalidDate {
        line: usize,
        column: String,
        value: String,
    },

    #[error("Line {line}: {source}")]
    InvalidStatus {
        line: usize,
        #[source]
        source: StatusParseError,
    },

    #[error("Invalid advisor output: {0}")]
    InvalidFormat(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

pub type IntakeResult<T> = Result<T, IntakeError>;
