//! Error types for Arbormap

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArborError {
    // Data load errors
    #[error("Failed to load dataset from {path}: {reason}")]
    DataLoad { path: PathBuf, reason: String },

    #[error("CSV error at line {line}: {reason}")]
    Csv { line: u64, reason: String },

    // Point of interest errors
    #[error("Unknown point of interest: {id}")]
    UnknownPoi { id: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for ArborError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        ArborError::Csv { line, reason: err.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, ArborError>;
