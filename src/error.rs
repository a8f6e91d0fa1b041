//! Failures raised while loading a trip dataset.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    /// The city key does not name one of the fixed datasets.
    #[error("no dataset for city '{0}'")]
    DatasetNotFound(String),

    /// A row's start time could not be parsed; every derived field depends on it.
    #[error("row {row}: unparsable start time '{value}'")]
    DataCorruption { row: usize, value: String },

    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}
