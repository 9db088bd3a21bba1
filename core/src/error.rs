//! Error types for index construction and query resolution.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// A corpus or query record could not be read or parsed. Aborts the build.
    #[error("Malformed record in '{path}' at line {line}: {reason}")]
    CorpusLoad {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Cannot build an index from an empty corpus")]
    EmptyCorpus,

    #[error("Corpus of {documents} documents exceeds the index limit of {limit}")]
    CorpusTooLarge { documents: usize, limit: u32 },

    /// No usable snapshot at the given location.
    #[error("Index unavailable at '{path}': {reason}")]
    IndexUnavailable { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for SearchError {
    fn from(e: bincode::Error) -> Self {
        SearchError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(e: serde_json::Error) -> Self {
        SearchError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
