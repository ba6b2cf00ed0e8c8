//! Pipeline error types.

use std::path::PathBuf;

use enrich_ingest::IngestError;
use enrich_model::ModelError;
use thiserror::Error;

/// Invalid pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--{flag} must not be empty")]
    Empty { flag: &'static str },

    #[error("--max-attempts must be at least 1")]
    ZeroAttempts,

    #[error("--batch-lines must be at least 1")]
    ZeroBatchLines,
}

/// Failure of one unit of work (one input file). The engine may retry it.
#[derive(Debug, Error)]
pub enum PartitionError {
    #[error(transparent)]
    Source(#[from] IngestError),

    #[error("malformed JSON record at {path}:{line}: {message}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("record at {path}:{line} is not a JSON object")]
    NotAnObject { path: PathBuf, line: usize },

    #[error("failed to serialize record from {path}:{line}: {source}")]
    Serialize {
        path: PathBuf,
        line: usize,
        #[source]
        source: ModelError,
    },

    #[error("failed to write partition output {path}: {source}")]
    PartWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal pipeline errors; any of these aborts the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to load reference data from {location}: {source}")]
    Reference {
        location: String,
        #[source]
        source: IngestError,
    },

    #[error("failed to resolve input pattern: {0}")]
    Input(#[source] IngestError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("partition {path} failed after {attempts} attempt(s): {source}")]
    PartitionFailed {
        path: PathBuf,
        attempts: usize,
        #[source]
        source: PartitionError,
    },

    #[error("failed to write output {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
