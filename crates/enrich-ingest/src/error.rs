//! Error types for enrichment data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading reference data or input events.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Location uses a scheme other than a local path or `file://`.
    #[error("unsupported scheme '{scheme}' in {location}")]
    UnsupportedScheme { location: String, scheme: String },

    // === Encoding Errors ===
    /// File is not valid UTF-8.
    #[error("file is not valid UTF-8: {path}")]
    InvalidEncoding { path: PathBuf },

    /// File starts with a byte-order mark for an unsupported encoding.
    #[error("unsupported encoding {encoding} in {path}")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === Input Discovery Errors ===
    /// Input pattern is not a valid glob.
    #[error("invalid input pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Input pattern matched no files.
    #[error("no input files match pattern '{pattern}'")]
    NoInputMatches { pattern: String },
}

impl IngestError {
    /// Maps an I/O error on `path`, distinguishing a missing file.
    pub(crate) fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source: err,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/countries.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /path/to/countries.csv");
    }

    #[test]
    fn test_from_io_not_found() {
        let io = std::io::Error::from(std::io::ErrorKind::NotFound);
        let err = IngestError::from_io(std::path::Path::new("x.csv"), io);
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }

    #[test]
    fn test_from_io_other() {
        let io = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        let err = IngestError::from_io(std::path::Path::new("x.csv"), io);
        assert!(matches!(err, IngestError::FileRead { .. }));
    }
}
