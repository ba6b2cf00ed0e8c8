//! Input file discovery from glob patterns.

use std::io;
use std::path::PathBuf;

use crate::error::{IngestError, Result};
use crate::location::strip_file_scheme;

/// Resolves an input pattern (glob, optionally `file://`-prefixed) to the
/// matching regular files.
///
/// Returns files sorted by path, without duplicates. Matching nothing is an
/// error.
pub fn resolve_input_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let glob_pattern = strip_file_scheme(pattern)?;
    let entries = glob::glob(glob_pattern).map_err(|e| IngestError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| IngestError::FileRead {
            path: e.path().to_path_buf(),
            source: io::Error::from(e),
        })?;

        // Skip directories
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    files.dedup();

    if files.is_empty() {
        return Err(IngestError::NoInputMatches {
            pattern: pattern.to_string(),
        });
    }

    tracing::debug!(pattern, files = files.len(), "resolved input pattern");
    Ok(files)
}
