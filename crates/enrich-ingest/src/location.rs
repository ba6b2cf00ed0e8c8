//! Resource location handling.

use std::path::PathBuf;

use crate::error::{IngestError, Result};

const FILE_SCHEME: &str = "file://";

/// Resolves a path or `file://` URI to a local path.
///
/// Any other `scheme://` prefix is rejected; remote retrieval happens
/// outside the pipeline.
pub fn resolve_local_path(location: &str) -> Result<PathBuf> {
    strip_file_scheme(location).map(PathBuf::from)
}

/// Like [`resolve_local_path`] but keeps the location as text, for glob
/// patterns.
pub(crate) fn strip_file_scheme(location: &str) -> Result<&str> {
    if let Some(rest) = location.strip_prefix(FILE_SCHEME) {
        return Ok(rest);
    }
    if let Some((scheme, _)) = location.split_once("://")
        && !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return Err(IngestError::UnsupportedScheme {
            location: location.to_string(),
            scheme: scheme.to_string(),
        });
    }
    Ok(location)
}
