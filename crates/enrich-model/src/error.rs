//! Error types for the enrichment model.

use thiserror::Error;

/// Errors raised while converting model values to or from their wire form.
#[derive(Debug, Error)]
pub enum ModelError {
    /// An output event could not be rendered as JSON.
    #[error("failed to serialize output event: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
