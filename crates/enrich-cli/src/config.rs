//! Pipeline run configuration.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Suffix appended to the output prefix.
pub const OUTPUT_SUFFIX: &str = ".jsonl";

/// Default attempts per unit of work before the run is aborted.
pub const DEFAULT_MAX_ATTEMPTS: usize = 4;

/// Default number of input lines a worker holds in memory at once.
pub const DEFAULT_BATCH_LINES: usize = 4096;

/// Settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Glob (optionally `file://`) selecting newline-delimited JSON inputs.
    pub json_input_pattern: String,
    /// Path or `file://` URI of the country reference CSV.
    pub country_csv: String,
    /// Output path without the `.jsonl` suffix.
    pub output_prefix: PathBuf,
    /// Worker threads; 0 uses one per available core.
    pub num_workers: usize,
    pub max_attempts: usize,
    /// Lines read and transformed per batch within one input file.
    pub batch_lines: usize,
}

impl PipelineConfig {
    pub fn new(
        json_input_pattern: impl Into<String>,
        country_csv: impl Into<String>,
        output_prefix: impl Into<PathBuf>,
    ) -> Self {
        Self {
            json_input_pattern: json_input_pattern.into(),
            country_csv: country_csv.into(),
            output_prefix: output_prefix.into(),
            num_workers: 0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            batch_lines: DEFAULT_BATCH_LINES,
        }
    }

    #[must_use]
    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn with_batch_lines(mut self, batch_lines: usize) -> Self {
        self.batch_lines = batch_lines;
        self
    }

    /// Rejects blank required settings, a zero retry budget and empty
    /// batches.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.json_input_pattern.trim().is_empty() {
            return Err(ConfigError::Empty {
                flag: "json_input_pattern",
            });
        }
        if self.country_csv.trim().is_empty() {
            return Err(ConfigError::Empty {
                flag: "country_csv",
            });
        }
        if self.output_prefix.as_os_str().is_empty() {
            return Err(ConfigError::Empty {
                flag: "output_prefix",
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.batch_lines == 0 {
            return Err(ConfigError::ZeroBatchLines);
        }
        Ok(())
    }

    /// The single output artifact: `<output_prefix>.jsonl`.
    pub fn output_path(&self) -> PathBuf {
        let mut path: OsString = self.output_prefix.clone().into_os_string();
        path.push(OUTPUT_SUFFIX);
        PathBuf::from(path)
    }

    /// Directory that receives the output artifact.
    pub fn output_dir(&self) -> PathBuf {
        self.output_path()
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }
}
