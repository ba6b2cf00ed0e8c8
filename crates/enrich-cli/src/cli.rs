//! CLI argument definitions for the race event enrichment pipeline.

use std::path::PathBuf;

use clap::builder::TypedValueParser;
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use enrich_cli::config::{DEFAULT_BATCH_LINES, DEFAULT_MAX_ATTEMPTS};

#[derive(Parser)]
#[command(
    name = "race-enrich",
    version,
    about = "Enrich race viewing events with country reference data",
    long_about = "Enrich newline-delimited JSON race viewing events with country data.\n\n\
                  Drops events from 'Other' devices, normalizes RaceID, replaces\n\
                  ViewerLocationCountry with a LocationData record and writes a\n\
                  single <OUTPUT_PREFIX>.jsonl file."
)]
pub struct Cli {
    /// Glob selecting the JSON-lines input files (gzip supported).
    #[arg(
        long = "json_input_pattern",
        visible_alias = "json-input-pattern",
        value_name = "PATTERN"
    )]
    pub json_input_pattern: String,

    /// Path to the country reference CSV.
    #[arg(long = "country_csv", visible_alias = "country-csv", value_name = "PATH")]
    pub country_csv: String,

    /// Output path prefix; `.jsonl` is appended.
    #[arg(
        long = "output_prefix",
        visible_alias = "output-prefix",
        value_name = "PREFIX"
    )]
    pub output_prefix: PathBuf,

    /// Worker threads (0 uses one per available core).
    #[arg(long = "num-workers", value_name = "N", default_value_t = 0)]
    pub num_workers: usize,

    /// Attempts per input file before the run is aborted.
    #[arg(
        long = "max-attempts",
        value_name = "N",
        default_value_t = DEFAULT_MAX_ATTEMPTS,
        value_parser = clap::value_parser!(u64).range(1..).map(|n| n as usize)
    )]
    pub max_attempts: usize,

    /// Input lines each worker reads and transforms per batch.
    #[arg(
        long = "batch-lines",
        value_name = "N",
        default_value_t = DEFAULT_BATCH_LINES,
        value_parser = clap::value_parser!(u64).range(1..).map(|n| n as usize)
    )]
    pub batch_lines: usize,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Prefix pretty and compact log lines with a timestamp.
    #[arg(long = "log-timestamps")]
    pub log_timestamps: bool,

    /// Include the emitting module in each log line.
    #[arg(long = "log-target")]
    pub log_target: bool,

    /// Omit span close events from JSON logs.
    #[arg(long = "no-log-spans")]
    pub no_log_spans: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscore_flags() {
        let cli = Cli::try_parse_from([
            "race-enrich",
            "--json_input_pattern",
            "data/*.json",
            "--country_csv",
            "countries.csv",
            "--output_prefix",
            "out/enriched",
        ])
        .unwrap();
        assert_eq!(cli.json_input_pattern, "data/*.json");
        assert_eq!(cli.country_csv, "countries.csv");
        assert_eq!(cli.output_prefix, PathBuf::from("out/enriched"));
        assert_eq!(cli.num_workers, 0);
        assert_eq!(cli.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(cli.batch_lines, DEFAULT_BATCH_LINES);
        assert!(!cli.log_timestamps);
    }

    #[test]
    fn test_hyphen_aliases() {
        let cli = Cli::try_parse_from([
            "race-enrich",
            "--json-input-pattern",
            "a.json",
            "--country-csv",
            "c.csv",
            "--output-prefix",
            "o",
            "--num-workers",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.num_workers, 3);
    }

    #[test]
    fn test_engine_and_log_flags() {
        let cli = Cli::try_parse_from([
            "race-enrich",
            "--json_input_pattern",
            "a.json",
            "--country_csv",
            "c.csv",
            "--output_prefix",
            "o",
            "--max-attempts",
            "2",
            "--batch-lines",
            "500",
            "--log-timestamps",
            "--log-target",
            "--no-log-spans",
        ])
        .unwrap();
        assert_eq!(cli.max_attempts, 2);
        assert_eq!(cli.batch_lines, 500);
        assert!(cli.log_timestamps && cli.log_target && cli.no_log_spans);
    }

    #[test]
    fn test_missing_required_flag() {
        assert!(Cli::try_parse_from(["race-enrich", "--country_csv", "c.csv"]).is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let parsed = Cli::try_parse_from([
            "race-enrich",
            "--json_input_pattern",
            "a.json",
            "--country_csv",
            "c.csv",
            "--output_prefix",
            "o",
            "--max-attempts",
            "0",
        ]);
        assert!(parsed.is_err());
    }
}
