//! Pipeline orchestration: load reference → fan-out → fan-in.
//!
//! Each input file is one unit of work. Workers stream their file in
//! bounded batches, transform each batch in parallel against the shared
//! reference mapping, and append the surviving records to a private part
//! file before reading the next batch. Once every partition has
//! succeeded the part files are concatenated into `<output_prefix>.jsonl`,
//! which is replaced atomically.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::{IntoParallelRefIterator, ParallelIterator};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info, info_span, warn};

use enrich_ingest::{SourceLine, load_reference, resolve_input_pattern, source_lines};
use enrich_model::{ReferenceMapping, TransformOutcome};
use enrich_transform::transform_record;

use crate::config::PipelineConfig;
use crate::engine::Engine;
use crate::error::{PartitionError, PipelineError, Result};
use crate::types::{PartitionCounts, PartitionSummary, RunReport};

/// One input file scheduled as a unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub index: usize,
    pub source: PathBuf,
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source.display())
    }
}

/// What a single input line turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Rejected,
    Written { json: String, matched: bool },
}

/// Runs the whole pipeline described by `config`.
pub fn run_pipeline(config: &PipelineConfig) -> Result<RunReport> {
    config.validate()?;
    let output_path = config.output_path();
    let output_dir = config.output_dir();
    let run_span = info_span!("run", output = %output_path.display());
    let _run_guard = run_span.enter();
    let run_start = Instant::now();

    // =========================================================================
    // Stage 1: Load reference data (once, before fan-out)
    // =========================================================================
    let loaded = info_span!("load_reference", location = %config.country_csv)
        .in_scope(|| load_reference(&config.country_csv))
        .map_err(|source| PipelineError::Reference {
            location: config.country_csv.clone(),
            source,
        })?;
    let reference_report = loaded.report;
    let reference = Arc::new(loaded.mapping);

    // =========================================================================
    // Stage 2: Resolve input partitions
    // =========================================================================
    let partitions: Vec<Partition> = resolve_input_pattern(&config.json_input_pattern)
        .map_err(PipelineError::Input)?
        .into_iter()
        .enumerate()
        .map(|(index, source)| Partition { index, source })
        .collect();

    // =========================================================================
    // Stage 3: Fan-out
    // =========================================================================
    fs::create_dir_all(&output_dir).map_err(|source| PipelineError::OutputWrite {
        path: output_dir.clone(),
        source,
    })?;
    let parts_dir = tempfile::Builder::new()
        .prefix(".enrich-parts-")
        .tempdir_in(&output_dir)
        .map_err(|source| PipelineError::OutputWrite {
            path: output_dir.clone(),
            source,
        })?;

    let engine = Engine::new(config.num_workers, config.max_attempts)?;
    info!(
        files = partitions.len(),
        countries = reference.len(),
        workers = engine.workers(),
        "fan-out"
    );

    let completed = engine
        .run(&partitions, |partition, attempt| {
            let span = info_span!("partition", source = %partition, attempt);
            let _guard = span.enter();
            let part = part_path(parts_dir.path(), partition);
            process_partition(partition, &part, &reference, config.batch_lines)
        })
        .map_err(|exhausted| PipelineError::PartitionFailed {
            path: exhausted.unit.source,
            attempts: exhausted.attempts,
            source: exhausted.error,
        })?;

    // =========================================================================
    // Stage 4: Fan-in
    // =========================================================================
    let part_paths: Vec<PathBuf> = partitions
        .iter()
        .map(|partition| part_path(parts_dir.path(), partition))
        .collect();
    write_output(&part_paths, &output_dir, &output_path)?;
    if let Err(error) = parts_dir.close() {
        warn!(%error, "failed to remove partition scratch directory");
    }

    let report = RunReport {
        output_path,
        reference: reference_report,
        reference_countries: reference.len(),
        workers: engine.workers(),
        partitions: partitions
            .into_iter()
            .zip(completed)
            .map(|(partition, done)| PartitionSummary {
                source: partition.source,
                counts: done.value,
                attempts: done.attempts,
            })
            .collect(),
    };
    let totals = report.totals();
    info!(
        output = %report.output_path.display(),
        records = totals.lines_read,
        written = totals.written,
        rejected = totals.rejected,
        lookup_misses = totals.lookup_misses,
        duration_ms = run_start.elapsed().as_millis(),
        "run complete"
    );
    Ok(report)
}

fn part_path(dir: &Path, partition: &Partition) -> PathBuf {
    dir.join(format!("part-{:05}.jsonl", partition.index))
}

/// Processes one input file into its part file.
///
/// At most `batch_lines` lines are held in memory at a time. The part file
/// is rewritten from scratch, so a retry leaves no residue from an earlier
/// attempt.
pub fn process_partition(
    partition: &Partition,
    part: &Path,
    reference: &ReferenceMapping,
    batch_lines: usize,
) -> std::result::Result<PartitionCounts, PartitionError> {
    let source = partition.source.as_path();
    let mut lines = source_lines(source)?;

    let part_error = |source: io::Error| PartitionError::PartWrite {
        path: part.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(part).map_err(part_error)?);
    let mut counts = PartitionCounts::default();
    loop {
        let batch = lines.next_batch(batch_lines.max(1))?;
        if batch.is_empty() {
            break;
        }
        counts.lines_read += batch.len();
        let outcomes: Vec<LineOutcome> = batch
            .par_iter()
            .map(|line| transform_line(source, line, reference))
            .collect::<std::result::Result<_, _>>()?;
        for outcome in outcomes {
            match outcome {
                LineOutcome::Rejected => counts.rejected += 1,
                LineOutcome::Written { json, matched } => {
                    writeln!(writer, "{json}").map_err(part_error)?;
                    counts.written += 1;
                    if !matched {
                        counts.lookup_misses += 1;
                    }
                }
            }
        }
    }
    writer.flush().map_err(part_error)?;

    debug!(
        lines = counts.lines_read,
        written = counts.written,
        rejected = counts.rejected,
        lookup_misses = counts.lookup_misses,
        "partition complete"
    );
    Ok(counts)
}

/// Parses, transforms and serializes one line.
///
/// Every line must hold a JSON object; an empty line is malformed.
pub fn transform_line(
    source: &Path,
    line: &SourceLine,
    reference: &ReferenceMapping,
) -> std::result::Result<LineOutcome, PartitionError> {
    let value: Value =
        serde_json::from_str(&line.text).map_err(|e| PartitionError::MalformedRecord {
            path: source.to_path_buf(),
            line: line.number,
            message: e.to_string(),
        })?;
    let Value::Object(record) = value else {
        return Err(PartitionError::NotAnObject {
            path: source.to_path_buf(),
            line: line.number,
        });
    };

    match transform_record(&record, reference) {
        TransformOutcome::Rejected(_) => Ok(LineOutcome::Rejected),
        TransformOutcome::Kept(event) => {
            let matched = event.has_location();
            if !matched {
                debug!(line = line.number, "no reference match for viewer country");
            }
            let json = event
                .to_json_line()
                .map_err(|source_err| PartitionError::Serialize {
                    path: source.to_path_buf(),
                    line: line.number,
                    source: source_err,
                })?;
            Ok(LineOutcome::Written { json, matched })
        }
    }
}

/// Concatenates part files, in order, into the final artifact.
fn write_output(parts: &[PathBuf], output_dir: &Path, output_path: &Path) -> Result<()> {
    let output_error = |source: io::Error| PipelineError::OutputWrite {
        path: output_path.to_path_buf(),
        source,
    };

    let mut staged = NamedTempFile::new_in(output_dir).map_err(output_error)?;
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        for part in parts {
            let mut reader = File::open(part).map_err(output_error)?;
            io::copy(&mut reader, &mut writer).map_err(output_error)?;
        }
        writer.flush().map_err(output_error)?;
    }
    staged
        .persist(output_path)
        .map_err(|e| output_error(e.error))?;

    debug!(parts = parts.len(), output = %output_path.display(), "fan-in complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use enrich_model::CountryRecord;
    use tempfile::TempDir;

    fn reference() -> ReferenceMapping {
        let mut france = CountryRecord::new("France");
        france.capital = Some("Paris".to_string());
        [france].into_iter().collect()
    }

    fn line(number: usize, text: &str) -> SourceLine {
        SourceLine {
            number,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_transform_line_outcomes() {
        let source = Path::new("events.json");
        let mapping = reference();

        assert_eq!(
            transform_line(source, &line(2, r#"{"DeviceType":"Other"}"#), &mapping).unwrap(),
            LineOutcome::Rejected
        );
        assert_eq!(
            transform_line(source, &line(3, r#"{"ViewerLocationCountry":"Spain"}"#), &mapping)
                .unwrap(),
            LineOutcome::Written {
                json: r#"{"LocationData":null}"#.to_string(),
                matched: false,
            }
        );
    }

    #[test]
    fn test_transform_line_malformed() {
        let err = transform_line(Path::new("events.json"), &line(9, "{not json"), &reference())
            .unwrap_err();
        assert!(matches!(err, PartitionError::MalformedRecord { line: 9, .. }));
    }

    #[test]
    fn test_transform_line_blank_is_malformed() {
        let source = Path::new("events.json");
        for (number, text) in [(2, ""), (3, "   ")] {
            let err = transform_line(source, &line(number, text), &reference()).unwrap_err();
            assert!(matches!(
                err,
                PartitionError::MalformedRecord { line, .. } if line == number
            ));
        }
    }

    #[test]
    fn test_transform_line_not_object() {
        let err = transform_line(Path::new("events.json"), &line(4, "[1,2]"), &reference())
            .unwrap_err();
        assert!(matches!(err, PartitionError::NotAnObject { line: 4, .. }));
    }

    #[test]
    fn test_process_partition_writes_part() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("events.json");
        fs::write(
            &source,
            "{\"DeviceType\":\"Mobile\",\"ViewerLocationCountry\":\"France\"}\n{\"DeviceType\":\"Other\"}\n{\"RaceID\":\"Cup 1\"}\n",
        )
        .unwrap();
        let part = dir.path().join("part-00000.jsonl");
        let partition = Partition { index: 0, source };

        let counts = process_partition(&partition, &part, &reference(), 4096).unwrap();
        assert_eq!(counts.lines_read, 3);
        assert_eq!(counts.rejected, 1);
        assert_eq!(counts.written, 2);
        assert_eq!(counts.lookup_misses, 1);

        let written = fs::read_to_string(&part).unwrap();
        assert_eq!(written.lines().count(), 2);
        assert!(written.contains("\"RaceID\":\"cup1\""));
    }

    #[test]
    fn test_process_partition_overwrites_previous_attempt() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("events.json");
        fs::write(&source, "{\"a\":1}\n").unwrap();
        let part = dir.path().join("part-00000.jsonl");
        fs::write(&part, "stale\nstale\nstale\n").unwrap();
        let partition = Partition { index: 0, source };

        process_partition(&partition, &part, &reference(), 4096).unwrap();
        assert_eq!(
            fs::read_to_string(&part).unwrap(),
            "{\"a\":1,\"LocationData\":null}\n"
        );
    }

    #[test]
    fn test_process_partition_small_batches_keep_order() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("events.json");
        let input: String = (1..=7)
            .map(|n| format!("{{\"RaceID\":\"Cup {n}\"}}\n"))
            .collect();
        fs::write(&source, input).unwrap();
        let part = dir.path().join("part-00000.jsonl");
        let partition = Partition { index: 0, source };

        let counts = process_partition(&partition, &part, &reference(), 3).unwrap();
        assert_eq!(counts.lines_read, 7);
        assert_eq!(counts.written, 7);
        let race_ids: Vec<String> = fs::read_to_string(&part)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).unwrap()["RaceID"].to_string())
            .collect();
        assert_eq!(
            race_ids,
            (1..=7).map(|n| format!("\"cup{n}\"")).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_process_partition_blank_line_fails() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("events.json");
        fs::write(
            &source,
            "{\"DeviceType\":\"Mobile\"}\n\n   \n{\"RaceID\":\"Cup 1\"}\n",
        )
        .unwrap();
        let part = dir.path().join("part-00000.jsonl");
        let partition = Partition { index: 0, source };

        let err = process_partition(&partition, &part, &reference(), 4096).unwrap_err();
        assert!(matches!(
            err,
            PartitionError::MalformedRecord { line: 2 | 3, .. }
        ));
    }

    #[test]
    fn test_write_output_concatenates_parts() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("part-00000.jsonl");
        let second = dir.path().join("part-00001.jsonl");
        fs::write(&first, "{\"a\":1}\n").unwrap();
        fs::write(&second, "{\"a\":2}\n").unwrap();
        let output = dir.path().join("out.jsonl");

        write_output(&[first, second], dir.path(), &output).unwrap();
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "{\"a\":1}\n{\"a\":2}\n"
        );
    }
}
