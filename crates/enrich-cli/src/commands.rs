use anyhow::{Context, Result};
use tracing::info;

use enrich_cli::config::PipelineConfig;
use enrich_cli::pipeline::run_pipeline;
use enrich_cli::types::RunReport;

use crate::cli::Cli;

pub fn run_enrich(cli: &Cli) -> Result<RunReport> {
    let config = PipelineConfig::new(
        cli.json_input_pattern.clone(),
        cli.country_csv.clone(),
        cli.output_prefix.clone(),
    )
    .with_num_workers(cli.num_workers)
    .with_max_attempts(cli.max_attempts)
    .with_batch_lines(cli.batch_lines);

    info!(
        input = %config.json_input_pattern,
        reference = %config.country_csv,
        output = %config.output_path().display(),
        "starting enrichment run"
    );

    run_pipeline(&config).with_context(|| {
        format!(
            "enrich {} into {}",
            config.json_input_pattern,
            config.output_path().display()
        )
    })
}
