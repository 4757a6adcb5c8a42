//! CLI runner - executes a run

use crate::cli::commands::{Cli, OutputFormat};
use crate::config::EtlConfig;
use crate::error::Result;
use crate::pipeline::{run_pipelines, PipelineContext, PipelineReport, PipelineSelection};
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Load config, run the selected pipelines and print the run summary
    pub async fn run(&self) -> Result<()> {
        let started = Instant::now();

        let config = EtlConfig::from_file(&self.cli.config)?;
        debug!(config = ?config, "Loaded configuration");

        let ctx = PipelineContext::from_config(&config)?;
        info!(
            input = ctx.input.root(),
            input_scheme = ctx.input.scheme(),
            output = ctx.output.root(),
            output_scheme = ctx.output.scheme(),
            "Storage opened"
        );

        let selection = PipelineSelection::from(self.cli.pipeline);
        let reports = run_pipelines(&ctx, &selection.pipelines()).await?;

        let duration_ms = started.elapsed().as_millis() as u64;
        self.output_message(&summary_message(&reports, &ctx, duration_ms));
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Build the `RUN_SUMMARY` message for a finished run
pub fn summary_message(reports: &[PipelineReport], ctx: &PipelineContext, duration_ms: u64) -> Value {
    let tables: Vec<Value> = reports
        .iter()
        .flat_map(|r| r.tables.iter())
        .map(|t| {
            json!({
                "name": t.table,
                "path": t.path,
                "mode": t.mode,
                "rows": t.rows,
                "files": t.files,
                "skipped": t.skipped,
            })
        })
        .collect();

    let pipelines: Vec<Value> = reports
        .iter()
        .map(|r| {
            json!({
                "name": r.pipeline,
                "records_read": r.records_read,
                "duration_ms": r.duration_ms,
            })
        })
        .collect();

    json!({
        "type": "RUN_SUMMARY",
        "summary": {
            "status": "SUCCEEDED",
            "input": ctx.input.root(),
            "output": ctx.output.root(),
            "duration_ms": duration_ms,
            "parquet": {
                "compression": ctx.parquet.codec_name(),
                "row_group_size": ctx.parquet.row_group_size(),
                "dictionary": ctx.parquet.is_dictionary_enabled(),
                "statistics": ctx.parquet.is_statistics_enabled(),
            },
            "pipelines": pipelines,
            "tables": tables,
        }
    })
}
