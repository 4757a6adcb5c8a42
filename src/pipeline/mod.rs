//! Pipeline module
//!
//! Two linear pipelines, run one after the other against the same input
//! and output roots:
//!
//! ```text
//! song_data ──► songs (overwrite, year/artist_id)
//!           └─► artists (overwrite)
//!
//! log_data ──► NextSong ──► users (ignore)
//!                       ├─► time (ignore, year/month)
//!   song_data ──────────┴─► songplays (ignore, artist_id)
//! ```
//!
//! Each pipeline loads, transforms, deduplicates and persists. There are
//! no checkpoints: a failure aborts the run and the error is returned as-is.

mod activity_log;
mod song_catalog;

pub use activity_log::ActivityLogPipeline;
pub use song_catalog::SongCatalogPipeline;

use crate::config::EtlConfig;
use crate::error::Result;
use crate::output::{ParquetWriterConfig, TableWriteResult, TableWriter};
use crate::storage::{Storage, StorageOptions};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Instant;
use tracing::info;

/// Storage roots and settings shared by all pipelines of a run
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub input: Storage,
    pub output: Storage,
    pub parquet: ParquetWriterConfig,
}

impl PipelineContext {
    /// Create a context from already opened storage roots
    pub fn new(input: Storage, output: Storage, parquet: ParquetWriterConfig) -> Self {
        Self {
            input,
            output,
            parquet,
        }
    }

    /// Open the configured input and output roots
    pub fn from_config(config: &EtlConfig) -> Result<Self> {
        let input = Storage::open(
            &config.paths.input_data,
            &StorageOptions::for_input(&config.aws),
        )?;
        let output = Storage::open(
            &config.paths.output_data,
            &StorageOptions::for_output(&config.aws),
        )?;
        Ok(Self::new(input, output, config.parquet.clone()))
    }

    /// Table writer over the output root
    pub fn writer(&self) -> TableWriter {
        TableWriter::new(self.output.clone(), self.parquet.clone())
    }
}

/// What a pipeline read and wrote
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub pipeline: String,
    pub records_read: usize,
    pub tables: Vec<TableWriteResult>,
    pub duration_ms: u64,
}

impl PipelineReport {
    pub fn new(pipeline: impl Into<String>, records_read: usize) -> Self {
        Self {
            pipeline: pipeline.into(),
            records_read,
            tables: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn push(&mut self, table: TableWriteResult) {
        self.tables.push(table);
    }

    pub fn finish(&mut self, started: Instant) {
        self.duration_ms = started.elapsed().as_millis() as u64;
    }
}

/// A load → transform → persist chain
#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Pipeline name used in logs and reports
    fn name(&self) -> &'static str;

    /// Run the pipeline to completion
    async fn run(&self, ctx: &PipelineContext) -> Result<PipelineReport>;
}

/// Which pipelines a run executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineSelection {
    /// Song catalog, then activity log
    #[default]
    All,
    /// Song catalog only
    Songs,
    /// Activity log only
    Logs,
}

impl PipelineSelection {
    /// Pipelines in execution order
    pub fn pipelines(self) -> Vec<Box<dyn Pipeline>> {
        match self {
            PipelineSelection::All => vec![
                Box::new(SongCatalogPipeline),
                Box::new(ActivityLogPipeline),
            ],
            PipelineSelection::Songs => vec![Box::new(SongCatalogPipeline)],
            PipelineSelection::Logs => vec![Box::new(ActivityLogPipeline)],
        }
    }
}

/// Run pipelines sequentially, stopping at the first error
pub async fn run_pipelines(
    ctx: &PipelineContext,
    pipelines: &[Box<dyn Pipeline>],
) -> Result<Vec<PipelineReport>> {
    let mut reports = Vec::with_capacity(pipelines.len());
    for pipeline in pipelines {
        info!(
            pipeline = pipeline.name(),
            input = ctx.input.root(),
            output = ctx.output.root(),
            "Starting pipeline"
        );
        reports.push(pipeline.run(ctx).await?);
    }
    Ok(reports)
}
