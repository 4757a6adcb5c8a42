//! Song catalog pipeline: song_data → songs, artists

use super::{Pipeline, PipelineContext, PipelineReport};
use crate::error::Result;
use crate::output::{distinct, TableRow};
use crate::source::{read_records, SongRecord, SONG_DATA_GLOB};
use crate::transform::{artists_table, songs_table, Artist, Song};
use crate::types::TableName;
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use std::time::Instant;
use tracing::info;

/// Builds the songs and artists tables from the song catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct SongCatalogPipeline;

impl SongCatalogPipeline {
    /// Deduplicated songs batch
    pub fn songs_batch(records: &[SongRecord]) -> Result<RecordBatch> {
        distinct(&Song::to_batch(&songs_table(records))?)
    }

    /// Deduplicated artists batch
    pub fn artists_batch(records: &[SongRecord]) -> Result<RecordBatch> {
        distinct(&Artist::to_batch(&artists_table(records))?)
    }
}

#[async_trait]
impl Pipeline for SongCatalogPipeline {
    fn name(&self) -> &'static str {
        "song_catalog"
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<PipelineReport> {
        let started = Instant::now();
        let records: Vec<SongRecord> = read_records(&ctx.input, SONG_DATA_GLOB).await?;

        let writer = ctx.writer();
        let mut report = PipelineReport::new(self.name(), records.len());

        let songs = Self::songs_batch(&records)?;
        report.push(writer.write(TableName::Songs, &songs).await?);

        let artists = Self::artists_batch(&records)?;
        report.push(writer.write(TableName::Artists, &artists).await?);

        report.finish(started);
        info!(
            pipeline = self.name(),
            records = report.records_read,
            duration_ms = report.duration_ms,
            "Pipeline complete"
        );
        Ok(report)
    }
}
