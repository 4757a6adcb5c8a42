//! Activity log pipeline: log_data (+ song_data) → users, time, songplays

use super::{Pipeline, PipelineContext, PipelineReport};
use crate::error::Result;
use crate::output::{distinct, TableRow};
use crate::source::{read_records, LogEvent, SongRecord, LOG_DATA_GLOB, SONG_DATA_GLOB};
use crate::transform::{
    filter_song_plays, songplays_table, time_table, users_table, Songplay, TimeRow, User,
};
use crate::types::TableName;
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use std::time::Instant;
use tracing::info;

/// Builds the users, time and songplays tables from song-play events
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityLogPipeline;

impl ActivityLogPipeline {
    /// Deduplicated users batch, newest event first
    pub fn users_batch(plays: &[LogEvent]) -> Result<RecordBatch> {
        distinct(&User::to_batch(&users_table(plays))?)
    }

    /// Deduplicated time batch
    pub fn time_batch(plays: &[LogEvent]) -> Result<RecordBatch> {
        distinct(&TimeRow::to_batch(&time_table(plays)?)?)
    }

    /// Songplays batch joined against the catalog
    pub fn songplays_batch(plays: &[LogEvent], catalog: &[SongRecord]) -> Result<RecordBatch> {
        Songplay::to_batch(&songplays_table(plays, catalog)?)
    }
}

#[async_trait]
impl Pipeline for ActivityLogPipeline {
    fn name(&self) -> &'static str {
        "activity_log"
    }

    async fn run(&self, ctx: &PipelineContext) -> Result<PipelineReport> {
        let started = Instant::now();
        let events: Vec<LogEvent> = read_records(&ctx.input, LOG_DATA_GLOB).await?;
        let read = events.len();

        let plays = filter_song_plays(events);
        info!(events = read, song_plays = plays.len(), "Filtered song plays");

        let writer = ctx.writer();
        let mut report = PipelineReport::new(self.name(), read);

        let users = Self::users_batch(&plays)?;
        report.push(writer.write(TableName::Users, &users).await?);

        let time = Self::time_batch(&plays)?;
        report.push(writer.write(TableName::Time, &time).await?);

        // The catalog is read again from the input, not from the songs table
        let catalog: Vec<SongRecord> = read_records(&ctx.input, SONG_DATA_GLOB).await?;
        let songplays = Self::songplays_batch(&plays, &catalog)?;
        report.push(writer.write(TableName::Songplays, &songplays).await?);

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
