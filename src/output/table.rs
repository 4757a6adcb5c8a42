//! Table persistence with write modes

use super::frame::partition_batch;
use super::writer::{encode_batch, ParquetWriterConfig};
use crate::error::Result;
use crate::storage::Storage;
use crate::types::{TableName, WriteMode};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, info};

/// Name of each data file inside a (partition) directory
pub const DATA_FILE: &str = "part-00000.parquet";

/// Marker written to a table root once all data files are in place
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Outcome of persisting one table
#[derive(Debug, Clone, Serialize)]
pub struct TableWriteResult {
    pub table: String,
    pub path: String,
    pub mode: WriteMode,
    pub rows: usize,
    pub files: usize,
    pub skipped: bool,
}

/// Writes tables as Parquet directories under an output root
#[derive(Debug, Clone)]
pub struct TableWriter {
    storage: Storage,
    parquet: ParquetWriterConfig,
}

impl TableWriter {
    /// Create a writer over the output storage
    pub fn new(storage: Storage, parquet: ParquetWriterConfig) -> Self {
        Self { storage, parquet }
    }

    /// Persist one of the five tables with its own partitioning and mode
    pub async fn write(&self, table: TableName, batch: &RecordBatch) -> Result<TableWriteResult> {
        self.write_table(
            &table.directory(),
            batch,
            table.partition_columns(),
            table.write_mode(),
        )
        .await
    }

    /// Persist a batch under `directory`.
    ///
    /// `Overwrite` removes everything under the directory first. `Ignore`
    /// leaves the directory untouched when it already holds any object.
    pub async fn write_table(
        &self,
        directory: &str,
        batch: &RecordBatch,
        partition_by: &[&str],
        mode: WriteMode,
    ) -> Result<TableWriteResult> {
        let root = self.storage.path([directory]);
        let shown = self.storage.display(directory);

        let mut result = TableWriteResult {
            table: directory.trim_end_matches(".parquet").to_string(),
            path: shown.clone(),
            mode,
            rows: 0,
            files: 0,
            skipped: false,
        };

        match mode {
            WriteMode::Ignore => {
                if self.storage.has_data(&root).await? {
                    info!(path = %shown, "Destination already has data, skipping write");
                    result.skipped = true;
                    return Ok(result);
                }
            }
            WriteMode::Overwrite => {
                let removed = self.storage.delete_prefix(&root).await?;
                if removed > 0 {
                    debug!(path = %shown, removed, "Removed previous table contents");
                }
            }
        }

        if partition_by.is_empty() {
            let data = encode_batch(batch, &self.parquet)?;
            self.storage.put(&root.child(DATA_FILE), data).await?;
            result.files = 1;
        } else {
            for partition in partition_batch(batch, partition_by)? {
                let location = self
                    .storage
                    .path(
                        std::iter::once(directory.to_string())
                            .chain(partition.segments.iter().cloned())
                            .chain(std::iter::once(DATA_FILE.to_string())),
                    );
                let data = encode_batch(&partition.batch, &self.parquet)?;
                self.storage.put(&location, data).await?;
                debug!(location = %location, rows = partition.batch.num_rows(), "Wrote partition");
                result.files += 1;
            }
        }

        self.storage
            .put(&root.child(SUCCESS_MARKER), Bytes::new())
            .await?;

        result.rows = batch.num_rows();
        info!(
            path = %shown,
            mode = %mode,
            rows = result.rows,
            files = result.files,
            "Table written"
        );
        Ok(result)
    }
}
