//! Parquet encoder
//!
//! Encodes Arrow RecordBatches into in-memory Parquet files that are then
//! handed to object storage.

use crate::error::{Error, Result};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};

/// Configuration for Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
    dictionary_enabled: bool,
    statistics_enabled: bool,
}

impl ParquetWriterConfig {
    /// Get dictionary encoding enabled
    #[must_use]
    pub fn is_dictionary_enabled(&self) -> bool {
        self.dictionary_enabled
    }

    /// Get statistics enabled
    #[must_use]
    pub fn is_statistics_enabled(&self) -> bool {
        self.statistics_enabled
    }

    /// Get row group size
    #[must_use]
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Get compression codec
    #[must_use]
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Codec name as accepted by [`ParquetWriterConfig::with_codec`]
    #[must_use]
    pub fn codec_name(&self) -> &'static str {
        match self.compression {
            Compression::SNAPPY => "snappy",
            Compression::ZSTD(_) => "zstd",
            Compression::GZIP(_) => "gzip",
            Compression::UNCOMPRESSED => "none",
            _ => "other",
        }
    }
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024, // 1M rows
            dictionary_enabled: true,
            statistics_enabled: true,
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compression algorithm
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set compression from a codec name (`snappy`, `zstd`, `gzip`, `none`)
    pub fn with_codec(self, codec: &str) -> Result<Self> {
        match codec.trim().to_ascii_lowercase().as_str() {
            "snappy" => Ok(self.with_compression(Compression::SNAPPY)),
            "zstd" => Ok(self.with_compression(Compression::ZSTD(ZstdLevel::default()))),
            "gzip" => Ok(self.with_compression(Compression::GZIP(GzipLevel::default()))),
            "none" | "uncompressed" => Ok(self.with_compression(Compression::UNCOMPRESSED)),
            other => Err(Error::output(format!("Unknown Parquet codec: {other}"))),
        }
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Enable or disable dictionary encoding
    #[must_use]
    pub fn with_dictionary(mut self, enabled: bool) -> Self {
        self.dictionary_enabled = enabled;
        self
    }

    /// Enable or disable statistics
    #[must_use]
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.statistics_enabled = enabled;
        self
    }

    /// Build writer properties
    fn build_properties(&self) -> WriterProperties {
        let mut builder = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size);

        if !self.dictionary_enabled {
            builder = builder.set_dictionary_enabled(false);
        }

        if !self.statistics_enabled {
            builder = builder.set_statistics_enabled(EnabledStatistics::None);
        }

        builder.build()
    }
}

/// In-memory Parquet file writer
pub struct ParquetWriter {
    /// Arrow writer over an owned buffer
    writer: ArrowWriter<Vec<u8>>,
}

impl ParquetWriter {
    /// Create a new Parquet writer for the given schema
    pub fn new(schema: SchemaRef, config: &ParquetWriterConfig) -> Result<Self> {
        let props = config.build_properties();
        let writer = ArrowWriter::try_new(Vec::new(), schema, Some(props)).map_err(|e| {
            Error::Output {
                message: format!("Failed to create Parquet writer: {e}"),
            }
        })?;

        Ok(Self { writer })
    }

    /// Write a RecordBatch
    pub fn write(&mut self, batch: &RecordBatch) -> Result<()> {
        self.writer.write(batch).map_err(|e| Error::Output {
            message: format!("Failed to write batch: {e}"),
        })?;
        Ok(())
    }

    /// Finalize the file and return its bytes
    pub fn finish(self) -> Result<Bytes> {
        let buf = self.writer.into_inner().map_err(|e| Error::Output {
            message: format!("Failed to close Parquet writer: {e}"),
        })?;
        Ok(Bytes::from(buf))
    }
}

/// Encode a single RecordBatch as a complete Parquet file
pub fn encode_batch(batch: &RecordBatch, config: &ParquetWriterConfig) -> Result<Bytes> {
    let mut writer = ParquetWriter::new(batch.schema(), config)?;
    writer.write(batch)?;
    writer.finish()
}
