//! Output module
//!
//! Turns table rows into Parquet directories on object storage.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Laying out table rows as Arrow RecordBatches
//! - Removing exact-duplicate rows
//! - Splitting batches into Hive-style partitions
//! - Encoding Parquet files
//! - Persisting tables with overwrite / ignore semantics

mod frame;
mod schema;
mod table;
mod writer;

pub use frame::{distinct, partition_batch, Partition, DEFAULT_PARTITION};
pub use schema::{timestamp_type, TableRow, TIMESTAMP_TZ};
pub use table::{TableWriteResult, TableWriter, DATA_FILE, SUCCESS_MARKER};
pub use writer::{encode_batch, ParquetWriter, ParquetWriterConfig};
