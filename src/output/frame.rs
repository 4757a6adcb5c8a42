//! RecordBatch operations: duplicate removal and Hive partitioning

use crate::error::Result;
use arrow::array::{Array, UInt32Array};
use arrow::compute::take_record_batch;
use arrow::record_batch::RecordBatch;
use arrow::row::{RowConverter, SortField};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use std::collections::{BTreeMap, HashSet};

/// Directory value used for null partition keys
pub const DEFAULT_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

/// Remove rows that are identical across every column.
///
/// The first occurrence of each row is kept and relative order is
/// preserved. Nulls compare equal to nulls.
pub fn distinct(batch: &RecordBatch) -> Result<RecordBatch> {
    if batch.num_rows() < 2 {
        return Ok(batch.clone());
    }

    let fields = batch
        .schema()
        .fields()
        .iter()
        .map(|f| SortField::new(f.data_type().clone()))
        .collect();
    let converter = RowConverter::new(fields)?;
    let rows = converter.convert_columns(batch.columns())?;

    let mut seen = HashSet::with_capacity(rows.num_rows());
    let keep: Vec<u32> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| seen.insert(*row))
        .map(|(idx, _)| idx as u32)
        .collect();

    if keep.len() == batch.num_rows() {
        return Ok(batch.clone());
    }
    Ok(take_record_batch(batch, &UInt32Array::from(keep))?)
}

/// One Hive partition of a table
#[derive(Debug, Clone)]
pub struct Partition {
    /// Directory segments, `column=value`, outermost first
    pub segments: Vec<String>,
    /// Rows of this partition without the partition columns
    pub batch: RecordBatch,
}

/// Split a batch by the values of `columns`.
///
/// Partition columns are removed from the data; their values live in the
/// directory segments. Partitions come back sorted by their segment values
/// and rows keep their relative order within a partition.
pub fn partition_batch(batch: &RecordBatch, columns: &[&str]) -> Result<Vec<Partition>> {
    let schema = batch.schema();
    let key_indices = columns
        .iter()
        .map(|c| schema.index_of(c))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let options = FormatOptions::default();
    let formatters = key_indices
        .iter()
        .map(|&i| ArrayFormatter::try_new(batch.column(i).as_ref(), &options))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut groups: BTreeMap<Vec<String>, Vec<u32>> = BTreeMap::new();
    for row in 0..batch.num_rows() {
        let key = key_indices
            .iter()
            .zip(&formatters)
            .map(|(&col, formatter)| {
                if batch.column(col).is_null(row) {
                    DEFAULT_PARTITION.to_string()
                } else {
                    formatter.value(row).to_string()
                }
            })
            .collect();
        groups.entry(key).or_default().push(row as u32);
    }

    let data_indices: Vec<usize> = (0..schema.fields().len())
        .filter(|i| !key_indices.contains(i))
        .collect();
    let data = batch.project(&data_indices)?;

    groups
        .into_iter()
        .map(|(values, rows)| {
            let segments = columns
                .iter()
                .zip(values)
                .map(|(column, value)| format!("{column}={value}"))
                .collect();
            let batch = take_record_batch(&data, &UInt32Array::from(rows))?;
            Ok(Partition { segments, batch })
        })
        .collect()
}
