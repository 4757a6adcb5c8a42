//! Arrow schemas and row conversion
//!
//! Each table row type knows its Arrow schema and how to turn a slice of
//! rows into a RecordBatch. All columns are nullable.

use crate::error::Result;
use crate::transform::{Artist, Song, Songplay, TimeRow, User};
use arrow::array::{
    ArrayRef, Float64Array, Int32Array, Int64Array, StringArray, TimestampMicrosecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Timezone stored on every timestamp column
pub const TIMESTAMP_TZ: &str = "UTC";

/// Arrow type of `start_time` columns
pub fn timestamp_type() -> DataType {
    DataType::Timestamp(TimeUnit::Microsecond, Some(TIMESTAMP_TZ.into()))
}

/// A row type that can be laid out as an Arrow RecordBatch
pub trait TableRow: Sized {
    /// Arrow schema of the table
    fn schema() -> SchemaRef;

    /// Build the column arrays for a slice of rows, in schema order
    fn columns(rows: &[Self]) -> Vec<ArrayRef>;

    /// Convert rows into a RecordBatch
    fn to_batch(rows: &[Self]) -> Result<RecordBatch> {
        Ok(RecordBatch::try_new(Self::schema(), Self::columns(rows))?)
    }
}

fn utf8<'a, T: 'a>(rows: &'a [T], f: impl Fn(&'a T) -> Option<&'a str>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<StringArray>())
}

fn int64<T>(rows: &[T], f: impl Fn(&T) -> Option<i64>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<Int64Array>())
}

fn int32<T>(rows: &[T], f: impl Fn(&T) -> i32) -> ArrayRef {
    Arc::new(rows.iter().map(|r| Some(f(r))).collect::<Int32Array>())
}

fn float64<T>(rows: &[T], f: impl Fn(&T) -> Option<f64>) -> ArrayRef {
    Arc::new(rows.iter().map(f).collect::<Float64Array>())
}

fn timestamp<T>(rows: &[T], f: impl Fn(&T) -> DateTime<Utc>) -> ArrayRef {
    let array = rows
        .iter()
        .map(|r| Some(f(r).timestamp_micros()))
        .collect::<TimestampMicrosecondArray>()
        .with_timezone(TIMESTAMP_TZ);
    Arc::new(array)
}

impl TableRow for Song {
    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("song_id", DataType::Utf8, true),
            Field::new("title", DataType::Utf8, true),
            Field::new("artist_id", DataType::Utf8, true),
            Field::new("year", DataType::Int64, true),
            Field::new("duration", DataType::Float64, true),
        ]))
    }

    fn columns(rows: &[Self]) -> Vec<ArrayRef> {
        vec![
            utf8(rows, |r| r.song_id.as_deref()),
            utf8(rows, |r| r.title.as_deref()),
            utf8(rows, |r| r.artist_id.as_deref()),
            int64(rows, |r| r.year),
            float64(rows, |r| r.duration),
        ]
    }
}

impl TableRow for Artist {
    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("artist_id", DataType::Utf8, true),
            Field::new("name", DataType::Utf8, true),
            Field::new("location", DataType::Utf8, true),
            Field::new("latitude", DataType::Float64, true),
            Field::new("longitude", DataType::Float64, true),
        ]))
    }

    fn columns(rows: &[Self]) -> Vec<ArrayRef> {
        vec![
            utf8(rows, |r| r.artist_id.as_deref()),
            utf8(rows, |r| r.name.as_deref()),
            utf8(rows, |r| r.location.as_deref()),
            float64(rows, |r| r.latitude),
            float64(rows, |r| r.longitude),
        ]
    }
}

impl TableRow for User {
    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("user_id", DataType::Utf8, true),
            Field::new("first_name", DataType::Utf8, true),
            Field::new("last_name", DataType::Utf8, true),
            Field::new("gender", DataType::Utf8, true),
            Field::new("level", DataType::Utf8, true),
        ]))
    }

    fn columns(rows: &[Self]) -> Vec<ArrayRef> {
        vec![
            utf8(rows, |r| r.user_id.as_deref()),
            utf8(rows, |r| r.first_name.as_deref()),
            utf8(rows, |r| r.last_name.as_deref()),
            utf8(rows, |r| r.gender.as_deref()),
            utf8(rows, |r| r.level.as_deref()),
        ]
    }
}

impl TableRow for TimeRow {
    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("start_time", timestamp_type(), true),
            Field::new("hour", DataType::Int32, true),
            Field::new("day", DataType::Int32, true),
            Field::new("week", DataType::Int32, true),
            Field::new("month", DataType::Int32, true),
            Field::new("year", DataType::Int32, true),
        ]))
    }

    fn columns(rows: &[Self]) -> Vec<ArrayRef> {
        vec![
            timestamp(rows, |r| r.start_time),
            int32(rows, |r| r.hour),
            int32(rows, |r| r.day),
            int32(rows, |r| r.week),
            int32(rows, |r| r.month),
            int32(rows, |r| r.year),
        ]
    }
}

impl TableRow for Songplay {
    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("songplay_id", DataType::Int64, true),
            Field::new("start_time", timestamp_type(), true),
            Field::new("user_id", DataType::Utf8, true),
            Field::new("level", DataType::Utf8, true),
            Field::new("song_id", DataType::Utf8, true),
            Field::new("artist_id", DataType::Utf8, true),
            Field::new("session_id", DataType::Int64, true),
            Field::new("location", DataType::Utf8, true),
            Field::new("user_agent", DataType::Utf8, true),
        ]))
    }

    fn columns(rows: &[Self]) -> Vec<ArrayRef> {
        vec![
            int64(rows, |r| Some(r.songplay_id)),
            timestamp(rows, |r| r.start_time),
            utf8(rows, |r| r.user_id.as_deref()),
            utf8(rows, |r| r.level.as_deref()),
            utf8(rows, |r| r.song_id.as_deref()),
            utf8(rows, |r| r.artist_id.as_deref()),
            int64(rows, |r| r.session_id),
            utf8(rows, |r| r.location.as_deref()),
            utf8(rows, |r| r.user_agent.as_deref()),
        ]
    }
}
