//! Timestamp derivation
//!
//! Log events carry `ts` as epoch milliseconds. Derivation goes through
//! whole epoch seconds, so sub-second precision is dropped; every time
//! bucket downstream is an hour or coarser.

use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, Timelike, Utc};

/// Epoch milliseconds to whole epoch seconds, truncating toward zero.
///
/// `1_541_121_934_796` becomes `1_541_121_934`; `-1_500` becomes `-1`.
pub fn epoch_millis_to_seconds(millis: i64) -> i64 {
    millis / 1000
}

/// Civil UTC timestamp for whole epoch seconds
pub fn datetime_from_epoch_seconds(seconds: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| Error::transform(format!("Epoch seconds {seconds} out of range")))
}

/// Civil UTC timestamp for an event `ts`, truncated to the second
pub fn start_time_from_millis(millis: i64) -> Result<DateTime<Utc>> {
    datetime_from_epoch_seconds(epoch_millis_to_seconds(millis))
}

/// Calendar breakdown of a start time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    pub start_time: DateTime<Utc>,
    /// Hour of day, 0-23
    pub hour: i32,
    /// Day of month, 1-31
    pub day: i32,
    /// ISO-8601 week of year, 1-53
    pub week: i32,
    /// Month, 1-12
    pub month: i32,
    pub year: i32,
}

impl TimeParts {
    /// Break a timestamp into its calendar fields
    pub fn from_datetime(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            hour: start_time.hour() as i32,
            day: start_time.day() as i32,
            week: start_time.iso_week().week() as i32,
            month: start_time.month() as i32,
            year: start_time.year(),
        }
    }

    /// Break an event `ts` (epoch milliseconds) into calendar fields
    pub fn from_millis(millis: i64) -> Result<Self> {
        start_time_from_millis(millis).map(Self::from_datetime)
    }
}
