//! Source module
//!
//! Typed input records and the reader that loads them from storage.
//!
//! - Song catalog: `<input>/song_data/*/*/*`, one [`SongRecord`] per object
//! - Activity log: `<input>/log_data/*`, one [`LogEvent`] per line

mod reader;
mod types;

pub use reader::{parse_records, read_records, LOG_DATA_GLOB, SONG_DATA_GLOB};
pub use types::{LogEvent, SongRecord};
