//! Transform module
//!
//! Pure functions from input records to table rows:
//!
//! - songs / artists from the song catalog
//! - users / time / songplays from song-play events
//!
//! Nothing here touches storage.

mod tables;
mod time;
mod types;

pub use tables::{
    artists_table, filter_song_plays, songplays_table, songs_table, time_table, users_table,
    SongplayIds,
};
pub use time::{
    datetime_from_epoch_seconds, epoch_millis_to_seconds, start_time_from_millis, TimeParts,
};
pub use types::{Artist, Song, Songplay, TimeRow, User};

#[cfg(test)]
mod tests;
