//! Table projections
//!
//! Each function maps input records to the rows of one table. Row order
//! follows input order; exact-duplicate removal happens on the columnar
//! form (see `output::distinct`).

use super::time::{start_time_from_millis, TimeParts};
use super::types::{Artist, Song, Songplay, TimeRow, User};
use crate::error::{Error, Result};
use crate::source::{LogEvent, SongRecord};
use std::cmp::Reverse;
use std::collections::HashMap;

/// `{song_id, title, artist_id, year, duration}` from each catalog record
pub fn songs_table(records: &[SongRecord]) -> Vec<Song> {
    records
        .iter()
        .map(|r| Song {
            song_id: r.song_id.clone(),
            title: r.title.clone(),
            artist_id: r.artist_id.clone(),
            year: r.year,
            duration: r.duration,
        })
        .collect()
}

/// Artist columns from each catalog record, with `artist_` prefixes dropped
pub fn artists_table(records: &[SongRecord]) -> Vec<Artist> {
    records
        .iter()
        .map(|r| Artist {
            artist_id: r.artist_id.clone(),
            name: r.artist_name.clone(),
            location: r.artist_location.clone(),
            latitude: r.artist_latitude,
            longitude: r.artist_longitude,
        })
        .collect()
}

/// Keep only song-play events (`page == "NextSong"`)
pub fn filter_song_plays(events: Vec<LogEvent>) -> Vec<LogEvent> {
    events.into_iter().filter(LogEvent::is_song_play).collect()
}

/// User columns ordered by event time, newest first.
///
/// The sort is stable and events without `ts` go last, so after
/// first-occurrence deduplication the output keeps this order.
pub fn users_table(plays: &[LogEvent]) -> Vec<User> {
    let mut ordered: Vec<&LogEvent> = plays.iter().collect();
    ordered.sort_by_key(|e| Reverse(e.ts));

    ordered
        .into_iter()
        .map(|e| User {
            user_id: e.user_id.clone(),
            first_name: e.first_name.clone(),
            last_name: e.last_name.clone(),
            gender: e.gender.clone(),
            level: e.level.clone(),
        })
        .collect()
}

/// Calendar breakdown of every song play's start time
pub fn time_table(plays: &[LogEvent]) -> Result<Vec<TimeRow>> {
    plays
        .iter()
        .map(|e| {
            let parts = TimeParts::from_millis(event_ts(e)?)?;
            Ok(TimeRow {
                start_time: parts.start_time,
                hour: parts.hour,
                day: parts.day,
                week: parts.week,
                month: parts.month,
                year: parts.year,
            })
        })
        .collect()
}

/// Run-scoped songplay id sequence, starting at zero
#[derive(Debug, Default)]
pub struct SongplayIds {
    next: i64,
}

impl SongplayIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id in the sequence
    pub fn next_id(&mut self) -> i64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Join song plays to catalog records on `event.song == record.title`.
///
/// Inner join on exact string equality: plays whose song matches no
/// title, and titles no play refers to, produce nothing. A play matching
/// several catalog records yields one row per match.
pub fn songplays_table(plays: &[LogEvent], catalog: &[SongRecord]) -> Result<Vec<Songplay>> {
    let mut by_title: HashMap<&str, Vec<&SongRecord>> = HashMap::new();
    for record in catalog {
        if let Some(title) = record.title.as_deref() {
            by_title.entry(title).or_default().push(record);
        }
    }

    let mut ids = SongplayIds::new();
    let mut rows = Vec::new();

    for play in plays {
        let Some(matches) = play.song.as_deref().and_then(|s| by_title.get(s)) else {
            continue;
        };

        let start_time = start_time_from_millis(event_ts(play)?)?;
        for record in matches {
            rows.push(Songplay {
                songplay_id: ids.next_id(),
                start_time,
                user_id: play.user_id.clone(),
                level: play.level.clone(),
                song_id: record.song_id.clone(),
                artist_id: record.artist_id.clone(),
                session_id: play.session_id,
                location: play.location.clone(),
                user_agent: play.user_agent.clone(),
            });
        }
    }

    Ok(rows)
}

fn event_ts(event: &LogEvent) -> Result<i64> {
    event.ts.ok_or_else(|| {
        Error::transform(format!(
            "Song play without ts (user {:?}, session {:?})",
            event.user_id, event.session_id
        ))
    })
}
