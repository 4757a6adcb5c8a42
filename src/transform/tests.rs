//! Tests for transform module

use super::*;
use crate::error::Error;
use crate::source::{LogEvent, SongRecord};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use test_case::test_case;

fn song(song_id: &str, title: &str, artist_id: &str) -> SongRecord {
    SongRecord {
        song_id: Some(song_id.to_string()),
        title: Some(title.to_string()),
        artist_id: Some(artist_id.to_string()),
        year: Some(2004),
        duration: Some(218.93179),
        artist_name: Some(format!("name of {artist_id}")),
        artist_location: Some("Los Angeles, CA".to_string()),
        artist_latitude: Some(34.05349),
        artist_longitude: None,
        num_songs: Some(1),
    }
}

fn play(user_id: &str, level: &str, ts: i64, song: &str) -> LogEvent {
    LogEvent {
        page: Some("NextSong".to_string()),
        user_id: Some(user_id.to_string()),
        first_name: Some(format!("first {user_id}")),
        last_name: Some(format!("last {user_id}")),
        gender: Some("F".to_string()),
        level: Some(level.to_string()),
        ts: Some(ts),
        session_id: Some(42),
        location: Some("Atlanta-Sandy Springs-Roswell, GA".to_string()),
        user_agent: Some("Mozilla/5.0".to_string()),
        song: Some(song.to_string()),
        ..LogEvent::default()
    }
}

// ============================================================================
// Timestamp Derivation
// ============================================================================

#[test_case(1_541_121_934_796, 1_541_121_934 ; "drops milliseconds")]
#[test_case(1_541_121_934_000, 1_541_121_934 ; "whole second")]
#[test_case(999, 0 ; "under one second")]
#[test_case(-1_500, -1 ; "negative truncates toward zero")]
fn test_epoch_millis_to_seconds(millis: i64, expected: i64) {
    assert_eq!(epoch_millis_to_seconds(millis), expected);
}

#[test]
fn test_reference_timestamp_breakdown() {
    let parts = TimeParts::from_millis(1_541_121_934_796).unwrap();

    assert_eq!(
        parts.start_time,
        Utc.with_ymd_and_hms(2018, 11, 2, 1, 25, 34).unwrap()
    );
    assert_eq!(parts.hour, 1);
    assert_eq!(parts.day, 2);
    assert_eq!(parts.week, 44);
    assert_eq!(parts.month, 11);
    assert_eq!(parts.year, 2018);
}

#[test_case(2018, 12, 31, 1 ; "late december in iso week one")]
#[test_case(2021, 1, 1, 53 ; "early january in previous iso year")]
#[test_case(2018, 1, 1, 1 ; "monday january first")]
fn test_iso_week(year: i32, month: u32, day: u32, week: i32) {
    let dt = Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap();
    assert_eq!(TimeParts::from_datetime(dt).week, week);
}

#[test]
fn test_datetime_out_of_range() {
    let err = datetime_from_epoch_seconds(i64::MAX).unwrap_err();
    assert!(matches!(err, Error::Transform { .. }));
}

// ============================================================================
// Song Catalog Tables
// ============================================================================

#[test]
fn test_songs_projection() {
    let rows = songs_table(&[song("SO1", "Intro", "AR1")]);
    assert_eq!(
        rows,
        vec![Song {
            song_id: Some("SO1".to_string()),
            title: Some("Intro".to_string()),
            artist_id: Some("AR1".to_string()),
            year: Some(2004),
            duration: Some(218.93179),
        }]
    );
}

#[test]
fn test_artists_projection_renames() {
    let rows = artists_table(&[song("SO1", "Intro", "AR1")]);
    assert_eq!(
        rows,
        vec![Artist {
            artist_id: Some("AR1".to_string()),
            name: Some("name of AR1".to_string()),
            location: Some("Los Angeles, CA".to_string()),
            latitude: Some(34.05349),
            longitude: None,
        }]
    );
}

// ============================================================================
// Activity Log Tables
// ============================================================================

#[test]
fn test_filter_keeps_only_next_song() {
    let mut home = play("1", "free", 1, "x");
    home.page = Some("Home".to_string());
    let mut missing = play("2", "free", 2, "x");
    missing.page = None;
    let keep = play("3", "free", 3, "x");

    let plays = filter_song_plays(vec![home, missing, keep.clone()]);
    assert_eq!(plays, vec![keep]);
}

#[test]
fn test_users_ordered_newest_first() {
    let mut undated = play("9", "free", 0, "x");
    undated.ts = None;
    let plays = vec![
        play("1", "free", 1_000, "x"),
        undated,
        play("1", "paid", 3_000, "x"),
        play("2", "free", 2_000, "x"),
    ];

    let users = users_table(&plays);
    let summary: Vec<(&str, &str)> = users
        .iter()
        .map(|u| {
            (
                u.user_id.as_deref().unwrap(),
                u.level.as_deref().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![("1", "paid"), ("2", "free"), ("1", "free"), ("9", "free")]
    );
}

#[test]
fn test_time_rows() {
    let rows = time_table(&[play("1", "free", 1_541_121_934_796, "x")]).unwrap();
    assert_eq!(
        rows,
        vec![TimeRow {
            start_time: Utc.with_ymd_and_hms(2018, 11, 2, 1, 25, 34).unwrap(),
            hour: 1,
            day: 2,
            week: 44,
            month: 11,
            year: 2018,
        }]
    );
}

#[test]
fn test_time_requires_ts() {
    let mut event = play("1", "free", 0, "x");
    event.ts = None;
    assert!(matches!(
        time_table(&[event]).unwrap_err(),
        Error::Transform { .. }
    ));
}

#[test]
fn test_songplay_ids_are_sequential() {
    let mut ids = SongplayIds::new();
    assert_eq!((ids.next_id(), ids.next_id(), ids.next_id()), (0, 1, 2));
}

#[test]
fn test_songplays_inner_join_on_title() {
    let catalog = vec![
        song("SO1", "You Gotta Be", "AR1"),
        song("SO2", "Intro", "AR2"),
    ];
    let plays = vec![
        play("8", "free", 1_541_106_106_796, "You Gotta Be"),
        play("9", "paid", 1_541_106_200_000, "you gotta be"),
        play("10", "paid", 1_541_106_300_000, "Not In Catalog"),
    ];

    let rows = songplays_table(&plays, &catalog).unwrap();
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(row.songplay_id, 0);
    assert_eq!(row.user_id.as_deref(), Some("8"));
    assert_eq!(row.song_id.as_deref(), Some("SO1"));
    assert_eq!(row.artist_id.as_deref(), Some("AR1"));
    assert_eq!(row.session_id, Some(42));
    assert_eq!(
        row.location.as_deref(),
        Some("Atlanta-Sandy Springs-Roswell, GA")
    );
    assert_eq!(
        row.start_time,
        Utc.with_ymd_and_hms(2018, 11, 1, 21, 1, 46).unwrap()
    );
}

#[test]
fn test_songplays_one_row_per_matching_title() {
    let catalog = vec![
        song("SO1", "Intro", "AR1"),
        song("SO2", "Intro", "AR2"),
    ];
    let plays = vec![
        play("1", "free", 1_000, "Intro"),
        play("2", "free", 2_000, "Intro"),
    ];

    let rows = songplays_table(&plays, &catalog).unwrap();
    let pairs: Vec<(i64, &str, &str)> = rows
        .iter()
        .map(|r| {
            (
                r.songplay_id,
                r.user_id.as_deref().unwrap(),
                r.song_id.as_deref().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        pairs,
        vec![(0, "1", "SO1"), (1, "1", "SO2"), (2, "2", "SO1"), (3, "2", "SO2")]
    );
}

#[test]
fn test_songplays_null_song_never_matches() {
    let mut untitled = song("SO1", "", "AR1");
    untitled.title = None;
    let mut silent = play("1", "free", 1_000, "");
    silent.song = None;

    let rows = songplays_table(&[silent], &[untitled]).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_unmatched_play_without_ts_is_not_an_error() {
    let mut event = play("1", "free", 0, "Nothing Matches");
    event.ts = None;
    assert!(songplays_table(&[event], &[song("SO1", "Intro", "AR1")])
        .unwrap()
        .is_empty());
}
