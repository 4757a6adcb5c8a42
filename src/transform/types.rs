//! Output row types, one per table

use chrono::{DateTime, Utc};

/// Row of the songs table
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub song_id: Option<String>,
    pub title: Option<String>,
    pub artist_id: Option<String>,
    pub year: Option<i64>,
    pub duration: Option<f64>,
}

/// Row of the artists table
#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    pub artist_id: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Row of the users table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

/// Row of the time table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRow {
    pub start_time: DateTime<Utc>,
    pub hour: i32,
    pub day: i32,
    pub week: i32,
    pub month: i32,
    pub year: i32,
}

/// Row of the songplays table.
///
/// `songplay_id` only orders rows within the output of a single run. It is
/// reassigned from zero every time the table is rebuilt and must not be
/// used as a key across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Songplay {
    pub songplay_id: i64,
    pub start_time: DateTime<Utc>,
    pub user_id: Option<String>,
    pub level: Option<String>,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: Option<i64>,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}
