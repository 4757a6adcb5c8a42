//! Input record types
//!
//! Every field is optional: input files are not validated beyond the
//! columns each table selects.

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// One song-description record from the song catalog
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SongRecord {
    pub song_id: Option<String>,
    pub title: Option<String>,
    pub artist_id: Option<String>,
    pub year: Option<i64>,
    pub duration: Option<f64>,
    pub artist_name: Option<String>,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
    pub num_songs: Option<i64>,
}

/// One user-interaction event from the activity log
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub artist: Option<String>,
    pub auth: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub item_in_session: Option<i64>,
    pub length: Option<f64>,
    pub level: Option<String>,
    pub location: Option<String>,
    pub method: Option<String>,
    pub page: Option<String>,
    pub registration: Option<f64>,
    pub session_id: Option<i64>,
    pub song: Option<String>,
    pub status: Option<i64>,
    /// Event time, epoch milliseconds
    pub ts: Option<i64>,
    pub user_agent: Option<String>,
    /// Logged as a string, occasionally as a number; empty for anonymous users
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
}

impl LogEvent {
    /// Page value marking a song play
    pub const SONG_PLAY_PAGE: &'static str = "NextSong";

    /// Whether this event is a song play
    pub fn is_song_play(&self) -> bool {
        self.page.as_deref() == Some(Self::SONG_PLAY_PAGE)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!(
            "expected string or number, found {other}"
        ))),
    }
}
