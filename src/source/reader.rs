//! Newline-delimited JSON reader

use crate::error::{Error, Result};
use crate::storage::Storage;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Glob for song catalog files, relative to the input root
pub const SONG_DATA_GLOB: &str = "song_data/*/*/*";

/// Glob for activity log files, relative to the input root
pub const LOG_DATA_GLOB: &str = "log_data/*";

/// Parse every JSON object in a buffer.
///
/// Objects may be separated by newlines or any other whitespace.
pub fn parse_records<T: DeserializeOwned>(bytes: &[u8], origin: &str) -> Result<Vec<T>> {
    serde_json::Deserializer::from_slice(bytes)
        .into_iter::<T>()
        .map(|record| {
            record.map_err(|e| Error::record_parse(origin, e.to_string()))
        })
        .collect()
}

/// Read all records from the files matching `pattern` under the input root.
///
/// A pattern that matches no file is an error, as is any malformed record.
pub async fn read_records<T: DeserializeOwned>(storage: &Storage, pattern: &str) -> Result<Vec<T>> {
    let files = storage.glob(pattern).await?;
    if files.is_empty() {
        return Err(Error::FileNotFound {
            path: storage.display(pattern),
        });
    }

    let mut records = Vec::new();
    for file in &files {
        let bytes = storage.read(file).await?;
        let parsed: Vec<T> = parse_records(&bytes, file.as_ref())?;
        debug!(file = %file, records = parsed.len(), "Parsed input file");
        records.extend(parsed);
    }

    info!(
        source = %storage.display(pattern),
        files = files.len(),
        records = records.len(),
        "Loaded input records"
    );
    Ok(records)
}
