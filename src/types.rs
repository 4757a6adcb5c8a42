//! Common types used throughout songplay-lake
//!
//! This module contains shared type definitions used across the
//! pipeline, output, and CLI modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Write Mode
// ============================================================================

/// How a table is persisted when its destination already holds data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Replace whatever is at the destination
    Overwrite,
    /// Skip the write entirely if the destination holds any object
    Ignore,
}

impl WriteMode {
    /// Mode name as logged and reported
    pub fn as_str(self) -> &'static str {
        match self {
            WriteMode::Overwrite => "overwrite",
            WriteMode::Ignore => "ignore",
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Output Tables
// ============================================================================

/// The five tables of the analytical schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Songs,
    Artists,
    Users,
    Time,
    Songplays,
}

impl TableName {
    /// All tables, in the order they are produced
    pub const ALL: [TableName; 5] = [
        TableName::Songs,
        TableName::Artists,
        TableName::Users,
        TableName::Time,
        TableName::Songplays,
    ];

    /// Short table name
    pub fn as_str(self) -> &'static str {
        match self {
            TableName::Songs => "songs",
            TableName::Artists => "artists",
            TableName::Users => "users",
            TableName::Time => "time",
            TableName::Songplays => "songplays",
        }
    }

    /// Directory name under the output root
    pub fn directory(self) -> String {
        format!("{}.parquet", self.as_str())
    }

    /// Write mode this table is persisted with.
    ///
    /// Catalog tables are replaced on every run; tables derived from the
    /// activity log are left alone once they exist.
    pub fn write_mode(self) -> WriteMode {
        match self {
            TableName::Songs | TableName::Artists => WriteMode::Overwrite,
            TableName::Users | TableName::Time | TableName::Songplays => WriteMode::Ignore,
        }
    }

    /// Columns the table is partitioned by, outermost first
    pub fn partition_columns(self) -> &'static [&'static str] {
        match self {
            TableName::Songs => &["year", "artist_id"],
            TableName::Time => &["year", "month"],
            TableName::Songplays => &["artist_id"],
            TableName::Artists | TableName::Users => &[],
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
