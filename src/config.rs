//! Run configuration
//!
//! The configuration file is an INI-style set of key-value sections:
//!
//! ```text
//! [AWS]
//! AWS_ACCESS_KEY_ID=...
//! AWS_SECRET_ACCESS_KEY=...
//!
//! [PATHS]
//! INPUT_DATA=s3a://bucket/input/
//! OUTPUT_DATA=s3a://bucket/output/
//!
//! [PARQUET]
//! COMPRESSION=snappy
//! ROW_GROUP_SIZE=1048576
//! ```
//!
//! The file is read once at startup into an [`EtlConfig`] that is passed
//! explicitly to storage and pipelines. Nothing is exported into the
//! process environment.

use crate::error::{Error, Result};
use crate::output::ParquetWriterConfig;
use config::{Config, File, FileFormat, Map, Source, Value};
use std::fmt;
use std::path::Path;

/// Default configuration file name, resolved against the working directory
pub const DEFAULT_CONFIG_FILE: &str = "dl.cfg";

// ============================================================================
// Sections
// ============================================================================

/// Object storage credentials (`[AWS]` section)
#[derive(Clone, Default)]
pub struct AwsCredentials {
    /// `AWS_ACCESS_KEY_ID`
    pub access_key_id: String,
    /// `AWS_SECRET_ACCESS_KEY`
    pub secret_access_key: String,
    /// Optional `AWS_REGION`
    pub region: Option<String>,
    /// Optional `AWS_ENDPOINT` for S3-compatible stores
    pub endpoint: Option<String>,
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Input and output roots (`[PATHS]` section)
#[derive(Debug, Clone, Default)]
pub struct PathsConfig {
    /// Root holding `song_data/` and `log_data/`
    pub input_data: String,
    /// Root the five table directories are written under
    pub output_data: String,
}

/// Complete run configuration
#[derive(Debug, Clone)]
pub struct EtlConfig {
    pub aws: AwsCredentials,
    pub paths: PathsConfig,
    pub parquet: ParquetWriterConfig,
}

impl EtlConfig {
    /// Build a configuration directly (used by tests and embedders)
    pub fn new(
        input_data: impl Into<String>,
        output_data: impl Into<String>,
        aws: AwsCredentials,
    ) -> Self {
        Self {
            aws,
            paths: PathsConfig {
                input_data: input_data.into(),
                output_data: output_data.into(),
            },
            parquet: ParquetWriterConfig::default(),
        }
    }

    /// Load configuration from an INI file on disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let name = path
            .to_str()
            .ok_or_else(|| Error::config(format!("Non UTF-8 config path: {}", path.display())))?;

        let raw = Config::builder()
            .add_source(File::new(name, FileFormat::Ini))
            .build()?;
        Self::from_sections(&raw.collect()?)
    }

    /// Parse configuration from INI text
    pub fn from_ini_str(content: &str) -> Result<Self> {
        let raw = Config::builder()
            .add_source(File::from_str(content, FileFormat::Ini))
            .build()?;
        Self::from_sections(&raw.collect()?)
    }

    fn from_sections(sections: &Map<String, Value>) -> Result<Self> {
        let aws = AwsCredentials {
            access_key_id: required(sections, "AWS", "AWS_ACCESS_KEY_ID")?,
            secret_access_key: required(sections, "AWS", "AWS_SECRET_ACCESS_KEY")?,
            region: optional(sections, "AWS", "AWS_REGION")?,
            endpoint: optional(sections, "AWS", "AWS_ENDPOINT")?,
        };

        let paths = PathsConfig {
            input_data: required(sections, "PATHS", "INPUT_DATA")?,
            output_data: required(sections, "PATHS", "OUTPUT_DATA")?,
        };

        Ok(Self {
            aws,
            paths,
            parquet: parquet_section(sections)?,
        })
    }
}

/// Optional `[PARQUET]` writer settings
fn parquet_section(sections: &Map<String, Value>) -> Result<ParquetWriterConfig> {
    let mut parquet = ParquetWriterConfig::default();

    if let Some(codec) = optional(sections, "PARQUET", "COMPRESSION")? {
        parquet = parquet.with_codec(&codec).map_err(|_| {
            Error::invalid_value(
                "PARQUET.COMPRESSION",
                format!("unsupported codec '{codec}' (expected snappy, zstd, gzip or none)"),
            )
        })?;
    }

    if let Some(size) = optional(sections, "PARQUET", "ROW_GROUP_SIZE")? {
        let size = size
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                Error::invalid_value(
                    "PARQUET.ROW_GROUP_SIZE",
                    format!("expected a positive integer, got '{size}'"),
                )
            })?;
        parquet = parquet.with_row_group_size(size);
    }

    if let Some(flag) = optional(sections, "PARQUET", "DICTIONARY")? {
        parquet = parquet.with_dictionary(parse_flag("PARQUET.DICTIONARY", &flag)?);
    }

    if let Some(flag) = optional(sections, "PARQUET", "STATISTICS")? {
        parquet = parquet.with_statistics(parse_flag("PARQUET.STATISTICS", &flag)?);
    }

    Ok(parquet)
}

fn parse_flag(field: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(Error::invalid_value(
            field,
            format!("expected true or false, got '{value}'"),
        )),
    }
}

// ============================================================================
// Lookup helpers
// ============================================================================

/// Find a value by section and key, ignoring ASCII case on both
fn lookup(sections: &Map<String, Value>, section: &str, key: &str) -> Result<Option<String>> {
    let Some(table) = sections
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(section))
        .map(|(_, value)| value.clone())
    else {
        return Ok(None);
    };

    let table = table
        .into_table()
        .map_err(|e| Error::config(format!("[{section}] is not a section: {e}")))?;

    let Some(value) = table
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, value)| value)
    else {
        return Ok(None);
    };

    let value = value
        .into_string()
        .map_err(|e| Error::invalid_value(format!("{section}.{key}"), e.to_string()))?;
    let trimmed = value.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

fn required(sections: &Map<String, Value>, section: &str, key: &str) -> Result<String> {
    lookup(sections, section, key)?.ok_or_else(|| Error::missing_field(format!("{section}.{key}")))
}

fn optional(sections: &Map<String, Value>, section: &str, key: &str) -> Result<Option<String>> {
    lookup(sections, section, key)
}
