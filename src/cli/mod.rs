//! CLI module
//!
//! Command-line interface for running the ETL.
//!
//! # Options
//!
//! - `--config` - INI configuration file (default `dl.cfg`)
//! - `--pipeline` - `all`, `songs` or `logs`
//! - `--format` - `json` or `pretty` run summary

mod commands;
mod runner;

pub use commands::{Cli, OutputFormat, PipelineArg};
pub use runner::{summary_message, Runner};
