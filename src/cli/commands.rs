//! CLI arguments and parsing

use crate::config::DEFAULT_CONFIG_FILE;
use crate::pipeline::PipelineSelection;
use clap::Parser;
use std::path::PathBuf;

/// Song-play data lake ETL
#[derive(Parser, Debug)]
#[command(name = "songplay-lake")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (INI)
    #[arg(short = 'C', long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Pipelines to run
    #[arg(short, long, value_enum, default_value = "all")]
    pub pipeline: PipelineArg,

    /// Output format for the run summary
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Pipeline selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PipelineArg {
    /// Song catalog, then activity log
    All,
    /// songs and artists tables only
    Songs,
    /// users, time and songplays tables only
    Logs,
}

impl From<PipelineArg> for PipelineSelection {
    fn from(arg: PipelineArg) -> Self {
        match arg {
            PipelineArg::All => PipelineSelection::All,
            PipelineArg::Songs => PipelineSelection::Songs,
            PipelineArg::Logs => PipelineSelection::Logs,
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
