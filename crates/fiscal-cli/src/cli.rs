//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Fiscal CLI - Extract fiscal records from documents and load them into SQLite.
#[derive(Debug, Parser)]
#[command(name = "fiscal")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format for extracted records
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (source file names only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract records from every file in a directory into a JSON file
    Extract(ExtractArgs),

    /// Load a JSON result file into the SQLite database
    Load(LoadArgs),

    /// Extract, then load
    Run(RunArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Directory holding the documents
    #[arg(short, long)]
    pub input_dir: Option<PathBuf>,

    /// JSON file to write
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Model calls allowed per document
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Per-call timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the load command.
#[derive(Debug, Args)]
pub struct LoadArgs {
    /// JSON result file to read
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// SQLite database file
    #[arg(short, long)]
    pub database: Option<PathBuf>,
}

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub extract: ExtractArgs,

    /// SQLite database file
    #[arg(short, long)]
    pub database: Option<PathBuf>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
