use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "jp-scanner")]
#[command(about = "Parse Japanese date-style episode filenames and report the derived metadata")]
pub struct Cli {
    /// Input files or directories to process
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Recursively scan directories
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,

    /// Comma separated video extensions to scan for
    #[arg(short = 'e', long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Custom pattern file (defaults to jp_scanner.json lookup)
    #[arg(long)]
    pub patterns: Option<PathBuf>,

    /// Also try the conventional S01E02 / ep12 layouts
    #[arg(long)]
    pub standard_patterns: bool,

    /// Report files that end up with the same episode index
    #[arg(long)]
    pub collisions: bool,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Debug logging
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}
