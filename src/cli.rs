use std::path::PathBuf;

use clap::Parser;

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "sloc-scan")]
#[command(author, version, about = "Classify source lines as code, comment or blank")]
#[command(long_about = "Scans files or directories, classifies every physical line as \
    code, comment or blank, estimates branching complexity and optionally \
    detects duplicate files by content hash.\n\n\
    Exit codes:\n  \
    0 - Scan completed\n  \
    2 - Configuration or runtime error")]
pub struct Cli {
    /// Paths to scan (files or directories)
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Exclude patterns (glob syntax, can be specified multiple times)
    #[arg(long, short = 'x')]
    pub exclude: Vec<String>,

    /// Detect duplicate files by content hash
    #[arg(long)]
    pub duplicates: bool,

    /// Do not honor .gitignore rules while walking
    #[arg(long)]
    pub no_gitignore: bool,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
