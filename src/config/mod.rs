//! Configuration management

use super::types::FailurePolicy;
use clap::Parser;
use std::path::PathBuf;

/// Default number of disambiguated names tried per file
pub const DEFAULT_MAX_RENAME_ATTEMPTS: usize = 100;

/// Copy every file from a flat directory into another, renaming instead of overwriting
#[derive(Parser, Debug)]
#[command(name = "backup-copy", version, about, long_about = None)]
pub struct Cli {
    /// Directory whose files are copied (not recursed into)
    #[arg(value_name = "SOURCE_DIRECTORY", allow_hyphen_values = true)]
    pub source: PathBuf,

    /// Directory receiving the copies (created if missing)
    #[arg(value_name = "DESTINATION_DIRECTORY", allow_hyphen_values = true)]
    pub destination: PathBuf,
}

/// Global configuration for backup-copy
#[derive(Debug, Clone)]
pub struct Config {
    /// Source directory
    pub source: PathBuf,

    /// Destination directory
    pub destination: PathBuf,

    /// What a per-file failure does to the rest of the run
    pub failure_policy: FailurePolicy,

    /// Disambiguated names tried before giving up on a file
    pub max_rename_attempts: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            failure_policy: FailurePolicy::HaltOnFirstError,
            max_rename_attempts: DEFAULT_MAX_RENAME_ATTEMPTS,
        }
    }
}

impl Config {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            ..Self::default()
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config::new(cli.source, cli.destination)
    }
}
