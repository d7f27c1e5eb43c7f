use anyhow::Context;
use backup_copy::commands::backup;
use backup_copy::config::Cli;
use backup_copy::ui::ConsoleReporter;
use backup_copy::{BackupError, Config};
use clap::error::ErrorKind;
use clap::Parser;
use console::style;
use std::process::ExitCode;

/// Exit status for a wrong argument count
const USAGE_EXIT: u8 = 1;

fn main() -> anyhow::Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(_) => {
            eprintln!(
                "{} backup-copy <source_directory> <destination_directory>",
                style("[USAGE]").yellow().bold().for_stderr()
            );
            return Ok(ExitCode::from(USAGE_EXIT));
        }
    };

    let config = Config::from(cli);
    let mut reporter = ConsoleReporter::new();

    match backup::run(&config, &mut reporter) {
        Ok(summary) if summary.is_clean() => Ok(ExitCode::SUCCESS),
        Ok(_) => Ok(ExitCode::FAILURE),
        // Already reported as an error notice
        Err(BackupError::SourceMissing { .. }) => Ok(ExitCode::FAILURE),
        Err(err) => Err(err).with_context(|| {
            format!(
                "Backup of '{}' into '{}' aborted",
                config.source.display(),
                config.destination.display()
            )
        }),
    }
}
