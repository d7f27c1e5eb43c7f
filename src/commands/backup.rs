//! Main backup command

use crate::executor::naming::{Clock, SystemClock};
use crate::executor::backup_files;
use crate::types::{BackupError, BackupSummary, Severity};
use crate::ui::Reporter;
use crate::Config;
use indicatif::HumanBytes;

/// Run the backup with the wall clock
pub fn run(config: &Config, reporter: &mut dyn Reporter) -> Result<BackupSummary, BackupError> {
    run_with_clock(config, &SystemClock, reporter)
}

/// Run the backup: start notice, copy loop, end notice
///
/// The end notice is only emitted when the loop was not aborted.
pub fn run_with_clock(
    config: &Config,
    clock: &dyn Clock,
    reporter: &mut dyn Reporter,
) -> Result<BackupSummary, BackupError> {
    reporter.notify(Severity::Start, "Backup Process Initiated...");

    let summary = backup_files(config, clock, reporter)?;

    reporter.notify(
        Severity::End,
        &format!("Backup Process Completed. {}", format_summary(&summary)),
    );
    Ok(summary)
}

fn format_summary(summary: &BackupSummary) -> String {
    let mut line = format!(
        "{} file(s) copied, {} renamed, {}",
        summary.copied.len(),
        summary.renamed_count(),
        HumanBytes(summary.bytes_copied())
    );
    if !summary.failures.is_empty() {
        line.push_str(&format!(", {} failed", summary.failures.len()));
    }
    line
}
