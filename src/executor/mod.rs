//! Executor module for the backup copy loop

pub mod copy;
pub mod naming;

use crate::types::{BackupError, BackupSummary, CopiedFile, FailedCopy, FailurePolicy, Severity};
use crate::ui::Reporter;
use crate::Config;
use copy::{stage_copy, Commit};
use naming::{backup_name, format_timestamp, Clock};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

pub use copy::copy_file_noclobber;
pub use naming::{FixedClock, SystemClock};

/// Copy every regular file directly inside `config.source` into
/// `config.destination`
///
/// The destination is created if missing. A file whose name is already taken
/// in the destination is copied as `<base>_backup_<timestamp><ext>` (then
/// `_1`, `_2`, ... if that is taken as well). Subdirectories and special
/// entries are skipped. Entries are processed in directory-listing order.
///
/// A missing source is reported through `reporter` and returned as
/// [`BackupError::SourceMissing`]. Per-file failures either stop the run or
/// are reported and recorded, depending on `config.failure_policy`.
pub fn backup_files(
    config: &Config,
    clock: &dyn Clock,
    reporter: &mut dyn Reporter,
) -> Result<BackupSummary, BackupError> {
    let source = &config.source;
    let destination = &config.destination;

    if !source.exists() {
        let err = BackupError::SourceMissing {
            path: source.clone(),
        };
        reporter.notify(Severity::Error, &format!("{}.", err));
        return Err(err);
    }

    let mut summary = BackupSummary::new();

    if !destination.exists() {
        fs::create_dir_all(destination).map_err(|e| BackupError::CreateDestination {
            path: destination.clone(),
            source: e,
        })?;
        summary.destination_created = true;
        reporter.notify(
            Severity::Info,
            &format!("Destination directory '{}' created.", destination.display()),
        );
    } else if !destination.is_dir() {
        return Err(BackupError::DestinationNotDirectory {
            path: destination.clone(),
        });
    }

    // Listing is collected up front so files written by this run are never
    // picked up (source and destination may be the same directory).
    for path in list_entries(source)? {
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if !is_regular_file(&path) {
            summary.skipped += 1;
            continue;
        }

        match copy_entry(&path, file_name, config, clock, reporter) {
            Ok(copied) => {
                reporter.notify(
                    Severity::Success,
                    &format!(
                        "Copied: {} -> {}",
                        copied.source.display(),
                        copied.destination.display()
                    ),
                );
                summary.copied.push(copied);
            }
            Err(err) => match config.failure_policy {
                FailurePolicy::HaltOnFirstError => return Err(err),
                FailurePolicy::ContinueOnError => {
                    reporter.notify(Severity::Error, &error_notice(&err));
                    summary.failures.push(FailedCopy { source: path, error: err });
                }
            },
        }
    }

    Ok(summary)
}

fn list_entries(source: &Path) -> Result<Vec<PathBuf>, BackupError> {
    let read_error = |e: std::io::Error| BackupError::SourceRead {
        path: source.to_path_buf(),
        source: e,
    };

    fs::read_dir(source)
        .map_err(read_error)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)
}

/// Regular file after following symlinks; dangling links are not
fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn copy_entry(
    src: &Path,
    file_name: &OsStr,
    config: &Config,
    clock: &dyn Clock,
    reporter: &mut dyn Reporter,
) -> Result<CopiedFile, BackupError> {
    let destination = &config.destination;
    let plain = destination.join(file_name);

    let mut staged = stage_copy(src, destination).map_err(|e| copy_error(src, &plain, e))?;

    let mut target = plain.clone();
    let mut timestamp: Option<String> = None;
    let mut counter = 0usize;

    // The no-clobber commit is the only collision check: a name taken by
    // anything, including a dangling symlink or a file that appeared after
    // the listing, comes back as `Commit::Taken`.
    let bytes = loop {
        staged = match staged.commit(&target).map_err(|e| copy_error(src, &target, e))? {
            Commit::Done(bytes) => break bytes,
            Commit::Taken(back) => back,
        };

        if counter >= config.max_rename_attempts {
            return Err(BackupError::NamesExhausted {
                name: file_name.to_string_lossy().to_string(),
                attempts: counter,
            });
        }

        // One timestamp per file, taken at the first collision
        let ts = timestamp.get_or_insert_with(|| format_timestamp(&clock.now()));
        let next = destination.join(backup_name(file_name, ts, counter));
        reporter.notify(
            Severity::Warning,
            &format!(
                "File '{}' already exists. Renaming to '{}'.",
                display_name(&target),
                display_name(&next)
            ),
        );
        target = next;
        counter += 1;
    };

    let renamed = target != plain;

    Ok(CopiedFile {
        source: src.to_path_buf(),
        destination: target,
        bytes,
        renamed,
    })
}

fn copy_error(from: &Path, to: &Path, source: std::io::Error) -> BackupError {
    BackupError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    }
}

/// Error text plus a hint, when one applies
pub(crate) fn error_notice(err: &BackupError) -> String {
    match err.suggestion() {
        Some(hint) => format!("{} (Try: {})", err, hint),
        None => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MemoryReporter;
    use chrono::{Local, TimeZone};
    use tempfile::TempDir;

    fn clock() -> FixedClock {
        FixedClock(
            Local
                .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
                .single()
                .expect("unambiguous local time"),
        )
    }

    fn names_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .expect("read dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_collision_renames_with_timestamp() {
        let src = TempDir::new().expect("src");
        let dst = TempDir::new().expect("dst");
        fs::write(src.path().join("a.txt"), b"hello").expect("write src");
        fs::write(dst.path().join("a.txt"), b"old").expect("write dst");

        let config = Config::new(src.path(), dst.path());
        let mut reporter = MemoryReporter::new();
        let summary = backup_files(&config, &clock(), &mut reporter).expect("backup");

        assert_eq!(fs::read(dst.path().join("a.txt")).expect("read"), b"old");
        assert_eq!(
            fs::read(dst.path().join("a_backup_20240101120000.txt")).expect("read"),
            b"hello"
        );
        assert_eq!(summary.renamed_count(), 1);
        assert_eq!(
            reporter.severities(),
            vec![Severity::Warning, Severity::Success]
        );
        assert!(reporter.messages(Severity::Warning)[0]
            .contains("'a.txt' already exists. Renaming to 'a_backup_20240101120000.txt'"));
    }

    #[test]
    fn test_taken_backup_name_gets_counter() {
        let src = TempDir::new().expect("src");
        let dst = TempDir::new().expect("dst");
        fs::write(src.path().join("a.txt"), b"new").expect("write src");
        fs::write(dst.path().join("a.txt"), b"old").expect("write dst");
        fs::write(dst.path().join("a_backup_20240101120000.txt"), b"older").expect("write dst");

        let config = Config::new(src.path(), dst.path());
        let mut reporter = MemoryReporter::new();
        backup_files(&config, &clock(), &mut reporter).expect("backup");

        assert_eq!(
            fs::read(dst.path().join("a_backup_20240101120000.txt")).expect("read"),
            b"older"
        );
        assert_eq!(
            fs::read(dst.path().join("a_backup_20240101120000_1.txt")).expect("read"),
            b"new"
        );

        let warnings = reporter.messages(Severity::Warning);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("'a.txt' already exists"));
        assert!(warnings[1].contains(
            "'a_backup_20240101120000.txt' already exists. \
             Renaming to 'a_backup_20240101120000_1.txt'"
        ));
    }

    #[test]
    fn test_names_exhausted_halts_by_default() {
        let src = TempDir::new().expect("src");
        let dst = TempDir::new().expect("dst");
        fs::write(src.path().join("a.txt"), b"new").expect("write src");
        fs::write(dst.path().join("a.txt"), b"old").expect("write dst");
        fs::write(dst.path().join("a_backup_20240101120000.txt"), b"older").expect("write dst");

        let config = Config {
            max_rename_attempts: 1,
            ..Config::new(src.path(), dst.path())
        };
        let mut reporter = MemoryReporter::new();
        let err = backup_files(&config, &clock(), &mut reporter).expect_err("should fail");

        assert!(matches!(err, BackupError::NamesExhausted { attempts: 1, .. }));
        assert_eq!(
            names_in(dst.path()),
            vec!["a.txt", "a_backup_20240101120000.txt"]
        );
        // The collision is reported before the copy gives up
        assert_eq!(reporter.severities(), vec![Severity::Warning]);
        assert!(reporter.messages(Severity::Warning)[0]
            .contains("Renaming to 'a_backup_20240101120000.txt'"));
    }

    #[test]
    fn test_no_rename_attempts_fails_without_warning() {
        let src = TempDir::new().expect("src");
        let dst = TempDir::new().expect("dst");
        fs::write(src.path().join("a.txt"), b"new").expect("write src");
        fs::write(dst.path().join("a.txt"), b"old").expect("write dst");

        let config = Config {
            max_rename_attempts: 0,
            ..Config::new(src.path(), dst.path())
        };
        let mut reporter = MemoryReporter::new();
        let err = backup_files(&config, &clock(), &mut reporter).expect_err("should fail");

        assert!(matches!(err, BackupError::NamesExhausted { attempts: 0, .. }));
        assert_eq!(names_in(dst.path()), vec!["a.txt"]);
        assert!(reporter.notices.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_in_destination_is_not_replaced() {
        use std::os::unix::fs::symlink;

        let src = TempDir::new().expect("src");
        let dst = TempDir::new().expect("dst");
        fs::write(src.path().join("a.txt"), b"new").expect("write src");
        symlink(dst.path().join("gone.txt"), dst.path().join("a.txt")).expect("symlink");

        let config = Config::new(src.path(), dst.path());
        let mut reporter = MemoryReporter::new();
        let summary = backup_files(&config, &clock(), &mut reporter).expect("backup");

        assert!(fs::symlink_metadata(dst.path().join("a.txt"))
            .expect("metadata")
            .file_type()
            .is_symlink());
        assert!(!dst.path().join("gone.txt").exists());
        assert_eq!(
            fs::read(dst.path().join("a_backup_20240101120000.txt")).expect("read"),
            b"new"
        );
        assert_eq!(summary.renamed_count(), 1);
    }

    #[test]
    fn test_destination_file_is_fatal_under_any_policy() {
        let src = TempDir::new().expect("src");
        let root = TempDir::new().expect("root");
        let dst = root.path().join("blocker");
        fs::write(&dst, b"plain").expect("write blocker");
        fs::write(src.path().join("a.txt"), b"a").expect("write src");

        let config = Config {
            failure_policy: FailurePolicy::ContinueOnError,
            ..Config::new(src.path(), &dst)
        };
        let mut reporter = MemoryReporter::new();
        let err = backup_files(&config, &clock(), &mut reporter).expect_err("should fail");

        assert!(matches!(err, BackupError::DestinationNotDirectory { .. }));
        assert!(reporter.notices.is_empty());
        assert_eq!(fs::read(&dst).expect("read blocker"), b"plain");
    }

    #[test]
    fn test_skips_subdirectories() {
        let src = TempDir::new().expect("src");
        let dst = TempDir::new().expect("dst");
        fs::create_dir(src.path().join("nested")).expect("mkdir");
        fs::write(src.path().join("nested/inner.txt"), b"inner").expect("write nested");
        fs::write(src.path().join("top.txt"), b"top").expect("write top");

        let config = Config::new(src.path(), dst.path());
        let mut reporter = MemoryReporter::new();
        let summary = backup_files(&config, &clock(), &mut reporter).expect("backup");

        assert_eq!(names_in(dst.path()), vec!["top.txt"]);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.copied.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_follows_file_symlinks_and_skips_dangling() {
        use std::os::unix::fs::symlink;

        let src = TempDir::new().expect("src");
        let dst = TempDir::new().expect("dst");
        let outside = TempDir::new().expect("outside");
        fs::write(outside.path().join("real.txt"), b"real").expect("write real");
        symlink(outside.path().join("real.txt"), src.path().join("link.txt")).expect("symlink");
        symlink(outside.path().join("gone.txt"), src.path().join("dangling.txt"))
            .expect("symlink");

        let config = Config::new(src.path(), dst.path());
        let mut reporter = MemoryReporter::new();
        let summary = backup_files(&config, &clock(), &mut reporter).expect("backup");

        assert_eq!(names_in(dst.path()), vec!["link.txt"]);
        assert_eq!(fs::read(dst.path().join("link.txt")).expect("read"), b"real");
        assert!(!fs::symlink_metadata(dst.path().join("link.txt"))
            .expect("metadata")
            .file_type()
            .is_symlink());
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn test_same_directory_makes_backups_once() {
        let dir = TempDir::new().expect("dir");
        fs::write(dir.path().join("a.txt"), b"a").expect("write");
        fs::write(dir.path().join("b.txt"), b"b").expect("write");

        let config = Config::new(dir.path(), dir.path());
        let mut reporter = MemoryReporter::new();
        let summary = backup_files(&config, &clock(), &mut reporter).expect("backup");

        assert_eq!(summary.copied.len(), 2);
        assert_eq!(
            names_in(dir.path()),
            vec![
                "a.txt",
                "a_backup_20240101120000.txt",
                "b.txt",
                "b_backup_20240101120000.txt"
            ]
        );
    }

    #[test]
    fn test_error_notice_includes_hint() {
        let err = BackupError::NamesExhausted {
            name: "a.txt".to_string(),
            attempts: 2,
        };
        let notice = error_notice(&err);
        assert!(notice.contains("a.txt"));
        assert!(notice.contains("Try:"));
    }
}
