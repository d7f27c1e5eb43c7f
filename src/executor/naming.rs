//! Disambiguated backup names
//!
//! A colliding file `report.txt` is copied as `report_backup_<timestamp>.txt`.
//! If that name is taken too, a counter follows the timestamp:
//! `report_backup_<timestamp>_1.txt`, `report_backup_<timestamp>_2.txt`, ...

use chrono::{DateTime, Local};
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// `YYYYMMDDHHMMSS`, local wall clock
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Marker inserted between the base name and the timestamp
pub const BACKUP_MARKER: &str = "_backup_";

/// Source of the current time for backup names
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Format a time the way backup names carry it
pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Split a file name at its last `.`
///
/// Leading dots belong to the base name, so `.bashrc` has no extension.
/// The extension keeps its dot: `a.tar.gz` -> (`a.tar`, `.gz`).
pub fn split_extension(name: &str) -> (&str, &str) {
    let body_start = name.len() - name.trim_start_matches('.').len();
    match name[body_start..].rfind('.') {
        Some(idx) => name.split_at(body_start + idx),
        None => (name, ""),
    }
}

/// Build the `counter`-th backup name for `file_name`
///
/// Counter 0 is the plain `<base>_backup_<timestamp><ext>` form.
pub fn backup_name(file_name: &OsStr, timestamp: &str, counter: usize) -> OsString {
    let suffix = if counter == 0 {
        format!("{BACKUP_MARKER}{timestamp}")
    } else {
        format!("{BACKUP_MARKER}{timestamp}_{counter}")
    };

    match file_name.to_str() {
        Some(name) => {
            let (base, ext) = split_extension(name);
            OsString::from(format!("{base}{suffix}{ext}"))
        }
        None => {
            // Non UTF-8 names: std's stem/extension split is close enough
            let path = Path::new(file_name);
            let mut out = path.file_stem().unwrap_or(file_name).to_os_string();
            out.push(&suffix);
            if let Some(ext) = path.extension() {
                out.push(".");
                out.push(ext);
            }
            out
        }
    }
}
