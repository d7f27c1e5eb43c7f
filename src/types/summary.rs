//! Records of what one backup run did

use super::BackupError;
use std::path::PathBuf;

/// A file that was copied into the destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedFile {
    /// Path inside the source directory
    pub source: PathBuf,

    /// Final path inside the destination directory
    pub destination: PathBuf,

    /// Bytes written
    pub bytes: u64,

    /// True when the plain name was taken and a backup name was used
    pub renamed: bool,
}

/// A file that failed under [`FailurePolicy::ContinueOnError`](super::FailurePolicy)
#[derive(Debug)]
pub struct FailedCopy {
    pub source: PathBuf,
    pub error: BackupError,
}

/// Outcome of one run
#[derive(Debug, Default)]
pub struct BackupSummary {
    /// Destination directory had to be created
    pub destination_created: bool,

    /// Copied files, in enumeration order
    pub copied: Vec<CopiedFile>,

    /// Entries that are not regular files
    pub skipped: usize,

    /// Per-file failures that did not stop the run
    pub failures: Vec<FailedCopy>,
}

impl BackupSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bytes copied
    pub fn bytes_copied(&self) -> u64 {
        self.copied.iter().map(|file| file.bytes).sum()
    }

    /// Number of copies that landed under a backup name
    pub fn renamed_count(&self) -> usize {
        self.copied.iter().filter(|file| file.renamed).count()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
