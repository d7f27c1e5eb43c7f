//! Error types for backup-copy

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for backup operations
#[derive(Debug, Error)]
pub enum BackupError {
    /// Source directory does not exist
    #[error("Source directory '{}' does not exist", path.display())]
    SourceMissing { path: PathBuf },

    /// Source exists but its entries could not be listed
    #[error("Failed to read source directory '{}': {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Destination directory could not be created
    #[error("Failed to create destination directory '{}': {source}", path.display())]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Destination path exists but is not a directory
    #[error("Destination '{}' exists but is not a directory", path.display())]
    DestinationNotDirectory { path: PathBuf },

    /// A single file failed to stage or commit
    #[error("Failed to copy '{}' -> '{}': {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every candidate destination name for a file was already taken
    #[error("No free backup name for '{name}' after {attempts} attempts")]
    NamesExhausted { name: String, attempts: usize },
}

impl BackupError {
    /// Whether this error concerns a single file and can be skipped past
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            BackupError::Copy { .. } | BackupError::NamesExhausted { .. }
        )
    }

    /// Check if this error is related to permissions
    pub fn is_permission_error(&self) -> bool {
        self.io_kind() == Some(ErrorKind::PermissionDenied)
    }

    /// Check if this error is related to disk space
    pub fn is_disk_space_error(&self) -> bool {
        match self.io_error() {
            Some(err) => {
                err.kind() == ErrorKind::StorageFull
                    || matches!(err.raw_os_error(), Some(28 | 122))
            }
            None => false,
        }
    }

    /// Plain-English hint appended to error notices
    pub fn suggestion(&self) -> Option<&'static str> {
        if self.is_permission_error() {
            return Some("Check file permissions or run with a user that has access.");
        }
        if self.is_disk_space_error() {
            return Some("Free disk space on destination and retry.");
        }
        match self {
            BackupError::SourceMissing { .. } => {
                Some("Verify the source path is spelled correctly and retry.")
            }
            BackupError::NamesExhausted { .. } => {
                Some("Clean up old backup copies in the destination, then retry.")
            }
            BackupError::DestinationNotDirectory { .. } => {
                Some("Point the destination at a directory or a path that does not exist yet.")
            }
            _ => None,
        }
    }

    fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            BackupError::SourceRead { source, .. }
            | BackupError::CreateDestination { source, .. }
            | BackupError::Copy { source, .. } => Some(source),
            BackupError::SourceMissing { .. }
            | BackupError::DestinationNotDirectory { .. }
            | BackupError::NamesExhausted { .. } => None,
        }
    }

    fn io_kind(&self) -> Option<ErrorKind> {
        self.io_error().map(std::io::Error::kind)
    }
}
