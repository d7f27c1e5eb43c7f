//! Core type definitions for backup-copy

mod action;
mod error;
mod summary;

pub use action::{FailurePolicy, Severity};
pub use error::BackupError;
pub use summary::{BackupSummary, CopiedFile, FailedCopy};
