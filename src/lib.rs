//! # backup-copy - Flat Directory Backup
//!
//! Copy every regular file from one directory into another without ever
//! overwriting what is already there. A file whose name is taken in the
//! destination is copied as `<name>_backup_<YYYYMMDDHHMMSS><ext>` instead.

// Module declarations
pub mod config;
pub mod executor;
pub mod ui;
pub mod commands;
pub mod types;

// Re-export commonly used types
pub use types::{BackupError, BackupSummary, FailurePolicy, Severity};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
