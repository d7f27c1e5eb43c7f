//! CLI commands

pub mod backup;
