//! User interface and notices

pub mod reporter;

pub use reporter::{ConsoleReporter, MemoryReporter, Reporter};
