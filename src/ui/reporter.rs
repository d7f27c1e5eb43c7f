//! Notice reporting

use crate::types::Severity;
use console::{style, StyledObject, Term};

/// Receives the notices a backup run emits
pub trait Reporter {
    fn notify(&mut self, severity: Severity, message: &str);
}

/// Writes `[TAG] message` lines to the terminal
///
/// Errors go to stderr, everything else to stdout. Tags are colored only
/// when the stream is a terminal.
pub struct ConsoleReporter {
    stdout: Term,
    stderr: Term,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            stdout: Term::stdout(),
            stderr: Term::stderr(),
        }
    }

    fn tag(severity: Severity) -> StyledObject<String> {
        let tag = style(format!("[{}]", severity.label())).bold();
        match severity {
            Severity::Start | Severity::End => tag.cyan(),
            Severity::Info => tag.blue(),
            Severity::Warning => tag.yellow(),
            Severity::Success => tag.green(),
            Severity::Error => tag.red().for_stderr(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn notify(&mut self, severity: Severity, message: &str) {
        let line = format!("{} {}", Self::tag(severity), message);
        let term = match severity {
            Severity::Error => &self.stderr,
            _ => &self.stdout,
        };
        // A closed terminal is not a reason to abort a copy
        let _ = term.write_line(&line);
    }
}

/// Keeps every notice in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    pub notices: Vec<(Severity, String)>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages emitted with `severity`, in order
    pub fn messages(&self, severity: Severity) -> Vec<&str> {
        self.notices
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, msg)| msg.as_str())
            .collect()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.notices.iter().filter(|(s, _)| *s == severity).count()
    }

    /// Severities in emission order
    pub fn severities(&self) -> Vec<Severity> {
        self.notices.iter().map(|(s, _)| *s).collect()
    }
}

impl Reporter for MemoryReporter {
    fn notify(&mut self, severity: Severity, message: &str) {
        self.notices.push((severity, message.to_string()));
    }
}
