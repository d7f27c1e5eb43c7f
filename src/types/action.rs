//! Notice severities and failure policy

/// Kind of notice emitted during a backup run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Run started
    Start,

    /// Informational (e.g. destination created)
    Info,

    /// Name collision, file renamed
    Warning,

    /// File copied
    Success,

    /// Missing source or failed file
    Error,

    /// Run completed
    End,
}

impl Severity {
    /// Bracketed tag printed in front of the message
    pub fn label(self) -> &'static str {
        match self {
            Severity::Start => "START",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Success => "SUCCESS",
            Severity::Error => "ERROR",
            Severity::End => "END",
        }
    }
}

/// What to do when copying a single file fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the run; files copied so far stay in place
    #[default]
    HaltOnFirstError,

    /// Report the file, record it in the summary, keep going
    ContinueOnError,
}
