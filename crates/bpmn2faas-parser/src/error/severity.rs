//! Severity levels for diagnostics.

use std::fmt;

/// How serious a diagnostic is.
///
/// Only [`Severity::Error`] makes [`crate::parse`] fail; warnings are logged
/// and parsing continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The document cannot be turned into a process model.
    Error,

    /// The document is usable, but something in it is probably a mistake.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}
